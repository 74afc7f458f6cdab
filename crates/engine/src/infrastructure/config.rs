//! Engine configuration from the environment.
//!
//! Supported environment variables:
//! - BABEL_CATALOGUE_PATH: catalogue JSON to load instead of the bundled one
//! - BABEL_MAX_CASCADE_DEPTH: how many rounds of computed writes re-trigger handlers
//! - BABEL_FRIEND_SLOTS / BABEL_CONTACT_SLOTS: fixed slot counts on the sheets
//!
//! Malformed numbers fall back to the defaults.

use std::path::PathBuf;

use babel_domain::common::parse_int;

use crate::api::DEFAULT_MAX_CASCADE_DEPTH;
use crate::use_cases::population::SlotCounts;

pub const DEFAULT_FRIEND_SLOTS: usize = 5;
pub const DEFAULT_CONTACT_SLOTS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub catalogue_path: Option<PathBuf>,
    pub max_cascade_depth: usize,
    pub friend_slots: usize,
    pub contact_slots: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalogue_path: None,
            max_cascade_depth: DEFAULT_MAX_CASCADE_DEPTH,
            friend_slots: DEFAULT_FRIEND_SLOTS,
            contact_slots: DEFAULT_CONTACT_SLOTS,
        }
    }
}

impl EngineConfig {
    /// Reads the process environment. Call `dotenvy` first to pick up `.env`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let count = |key: &str, default: usize| {
            let value = lookup(key);
            let parsed = parse_int(value.as_deref(), -1);
            match usize::try_from(parsed) {
                Ok(n) => n,
                Err(_) => {
                    if let Some(raw) = &value {
                        tracing::warn!(key, value = %raw, "Invalid count, using default");
                    }
                    default
                }
            }
        };

        Self {
            catalogue_path: lookup("BABEL_CATALOGUE_PATH")
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            max_cascade_depth: count("BABEL_MAX_CASCADE_DEPTH", defaults.max_cascade_depth),
            friend_slots: count("BABEL_FRIEND_SLOTS", defaults.friend_slots),
            contact_slots: count("BABEL_CONTACT_SLOTS", defaults.contact_slots),
        }
    }

    pub fn slots(&self) -> SlotCounts {
        SlotCounts {
            friends: self.friend_slots,
            contacts: self.contact_slots,
        }
    }
}
