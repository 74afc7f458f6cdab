//! Field-name vocabulary shared by the calculations and the engine.
//!
//! Flat fields are plain names (`heat`, `load_total`); repeating-section
//! fields follow the host convention `repeating_<section>_<rowId>_<suffix>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::RowId;

pub const CHARACTER_NAME: &str = "character_name";
pub const PLAYBOOK: &str = "playbook";
pub const PLAYBOOK_TITLE: &str = "playbook_title";
pub const XP_TRIGGER: &str = "xp_trigger";
pub const CREW_TYPE: &str = "crew_type";
pub const CREW_TITLE: &str = "crew_title";
pub const CREW_XP_TRIGGER: &str = "crew_xp_trigger";
pub const CREW_TIER: &str = "crew_tier";

pub const LOAD_SELECTOR: &str = "load";
pub const LOAD_TOTAL: &str = "load_total";
pub const LOAD_MAX: &str = "load_max";

pub const MAINTENANCE_TICKS: &str = "maintenance_ticks";
pub const MAINTENANCE_CLOCKS: &str = "maintenance_clocks";
pub const MAINTENANCE_PAID: &str = "maintenance_paid";

pub const HEAT: &str = "heat";
pub const HEAT_DICE: &str = "heat_dice";

pub const DICE_MODIFIER: &str = "dice_modifier";
pub const POSITION: &str = "position";
pub const EFFECT: &str = "effect";

pub const FORTUNE_DICE: &str = "fortune_dice";
pub const ENGAGEMENT_DICE: &str = "engagement_dice";

pub const FRIEND_PREFIX: &str = "friend";
pub const CONTACT_PREFIX: &str = "contact";
pub const SPECIAL_UPGRADE_PREFIX: &str = "special_upgrade";

/// Marker suffix stamped on rows the system generated.
pub const AUTOGEN: &str = "autogen";

/// Name of a numbered flat slot, e.g. `friend_3`.
pub fn slot_field(prefix: &str, index: usize) -> String {
    format!("{prefix}_{index}")
}

/// Repeating sections the sheet maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Items,
    Augments,
    Cohorts,
    CrewAbilities,
    Factions,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Items,
        Section::Augments,
        Section::Cohorts,
        Section::CrewAbilities,
        Section::Factions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Items => "items",
            Section::Augments => "augments",
            Section::Cohorts => "cohorts",
            Section::CrewAbilities => "crewabilities",
            Section::Factions => "factions",
        }
    }

    /// Full field name of `suffix` on `row` in this section.
    pub fn field(&self, row: &RowId, suffix: &str) -> String {
        format!("repeating_{}_{}_{}", self.as_str(), row, suffix)
    }

    /// Field suffixes the sheet defines on rows of this section.
    pub fn suffixes(&self) -> &'static [&'static str] {
        match self {
            Section::Items => &["name", "load", "load_1", "load_2", "special", AUTOGEN],
            Section::Augments => &["name", "description", "tier", "installed", AUTOGEN],
            Section::Cohorts => &[
                "name", "type", "tags", "edges", "flaws", "elite", "harm", "roll", AUTOGEN,
            ],
            Section::CrewAbilities => &["name", "description", AUTOGEN],
            Section::Factions => &[
                "name",
                "tier",
                "tier_display",
                "description",
                "category",
                AUTOGEN,
            ],
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("repeating_").unwrap_or(s);
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == name)
            .ok_or_else(|| DomainError::parse(format!("Unknown repeating section: {}", s)))
    }
}

/// A field name decomposed into its repeating-section parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatingField {
    pub section: Section,
    pub row_id: RowId,
    pub suffix: String,
}

impl RepeatingField {
    /// Splits `repeating_<section>_<row>_<suffix>`; `None` for flat fields and
    /// unknown sections.
    ///
    /// Row ids are opaque and may contain underscores, so the suffix is
    /// matched from the end against the section's known suffixes (longest
    /// first). Unknown suffixes fall back to the last underscore.
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix("repeating_")?;
        let (section, rest) = rest.split_once('_')?;
        let section: Section = section.parse().ok()?;

        let known = section
            .suffixes()
            .iter()
            .filter_map(|&suffix| {
                let row = rest.strip_suffix(suffix)?.strip_suffix('_')?;
                Some((row, suffix))
            })
            .max_by_key(|(_, suffix)| suffix.len());
        let (row, suffix) = known.or_else(|| rest.rsplit_once('_'))?;
        if row.is_empty() || suffix.is_empty() {
            return None;
        }
        Some(Self {
            section,
            row_id: RowId::new(row),
            suffix: suffix.to_string(),
        })
    }
}
