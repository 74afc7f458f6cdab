//! Field snapshots and derived-value patches.
//!
//! A [`FieldSnapshot`] is the form state read at the start of one handler
//! invocation. A [`FieldPatch`] is what the handler wants written back. Patches
//! built from calculations go through [`FieldPatch::suppress_unchanged`] so that
//! they only carry values that actually differ; writing an unchanged value would
//! re-fire the change event that produced it.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::common::{parse_flag, parse_int};

/// Immutable view of field values at the moment a computation begins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSnapshot {
    values: HashMap<String, String>,
}

impl FieldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, mostly for tests and fixtures.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(name.into(), value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Value of `name`, or an empty string when absent.
    pub fn text(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Parsed integer with a default for missing or malformed values.
    pub fn int(&self, name: &str, default: i32) -> i32 {
        parse_int(self.get(name), default)
    }

    /// Checkbox state of `name`.
    pub fn flag(&self, name: &str) -> bool {
        parse_flag(self.get(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, String>> for FieldSnapshot {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

/// Where a write came from.
///
/// The dispatcher uses this to decide whether the written fields should fire
/// their own change handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteProvenance {
    /// Typed by the user; the host already reports these as change events.
    User,
    /// Produced by a calculation; dependents must be recomputed.
    Computed,
    /// Buffer resets (roll modifiers) that must not trigger anything.
    Silent,
}

impl WriteProvenance {
    /// Whether a write with this provenance should re-trigger dependent handlers.
    pub fn cascades(&self) -> bool {
        matches!(self, WriteProvenance::User | WriteProvenance::Computed)
    }
}

/// Set of field values to write back to the host store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    values: BTreeMap<String, String>,
    provenance: WriteProvenance,
}

impl FieldPatch {
    pub fn new(provenance: WriteProvenance) -> Self {
        Self {
            values: BTreeMap::new(),
            provenance,
        }
    }

    pub fn computed() -> Self {
        Self::new(WriteProvenance::Computed)
    }

    pub fn silent() -> Self {
        Self::new(WriteProvenance::Silent)
    }

    pub fn user() -> Self {
        Self::new(WriteProvenance::User)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set(name, value);
        self
    }

    /// Drops every entry whose value already matches `snapshot`.
    ///
    /// Fields absent from the snapshot are always kept.
    pub fn suppress_unchanged(mut self, snapshot: &FieldSnapshot) -> Self {
        self.values
            .retain(|name, value| snapshot.get(name) != Some(value.as_str()));
        self
    }

    pub fn extend(&mut self, other: FieldPatch) {
        self.values.extend(other.values);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn provenance(&self) -> WriteProvenance {
        self.provenance
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_defaults() {
        let snapshot = FieldSnapshot::new().with("hack", "2").with("special", "on");
        assert_eq!(snapshot.int("hack", 0), 2);
        assert_eq!(snapshot.int("recon", 0), 0);
        assert!(snapshot.flag("special"));
        assert!(!snapshot.flag("missing"));
        assert_eq!(snapshot.text("missing"), "");
    }

    #[test]
    fn suppression_keeps_only_changed_and_missing_fields() {
        let snapshot = FieldSnapshot::new()
            .with("acuity_rating", "2")
            .with("grit_rating", "1");
        let patch = FieldPatch::computed()
            .with("acuity_rating", 2)
            .with("grit_rating", 3)
            .with("resolve_rating", 0)
            .suppress_unchanged(&snapshot);

        assert_eq!(patch.len(), 2);
        assert_eq!(patch.get("grit_rating"), Some("3"));
        assert_eq!(patch.get("resolve_rating"), Some("0"));
        assert!(patch.get("acuity_rating").is_none());
    }

    #[test]
    fn provenance_controls_cascade() {
        assert!(WriteProvenance::Computed.cascades());
        assert!(WriteProvenance::User.cascades());
        assert!(!WriteProvenance::Silent.cascades());
        assert_eq!(FieldPatch::silent().provenance(), WriteProvenance::Silent);
    }

    #[test]
    fn snapshot_serializes_as_plain_map() {
        let snapshot: FieldSnapshot = serde_json::from_str(r#"{"heat":"3"}"#).expect("json");
        assert_eq!(snapshot.int("heat", 0), 3);
    }
}
