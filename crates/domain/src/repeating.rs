//! Repeating-section synchronizer.
//!
//! Rows a sheet generates from catalogue data carry `autogen = 1`; every
//! other row belongs to the player. Planning is pure: the engine lists the
//! section, feeds the autogen flags in, and executes the returned plan
//! (deletions first, then one new row per template).

use std::collections::BTreeMap;

use crate::fields::{slot_field, Section, AUTOGEN};
use crate::ids::RowId;
use crate::value_objects::{FieldPatch, FieldSnapshot};

/// How aggressively a sync clears the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncMode {
    /// Replace generated rows, keep the player's own rows
    Incremental,
    /// Delete every row before creating
    FullReset,
}

/// Field values of one row to create, keyed by suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowTemplate {
    values: BTreeMap<String, String>,
}

impl RowTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, suffix: impl Into<String>, value: impl ToString) -> Self {
        self.values.insert(suffix.into(), value.to_string());
        self
    }

    pub fn get(&self, suffix: &str) -> Option<&str> {
        self.values.get(suffix).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Fields needed to tell generated rows from the player's.
pub fn autogen_fields(section: Section, rows: &[RowId]) -> Vec<String> {
    rows.iter().map(|row| section.field(row, AUTOGEN)).collect()
}

/// Deletions and creations for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub section: Section,
    pub delete: Vec<RowId>,
    pub create: Vec<RowTemplate>,
}

impl SyncPlan {
    /// Plans a sync of `section` toward `targets`.
    pub fn new(
        section: Section,
        mode: SyncMode,
        rows: &[RowId],
        snapshot: &FieldSnapshot,
        targets: Vec<RowTemplate>,
    ) -> Self {
        let delete = rows
            .iter()
            .filter(|row| match mode {
                SyncMode::FullReset => true,
                SyncMode::Incremental => snapshot.flag(&section.field(row, AUTOGEN)),
            })
            .cloned()
            .collect();
        Self {
            section,
            delete,
            create: targets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.create.is_empty()
    }

    /// Patch writing the created rows under freshly issued ids, each
    /// stamped as generated. Extra ids are ignored.
    pub fn creation_patch(&self, ids: &[RowId]) -> FieldPatch {
        let mut patch = FieldPatch::computed();
        for (template, row) in self.create.iter().zip(ids) {
            for (suffix, value) in template.iter() {
                patch.set(self.section.field(row, suffix), value);
            }
            patch.set(self.section.field(row, AUTOGEN), 1);
        }
        patch
    }
}

/// Writes `values` into slots `<prefix>_1..=<prefix>_<slots>` and clears
/// the rest. Values past the slot count are dropped.
pub fn fill_slots(prefix: &str, slots: usize, values: &[String]) -> FieldPatch {
    let mut patch = FieldPatch::computed();
    for index in 1..=slots {
        let value = values.get(index - 1).map(String::as_str).unwrap_or("");
        patch.set(slot_field(prefix, index), value);
    }
    patch
}
