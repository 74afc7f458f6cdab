//! What a handler did to the sheet.

use std::collections::BTreeMap;

use babel_domain::{FieldPatch, RollId, RollKind, RowId, Section};

/// A roll that was requested and completed by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRoll {
    pub roll_id: RollId,
    pub kind: RollKind,
    pub roll_string: String,
    pub label: String,
    pub fields: BTreeMap<String, String>,
}

/// Every effect one handler had, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerOutcome {
    /// Patches actually written (never empty ones)
    pub patches: Vec<FieldPatch>,
    pub removed_rows: Vec<(Section, RowId)>,
    pub created_rows: Vec<(Section, RowId)>,
    pub rolls: Vec<CompletedRoll>,
}

impl HandlerOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
            && self.removed_rows.is_empty()
            && self.created_rows.is_empty()
            && self.rolls.is_empty()
    }

    pub fn merge(&mut self, other: HandlerOutcome) {
        self.patches.extend(other.patches);
        self.removed_rows.extend(other.removed_rows);
        self.created_rows.extend(other.created_rows);
        self.rolls.extend(other.rolls);
    }

    /// Value of `field` after all patches, if any patch wrote it.
    pub fn written(&self, field: &str) -> Option<&str> {
        self.patches.iter().rev().find_map(|patch| patch.get(field))
    }
}
