//! Roll engine port - the host rolls the dice.

use std::collections::BTreeMap;

use async_trait::async_trait;
use babel_domain::{DiceOutcome, RollContext, RollFormula, RollId, RollKind};

use super::error::PortError;

/// One roll to show in the chat log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollRequest {
    pub kind: RollKind,
    pub character_name: String,
    pub title: String,
    /// None for dice-less note rolls.
    pub formula: Option<RollFormula>,
    pub context: RollContext,
    pub note: Option<String>,
}

/// Character name used when the sheet has none.
pub const UNKNOWN_CHARACTER: &str = "Unknown";

impl RollRequest {
    pub fn new(kind: RollKind, title: impl Into<String>, formula: RollFormula) -> Self {
        Self {
            kind,
            character_name: UNKNOWN_CHARACTER.to_string(),
            title: title.into(),
            formula: Some(formula),
            context: RollContext::default(),
            note: None,
        }
    }

    /// A dice-less message roll.
    pub fn note(title: impl Into<String>, note: impl Into<String>) -> Self {
        Self::without_dice(RollKind::Note, title, note)
    }

    /// A roll of `kind` settled before any dice were needed.
    pub fn without_dice(kind: RollKind, title: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            kind,
            character_name: UNKNOWN_CHARACTER.to_string(),
            title: title.into(),
            formula: None,
            context: RollContext::default(),
            note: Some(note.into()),
        }
    }

    pub fn with_character(mut self, name: &str) -> Self {
        let name = name.trim();
        if !name.is_empty() {
            self.character_name = name.to_string();
        }
        self
    }

    pub fn with_context(mut self, context: RollContext) -> Self {
        self.context = context;
        self
    }

    /// Host roll string, e.g.
    /// `&{template:dcsb-action} {{charname=Vex}} {{title=Hack}} {{roll=[[3d6kh1]]}} ...`
    pub fn roll_string(&self) -> String {
        let mut out = format!(
            "&{{template:{}}} {{{{charname={}}}}} {{{{title={}}}}}",
            self.kind.template(),
            self.character_name,
            self.title
        );
        if let Some(formula) = &self.formula {
            out.push_str(&format!(" {{{{roll=[[{}]]}}}}", formula));
            out.push_str(&format!(" {{{{position={}}}}}", self.context.position));
            out.push_str(&format!(" {{{{effect={}}}}}", self.context.effect));
            if !self.context.modifier_note.is_empty() {
                out.push_str(&format!(" {{{{modifier={}}}}}", self.context.modifier_note));
            }
        }
        if let Some(note) = &self.note {
            out.push_str(&format!(" {{{{note={}}}}}", note));
        }
        out
    }
}

/// What the host returns once the dice land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollResult {
    pub roll_id: RollId,
    /// None when no formula was sent.
    pub dice: Option<DiceOutcome>,
}

/// Asynchronous roll engine. A requested roll always completes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RollPort: Send + Sync {
    async fn request_roll(&self, request: &RollRequest) -> Result<RollResult, PortError>;

    /// Attaches computed display fields to a finished roll.
    async fn complete_roll(
        &self,
        roll_id: &RollId,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), PortError>;
}
