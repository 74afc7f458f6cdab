//! Position, effect and the one-shot roll context.
//!
//! The sheet keeps three buffer fields (`dice_modifier`, `position`,
//! `effect`) that the player sets before clicking a roll button. A roll reads
//! them into a [`RollContext`], which then travels with the request; the
//! buffers are reset straight away so a second click cannot reuse them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::fields::{DICE_MODIFIER, EFFECT, POSITION};
use crate::value_objects::{FieldPatch, FieldSnapshot};

/// Position determines consequence severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Safe, dominant advantage - minor consequences
    Controlled,
    /// Standard risk - moderate consequences
    #[default]
    Risky,
    /// Serious trouble - severe consequences
    Desperate,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Controlled => "controlled",
            Position::Risky => "risky",
            Position::Desperate => "desperate",
        }
    }

    /// Lenient read of the buffer field: anything unrecognised is risky.
    pub fn from_field(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "controlled" => Ok(Position::Controlled),
            "risky" => Ok(Position::Risky),
            "desperate" => Ok(Position::Desperate),
            other => Err(DomainError::parse(format!("Unknown position: {}", other))),
        }
    }
}

/// Effect level determines success magnitude.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// No meaningful progress
    Zero,
    /// Partial/weak effect
    Limited,
    /// Normal effect
    #[default]
    Standard,
    /// Better than usual
    Great,
    /// Extraordinary (only reachable from a critical)
    Extreme,
}

impl Effect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Effect::Zero => "zero",
            Effect::Limited => "limited",
            Effect::Standard => "standard",
            Effect::Great => "great",
            Effect::Extreme => "extreme",
        }
    }

    /// Lenient read of the buffer field: anything unrecognised is standard.
    pub fn from_field(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// Increase effect by one level (e.g., from critical).
    pub fn increase(self) -> Self {
        match self {
            Effect::Zero => Effect::Limited,
            Effect::Limited => Effect::Standard,
            Effect::Standard => Effect::Great,
            Effect::Great | Effect::Extreme => Effect::Extreme,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Effect {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(Effect::Zero),
            "limited" => Ok(Effect::Limited),
            "standard" => Ok(Effect::Standard),
            "great" => Ok(Effect::Great),
            "extreme" => Ok(Effect::Extreme),
            other => Err(DomainError::parse(format!("Unknown effect: {}", other))),
        }
    }
}

/// Human-readable dice bonus: "+2d", "-1d", or empty for zero.
pub fn modifier_note(modifier: i32) -> String {
    match modifier {
        0 => String::new(),
        m if m > 0 => format!("+{}d", m),
        m => format!("{}d", m),
    }
}

/// Modifier state captured for exactly one roll.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollContext {
    pub position: Position,
    pub effect: Effect,
    pub dice_modifier: i32,
    pub modifier_note: String,
}

impl RollContext {
    /// The three buffer fields a roll has to read.
    pub const FIELDS: [&'static str; 3] = [DICE_MODIFIER, POSITION, EFFECT];

    pub fn new(position: Position, effect: Effect, dice_modifier: i32) -> Self {
        Self {
            position,
            effect,
            dice_modifier,
            modifier_note: modifier_note(dice_modifier),
        }
    }

    /// Reads the buffers, defaulting to risky / standard / +0d.
    pub fn from_snapshot(snapshot: &FieldSnapshot) -> Self {
        Self::new(
            Position::from_field(snapshot.get(POSITION)),
            Effect::from_field(snapshot.get(EFFECT)),
            snapshot.int(DICE_MODIFIER, 0),
        )
    }

    /// Dice pool after applying the situational modifier.
    pub fn final_dice(&self, base: i32) -> i32 {
        base.saturating_add(self.dice_modifier)
    }

    /// Silent write that returns the buffers to their defaults.
    pub fn reset_patch() -> FieldPatch {
        FieldPatch::silent()
            .with(DICE_MODIFIER, 0)
            .with(POSITION, Position::default())
            .with(EFFECT, Effect::default())
    }
}
