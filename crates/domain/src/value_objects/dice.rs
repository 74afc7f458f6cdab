//! Dice formula value objects
//!
//! The host roll engine understands `<count>d<sides><keep>` where `<keep>` is
//! `kh1` (keep highest) or `kl1` (keep lowest), e.g. `3d6kh1` or `2d6kl1`.
//! The core only builds and inspects formulas; the host does the rolling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Faces on every die the game uses.
pub const DIE_SIZE: u8 = 6;

/// Dice rolled when a pool drops to zero (keep the lowest).
pub const ZERO_DICE_COUNT: u8 = 2;

/// Which die of the pool becomes the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeepDirective {
    Highest,
    Lowest,
}

impl KeepDirective {
    fn suffix(&self) -> &'static str {
        match self {
            KeepDirective::Highest => "kh1",
            KeepDirective::Lowest => "kl1",
        }
    }
}

/// A roll formula like "3d6kh1"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollFormula {
    /// Number of dice to roll (X in XdY)
    pub dice_count: u8,
    /// Size of each die (Y in XdY)
    pub die_size: u8,
    /// Which single die is kept
    pub keep: KeepDirective,
}

impl RollFormula {
    /// Formula for a dice pool of `dice`.
    ///
    /// A pool of zero or less rolls two dice and keeps the lowest; anything
    /// else keeps the highest of `dice` d6.
    pub fn for_pool(dice: i32) -> Self {
        if dice > 0 {
            Self {
                dice_count: u8::try_from(dice).unwrap_or(u8::MAX),
                die_size: DIE_SIZE,
                keep: KeepDirective::Highest,
            }
        } else {
            Self {
                dice_count: ZERO_DICE_COUNT,
                die_size: DIE_SIZE,
                keep: KeepDirective::Lowest,
            }
        }
    }

    /// Keep-lowest formula over `dice` d6 (maintenance failure rolls).
    ///
    /// Returns `None` for an empty pool: there is nothing to roll.
    pub fn lowest_of(dice: i32) -> Option<Self> {
        let dice_count = u8::try_from(dice).ok().filter(|count| *count > 0)?;
        Some(Self {
            dice_count,
            die_size: DIE_SIZE,
            keep: KeepDirective::Lowest,
        })
    }

    /// The die this formula keeps out of `dice`, or `None` when nothing was rolled.
    pub fn kept(&self, dice: &[u8]) -> Option<u8> {
        match self.keep {
            KeepDirective::Highest => dice.iter().copied().max(),
            KeepDirective::Lowest => dice.iter().copied().min(),
        }
    }
}

impl fmt::Display for RollFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d{}{}",
            self.dice_count,
            self.die_size,
            self.keep.suffix()
        )
    }
}

/// Number of dice showing the maximum face.
pub fn count_sixes(dice: &[u8]) -> usize {
    dice.iter().filter(|&&d| d == DIE_SIZE).count()
}

/// Two or more sixes anywhere in the roll, whichever die was kept.
pub fn is_critical(dice: &[u8]) -> bool {
    count_sixes(dice) >= 2
}

/// Dice results the host reports back for a finished roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceOutcome {
    /// The kept value (highest or lowest die)
    pub result: u8,
    /// Every die rolled, in roll order
    pub dice: Vec<u8>,
}

impl DiceOutcome {
    pub fn new(result: u8, dice: Vec<u8>) -> Self {
        Self { result, dice }
    }

    pub fn is_critical(&self) -> bool {
        is_critical(&self.dice)
    }
}
