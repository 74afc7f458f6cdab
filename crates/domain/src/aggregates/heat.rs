//! Heat gauge and the disengagement pool it leaves.

use crate::fields::{HEAT, HEAT_DICE};
use crate::value_objects::{FieldPatch, FieldSnapshot};

/// Segments on the heat gauge.
pub const SEGMENTS: i32 = 8;

/// Dice left for disengagement: one per unfilled segment.
pub fn available_dice(filled: i32) -> i32 {
    SEGMENTS - filled.clamp(0, SEGMENTS)
}

pub fn dependencies() -> Vec<String> {
    vec![HEAT.to_string(), HEAT_DICE.to_string()]
}

pub fn dice_from_snapshot(snapshot: &FieldSnapshot) -> i32 {
    available_dice(snapshot.int(HEAT, 0))
}

pub fn recompute(snapshot: &FieldSnapshot) -> FieldPatch {
    FieldPatch::computed()
        .with(HEAT_DICE, dice_from_snapshot(snapshot))
        .suppress_unchanged(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dice_shrink_as_heat_fills() {
        assert_eq!(available_dice(0), 8);
        assert_eq!(available_dice(3), 5);
        assert_eq!(available_dice(SEGMENTS), 0);
    }

    #[test]
    fn out_of_range_gauge_is_clamped() {
        assert_eq!(available_dice(11), 0);
        assert_eq!(available_dice(-2), 8);
    }

    #[test]
    fn recompute_writes_once() {
        let snapshot = FieldSnapshot::new().with(HEAT, "6");
        let patch = recompute(&snapshot);
        assert_eq!(patch.get(HEAT_DICE), Some("2"));
        assert!(recompute(&snapshot.with(HEAT_DICE, "2")).is_empty());
    }
}
