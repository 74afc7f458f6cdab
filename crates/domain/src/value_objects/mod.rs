//! Value objects - Immutable objects defined by their attributes

mod dice;
mod roll_context;
mod snapshot;

pub use dice::{
    count_sixes, is_critical, DiceOutcome, KeepDirective, RollFormula, DIE_SIZE, ZERO_DICE_COUNT,
};
pub use roll_context::{modifier_note, Effect, Position, RollContext};
pub use snapshot::{FieldPatch, FieldSnapshot, WriteProvenance};
