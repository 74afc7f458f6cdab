//! Use cases - one handler per logical sheet event.
//!
//! Each handler reads its dependency set, computes through the domain crate
//! and writes back only what changed.

mod error;
mod outcome;

pub mod derived;
pub mod population;
pub mod rolls;

pub use derived::DerivedUseCases;
pub use error::SheetError;
pub use outcome::{CompletedRoll, HandlerOutcome};
pub use population::PopulationUseCases;
pub use rolls::RollUseCases;

use babel_domain::{FieldPatch, FieldSnapshot};

use crate::infrastructure::ports::SheetStore;

/// Writes the part of `patch` that differs from `snapshot` and records it.
pub(crate) async fn write_changes(
    store: &dyn SheetStore,
    patch: FieldPatch,
    snapshot: &FieldSnapshot,
    outcome: &mut HandlerOutcome,
) -> Result<(), SheetError> {
    let patch = patch.suppress_unchanged(snapshot);
    if patch.is_empty() {
        tracing::debug!("Nothing changed, write suppressed");
        return Ok(());
    }
    store.write_fields(&patch).await?;
    outcome.patches.push(patch);
    Ok(())
}
