//! Typed event dispatch.
//!
//! Routes each sheet event to its handler, then turns the handler's
//! computed writes and row removals back into events so dependent values
//! follow. Silent writes never cascade.

use std::sync::Arc;

use tracing::instrument;

use super::events::{Route, SheetEvent};
use crate::use_cases::{
    DerivedUseCases, HandlerOutcome, PopulationUseCases, RollUseCases, SheetError,
};

/// Cascade depth used when the configuration does not set one.
pub const DEFAULT_MAX_CASCADE_DEPTH: usize = 4;

pub struct Dispatcher {
    derived: Arc<DerivedUseCases>,
    rolls: Arc<RollUseCases>,
    population: Arc<PopulationUseCases>,
    max_cascade_depth: usize,
}

impl Dispatcher {
    pub fn new(
        derived: Arc<DerivedUseCases>,
        rolls: Arc<RollUseCases>,
        population: Arc<PopulationUseCases>,
        max_cascade_depth: usize,
    ) -> Self {
        Self {
            derived,
            rolls,
            population,
            max_cascade_depth,
        }
    }

    /// Handles `event` and everything it cascades into.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, event: SheetEvent) -> Result<HandlerOutcome, SheetError> {
        let mut total = HandlerOutcome::new();
        let Some(route) = event.route() else {
            tracing::debug!("No handler for event");
            return Ok(total);
        };

        let mut pending = vec![route];
        let mut depth = 0;
        loop {
            let mut next: Vec<Route> = Vec::new();
            for route in pending {
                let outcome = self.run(&route).await?;
                for cascaded in cascade_events(&outcome) {
                    if let Some(route) = cascaded.route() {
                        if !next.contains(&route) {
                            next.push(route);
                        }
                    }
                }
                total.merge(outcome);
            }

            if next.is_empty() {
                break;
            }
            if depth >= self.max_cascade_depth {
                tracing::warn!(
                    depth,
                    dropped = next.len(),
                    "Cascade depth limit reached, remaining handlers skipped"
                );
                break;
            }
            depth += 1;
            pending = next;
        }
        Ok(total)
    }

    async fn run(&self, route: &Route) -> Result<HandlerOutcome, SheetError> {
        tracing::debug!(?route, "Running handler");
        match route {
            Route::Attribute(attribute) => self.derived.recompute_attribute(*attribute).await,
            Route::Load => self.derived.recompute_load().await,
            Route::Maintenance => self.derived.recompute_maintenance().await,
            Route::Heat => self.derived.recompute_heat().await,
            Route::Claims => self.derived.recompute_claims().await,
            Route::SelectPlaybook => self.population.select_playbook().await,
            Route::SelectCrew => self.population.select_crew().await,
            Route::RollAction(action) => self.rolls.roll_action(*action).await,
            Route::RollResistance(attribute) => self.rolls.roll_resistance(*attribute).await,
            Route::RollFortune => self.rolls.roll_fortune().await,
            Route::RollVice => self.rolls.roll_vice().await,
            Route::RollDisengage => self.rolls.roll_disengage().await,
            Route::RollEngagement => self.rolls.roll_engagement().await,
            Route::RollMaintenance => self.rolls.roll_maintenance().await,
            Route::RollCohort(row) => self.rolls.roll_cohort(row).await,
            Route::ResetPlaybook => self.population.reset_playbook().await,
            Route::ResetCrew => self.population.reset_crew().await,
            Route::ResetFactions => self.population.reset_factions().await,
            Route::SheetOpened => {
                let mut outcome = self.derived.recompute_all().await?;
                outcome.merge(self.population.ensure_faction_roster().await?);
                Ok(outcome)
            }
        }
    }
}

/// Events implied by a handler's cascading writes and removals.
pub fn cascade_events(outcome: &HandlerOutcome) -> Vec<SheetEvent> {
    let changed = outcome
        .patches
        .iter()
        .filter(|patch| patch.provenance().cascades())
        .flat_map(|patch| {
            patch
                .iter()
                .map(|(name, value)| SheetEvent::field_changed(name, value))
        });
    let removed = outcome
        .removed_rows
        .iter()
        .map(|(section, row_id)| SheetEvent::RowRemoved {
            section: *section,
            row_id: row_id.clone(),
        });
    changed.chain(removed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use babel_domain::{Catalogue, FieldPatch, FieldSnapshot, RowId, Section};

    use crate::infrastructure::ports::{MockRollPort, MockSheetStore, SheetStore};
    use crate::use_cases::population::SlotCounts;

    fn dispatcher(store: MockSheetStore, max_depth: usize) -> Dispatcher {
        let store: Arc<dyn SheetStore> = Arc::new(store);
        let rolls = Arc::new(RollUseCases::new(store.clone(), Arc::new(MockRollPort::new())));
        let population = Arc::new(PopulationUseCases::new(
            store.clone(),
            Arc::new(Catalogue::default()),
            rolls.clone(),
            SlotCounts {
                friends: 5,
                contacts: 6,
            },
        ));
        Dispatcher::new(
            Arc::new(DerivedUseCases::new(store)),
            rolls,
            population,
            max_depth,
        )
    }

    #[test]
    fn silent_patches_do_not_cascade() {
        let outcome = HandlerOutcome {
            patches: vec![
                FieldPatch::silent().with("hack", 0),
                FieldPatch::computed().with("load_total", 3),
            ],
            removed_rows: vec![(Section::Augments, RowId::new("a"))],
            ..Default::default()
        };
        let events = cascade_events(&outcome);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], SheetEvent::field_changed("load_total", "3"));
        assert!(matches!(events[1], SheetEvent::RowRemoved { .. }));
    }

    #[tokio::test]
    async fn unmatched_events_are_no_ops() {
        let mut store = MockSheetStore::new();
        store.expect_read_fields().never();

        let outcome = dispatcher(store, 4)
            .dispatch(SheetEvent::field_changed("notes", "hello"))
            .await
            .expect("dispatch succeeds");
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn action_change_recomputes_rating_once() {
        let mut store = MockSheetStore::new();
        store
            .expect_read_fields()
            .times(1)
            .returning(|_| Ok(FieldSnapshot::new().with("finesse", "1")));
        store
            .expect_write_fields()
            .times(1)
            .returning(|_| Ok(()));

        let outcome = dispatcher(store, 4)
            .dispatch(SheetEvent::field_changed("finesse", "1"))
            .await
            .expect("dispatch succeeds");
        assert_eq!(outcome.written("resolve_rating"), Some("1"));
    }
}
