//! Population use cases.
//!
//! Selecting a playbook or crew type fills the sheet from the catalogue;
//! the reset buttons do the same after wiping the related sections.

use std::sync::Arc;

use babel_domain::fields::{CREW_TYPE, PLAYBOOK};
use babel_domain::population::{crew_plan, faction_rows, playbook_dependencies, playbook_plan};
use babel_domain::repeating::autogen_fields;
use babel_domain::{
    Catalogue, PopulationPlan, RowId, RowTemplate, Section, SyncMode, SyncPlan,
};
use tracing::instrument;

use super::{write_changes, HandlerOutcome, RollUseCases, SheetError};
use crate::infrastructure::ports::SheetStore;

/// Fixed-slot counts on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCounts {
    pub friends: usize,
    pub contacts: usize,
}

/// Container for population use cases.
pub struct PopulationUseCases {
    store: Arc<dyn SheetStore>,
    catalogue: Arc<Catalogue>,
    rolls: Arc<RollUseCases>,
    slots: SlotCounts,
}

impl PopulationUseCases {
    pub fn new(
        store: Arc<dyn SheetStore>,
        catalogue: Arc<Catalogue>,
        rolls: Arc<RollUseCases>,
        slots: SlotCounts,
    ) -> Self {
        Self {
            store,
            catalogue,
            rolls,
            slots,
        }
    }

    /// Fills the sheet from the selected playbook, keeping player rows.
    #[instrument(skip(self))]
    pub async fn select_playbook(&self) -> Result<HandlerOutcome, SheetError> {
        self.populate_playbook(SyncMode::Incremental).await
    }

    /// Rebuilds the playbook sections from scratch.
    #[instrument(skip(self))]
    pub async fn reset_playbook(&self) -> Result<HandlerOutcome, SheetError> {
        if self.selection(PLAYBOOK).await?.is_empty() {
            return self
                .rolls
                .roll_note("Reset Playbook", "Select a playbook before resetting it.")
                .await;
        }
        self.populate_playbook(SyncMode::FullReset).await
    }

    #[instrument(skip(self))]
    pub async fn select_crew(&self) -> Result<HandlerOutcome, SheetError> {
        self.populate_crew(SyncMode::Incremental).await
    }

    #[instrument(skip(self))]
    pub async fn reset_crew(&self) -> Result<HandlerOutcome, SheetError> {
        if self.selection(CREW_TYPE).await?.is_empty() {
            return self
                .rolls
                .roll_note("Reset Crew", "Select a crew type before resetting it.")
                .await;
        }
        self.populate_crew(SyncMode::FullReset).await
    }

    /// Replaces every faction row with the catalogue roster.
    #[instrument(skip(self))]
    pub async fn reset_factions(&self) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();
        self.sync_section(
            Section::Factions,
            SyncMode::FullReset,
            faction_rows(&self.catalogue),
            &mut outcome,
        )
        .await?;
        tracing::info!(factions = outcome.created_rows.len(), "Faction roster reset");
        Ok(outcome)
    }

    /// Populates the faction roster when the section is empty.
    #[instrument(skip(self))]
    pub async fn ensure_faction_roster(&self) -> Result<HandlerOutcome, SheetError> {
        if !self.store.list_rows(Section::Factions).await?.is_empty() {
            return Ok(HandlerOutcome::new());
        }
        self.reset_factions().await
    }

    async fn selection(&self, field: &str) -> Result<String, SheetError> {
        let snapshot = self.store.read_fields(&[field.to_string()]).await?;
        Ok(snapshot.text(field).trim().to_string())
    }

    async fn populate_playbook(&self, mode: SyncMode) -> Result<HandlerOutcome, SheetError> {
        let mut fields = playbook_dependencies();
        fields.push(PLAYBOOK.to_string());
        let snapshot = self.store.read_fields(&fields).await?;

        let key = snapshot.text(PLAYBOOK).trim();
        let Some(playbook) = self.catalogue.playbook(key) else {
            tracing::debug!(playbook = %key, "No catalogue playbook for selection");
            return Ok(HandlerOutcome::new());
        };

        tracing::info!(playbook = %key, ?mode, "Populating playbook");
        let plan = playbook_plan(playbook, &snapshot, self.slots.friends);
        self.apply(plan, mode).await
    }

    async fn populate_crew(&self, mode: SyncMode) -> Result<HandlerOutcome, SheetError> {
        let key = self.selection(CREW_TYPE).await?;
        let Some(crew) = self.catalogue.crew(&key) else {
            tracing::debug!(crew_type = %key, "No catalogue crew for selection");
            return Ok(HandlerOutcome::new());
        };

        tracing::info!(crew_type = %key, ?mode, "Populating crew");
        self.apply(crew_plan(crew, self.slots.contacts), mode).await
    }

    async fn apply(
        &self,
        plan: PopulationPlan,
        mode: SyncMode,
    ) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();

        let names: Vec<String> = plan.patch.field_names().map(String::from).collect();
        let current = self.store.read_fields(&names).await?;
        write_changes(self.store.as_ref(), plan.patch, &current, &mut outcome).await?;

        for targets in plan.sections {
            self.sync_section(targets.section, mode, targets.rows, &mut outcome)
                .await?;
        }
        Ok(outcome)
    }

    /// Deletes the rows `mode` selects, then creates one generated row per
    /// template.
    async fn sync_section(
        &self,
        section: Section,
        mode: SyncMode,
        templates: Vec<RowTemplate>,
        outcome: &mut HandlerOutcome,
    ) -> Result<(), SheetError> {
        let rows = self.store.list_rows(section).await?;
        let snapshot = self
            .store
            .read_fields(&autogen_fields(section, &rows))
            .await?;
        let plan = SyncPlan::new(section, mode, &rows, &snapshot, templates);

        for row in &plan.delete {
            self.store.delete_row(section, row).await?;
            outcome.removed_rows.push((section, row.clone()));
        }

        let ids: Vec<RowId> = plan.create.iter().map(|_| self.store.new_row_id()).collect();
        let patch = plan.creation_patch(&ids);
        if !patch.is_empty() {
            self.store.write_fields(&patch).await?;
            outcome.patches.push(patch);
        }
        outcome
            .created_rows
            .extend(ids.into_iter().map(|id| (section, id)));

        tracing::debug!(
            section = %section.as_str(),
            deleted = plan.delete.len(),
            created = plan.create.len(),
            "Section synchronized"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use babel_domain::{FieldSnapshot, Playbook, RollId, StartingItem};

    use crate::infrastructure::ports::{MockRollPort, MockSheetStore, RollResult};

    fn catalogue() -> Arc<Catalogue> {
        let mut catalogue = Catalogue::default();
        catalogue.playbooks.insert(
            "hacker".into(),
            Playbook {
                title: "Hacker".into(),
                xp_trigger: "Knowledge or technological prowess".into(),
                actions: BTreeMap::from([("hack".to_string(), 2)]),
                items: vec![StartingItem {
                    name: "Cyberdeck".into(),
                    load: 2,
                    special: false,
                }],
                ..Default::default()
            },
        );
        Arc::new(catalogue)
    }

    fn use_cases(store: MockSheetStore, roller: MockRollPort) -> PopulationUseCases {
        let store: Arc<dyn SheetStore> = Arc::new(store);
        let rolls = Arc::new(RollUseCases::new(store.clone(), Arc::new(roller)));
        PopulationUseCases::new(
            store,
            catalogue(),
            rolls,
            SlotCounts {
                friends: 2,
                contacts: 2,
            },
        )
    }

    #[tokio::test]
    async fn select_playbook_keeps_player_rows() {
        let mut store = MockSheetStore::new();
        store.expect_read_fields().returning(|names| {
            if names.contains(&"playbook".to_string()) {
                Ok(FieldSnapshot::new().with("playbook", "hacker").with("hack", "1"))
            } else {
                Ok(FieldSnapshot::new()
                    .with("repeating_items_old_autogen", "1")
                    .with("repeating_items_mine_autogen", "0"))
            }
        });
        store
            .expect_list_rows()
            .returning(|section| match section {
                Section::Items => Ok(vec![RowId::new("old"), RowId::new("mine")]),
                _ => Ok(vec![]),
            });
        store
            .expect_delete_row()
            .withf(|section, row| *section == Section::Items && row.as_str() == "old")
            .times(1)
            .returning(|_, _| Ok(()));
        let counter = AtomicUsize::new(0);
        store.expect_new_row_id().returning(move || {
            RowId::new(format!("new{}", counter.fetch_add(1, Ordering::SeqCst)))
        });
        store.expect_write_fields().returning(|_| Ok(()));

        let outcome = use_cases(store, MockRollPort::new())
            .select_playbook()
            .await
            .expect("population succeeds");

        assert_eq!(outcome.written("playbook_title"), Some("Hacker"));
        assert_eq!(outcome.written("hack"), Some("2"));
        assert_eq!(outcome.written("friend_1"), Some(""));
        assert_eq!(outcome.written("repeating_items_new0_name"), Some("Cyberdeck"));
        assert_eq!(outcome.written("repeating_items_new0_autogen"), Some("1"));
        assert_eq!(outcome.removed_rows, vec![(Section::Items, RowId::new("old"))]);
        assert_eq!(outcome.created_rows, vec![(Section::Items, RowId::new("new0"))]);
    }

    #[tokio::test]
    async fn unknown_playbook_is_a_no_op() {
        let mut store = MockSheetStore::new();
        store
            .expect_read_fields()
            .returning(|_| Ok(FieldSnapshot::new().with("playbook", "wizard")));
        store.expect_write_fields().never();
        store.expect_list_rows().never();

        let outcome = use_cases(store, MockRollPort::new())
            .select_playbook()
            .await
            .expect("no-op succeeds");
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn reset_without_selection_sends_note() {
        let mut store = MockSheetStore::new();
        store
            .expect_read_fields()
            .returning(|_| Ok(FieldSnapshot::new()));
        store.expect_delete_row().never();

        let mut roller = MockRollPort::new();
        roller
            .expect_request_roll()
            .withf(|request| request.formula.is_none() && request.note.is_some())
            .times(1)
            .returning(|_| {
                Ok(RollResult {
                    roll_id: RollId::new("n1"),
                    dice: None,
                })
            });
        roller.expect_complete_roll().returning(|_, _| Ok(()));

        let outcome = use_cases(store, roller)
            .reset_crew()
            .await
            .expect("note roll succeeds");
        assert_eq!(outcome.rolls.len(), 1);
        assert!(outcome.rolls[0].label.contains("crew type"));
    }

    #[tokio::test]
    async fn faction_roster_left_alone_when_present() {
        let mut store = MockSheetStore::new();
        store
            .expect_list_rows()
            .returning(|_| Ok(vec![RowId::new("f1")]));
        store.expect_delete_row().never();
        store.expect_write_fields().never();

        let outcome = use_cases(store, MockRollPort::new())
            .ensure_faction_roster()
            .await
            .expect("check succeeds");
        assert!(outcome.is_empty());
    }
}
