//! Derived-field recomputation.
//!
//! Attribute ratings, load, maintenance, heat dice and claim accessibility.
//! Every handler reads its full dependency set (outputs included) so
//! unchanged outputs are never rewritten.

use std::sync::Arc;

use babel_domain::aggregates::{claims, heat, load, maintenance};
use babel_domain::{Attribute, Section};
use tracing::instrument;

use super::{write_changes, HandlerOutcome, SheetError};
use crate::infrastructure::ports::SheetStore;

/// Container for derived-value use cases.
pub struct DerivedUseCases {
    store: Arc<dyn SheetStore>,
}

impl DerivedUseCases {
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn recompute_attribute(
        &self,
        attribute: Attribute,
    ) -> Result<HandlerOutcome, SheetError> {
        let snapshot = self.store.read_fields(&attribute.dependencies()).await?;
        let mut outcome = HandlerOutcome::new();
        write_changes(
            self.store.as_ref(),
            attribute.recompute(&snapshot),
            &snapshot,
            &mut outcome,
        )
        .await?;
        Ok(outcome)
    }

    #[instrument(skip(self))]
    pub async fn recompute_load(&self) -> Result<HandlerOutcome, SheetError> {
        let rows = self.store.list_rows(Section::Items).await?;
        let snapshot = self.store.read_fields(&load::dependencies(&rows)).await?;
        let mut outcome = HandlerOutcome::new();
        write_changes(
            self.store.as_ref(),
            load::recompute(&snapshot, &rows),
            &snapshot,
            &mut outcome,
        )
        .await?;
        Ok(outcome)
    }

    #[instrument(skip(self))]
    pub async fn recompute_maintenance(&self) -> Result<HandlerOutcome, SheetError> {
        let rows = self.store.list_rows(Section::Augments).await?;
        let snapshot = self
            .store
            .read_fields(&maintenance::dependencies(&rows))
            .await?;
        let mut outcome = HandlerOutcome::new();
        write_changes(
            self.store.as_ref(),
            maintenance::recompute(&snapshot, &rows),
            &snapshot,
            &mut outcome,
        )
        .await?;
        Ok(outcome)
    }

    #[instrument(skip(self))]
    pub async fn recompute_heat(&self) -> Result<HandlerOutcome, SheetError> {
        let snapshot = self.store.read_fields(&heat::dependencies()).await?;
        let mut outcome = HandlerOutcome::new();
        write_changes(
            self.store.as_ref(),
            heat::recompute(&snapshot),
            &snapshot,
            &mut outcome,
        )
        .await?;
        Ok(outcome)
    }

    #[instrument(skip(self))]
    pub async fn recompute_claims(&self) -> Result<HandlerOutcome, SheetError> {
        let snapshot = self.store.read_fields(&claims::dependencies()).await?;
        let mut outcome = HandlerOutcome::new();
        write_changes(
            self.store.as_ref(),
            claims::recompute(&snapshot),
            &snapshot,
            &mut outcome,
        )
        .await?;
        Ok(outcome)
    }

    /// Every aggregator, in dependency-free order. Used on sheet open.
    #[instrument(skip(self))]
    pub async fn recompute_all(&self) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();
        for attribute in Attribute::ALL {
            outcome.merge(self.recompute_attribute(attribute).await?);
        }
        outcome.merge(self.recompute_load().await?);
        outcome.merge(self.recompute_maintenance().await?);
        outcome.merge(self.recompute_heat().await?);
        outcome.merge(self.recompute_claims().await?);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use babel_domain::{FieldSnapshot, RowId};

    use crate::infrastructure::ports::{MockSheetStore, PortError};

    #[tokio::test]
    async fn attribute_rating_counts_rated_actions() {
        let mut store = MockSheetStore::new();
        store
            .expect_read_fields()
            .withf(|names| names.contains(&"hack".to_string()) && names.contains(&"acuity_rating".to_string()))
            .returning(|_| {
                Ok(FieldSnapshot::new()
                    .with("hack", "2")
                    .with("recon", "0")
                    .with("scrutinize", "1")
                    .with("acuity_rating", "0"))
            });
        store
            .expect_write_fields()
            .withf(|patch| patch.get("acuity_rating") == Some("2") && patch.len() == 1)
            .times(1)
            .returning(|_| Ok(()));

        let use_case = DerivedUseCases::new(Arc::new(store));
        let outcome = use_case
            .recompute_attribute(Attribute::Acuity)
            .await
            .expect("recompute succeeds");
        assert_eq!(outcome.written("acuity_rating"), Some("2"));
    }

    #[tokio::test]
    async fn unchanged_rating_is_not_written() {
        let mut store = MockSheetStore::new();
        store.expect_read_fields().returning(|_| {
            Ok(FieldSnapshot::new()
                .with("brawl", "1")
                .with("grit_rating", "1"))
        });
        store.expect_write_fields().never();

        let use_case = DerivedUseCases::new(Arc::new(store));
        let outcome = use_case
            .recompute_attribute(Attribute::Grit)
            .await
            .expect("recompute succeeds");
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn load_skips_special_rows() {
        let mut store = MockSheetStore::new();
        store
            .expect_list_rows()
            .withf(|section| *section == Section::Items)
            .returning(|_| Ok(vec![RowId::new("a"), RowId::new("b")]));
        store.expect_read_fields().returning(|_| {
            Ok(FieldSnapshot::new()
                .with("repeating_items_a_load_1", "1")
                .with("repeating_items_a_load_2", "1")
                .with("repeating_items_b_load_1", "1")
                .with("repeating_items_b_special", "1")
                .with("load", "6"))
        });
        store
            .expect_write_fields()
            .withf(|patch| patch.get("load_total") == Some("2") && patch.get("load_max") == Some("6"))
            .times(1)
            .returning(|_| Ok(()));

        let use_case = DerivedUseCases::new(Arc::new(store));
        use_case.recompute_load().await.expect("recompute succeeds");
    }

    #[tokio::test]
    async fn maintenance_counts_installed_tiers() {
        let mut store = MockSheetStore::new();
        store
            .expect_list_rows()
            .returning(|_| Ok(vec![RowId::new("x"), RowId::new("y"), RowId::new("z")]));
        store.expect_read_fields().returning(|_| {
            Ok(FieldSnapshot::new()
                .with("repeating_augments_x_installed", "1")
                .with("repeating_augments_x_tier", "2")
                .with("repeating_augments_y_installed", "1")
                .with("repeating_augments_y_tier", "3")
                .with("repeating_augments_z_installed", "1")
                .with("repeating_augments_z_tier", "4"))
        });
        store
            .expect_write_fields()
            .withf(|patch| {
                patch.get("maintenance_ticks") == Some("9")
                    && patch.get("maintenance_clocks") == Some("2")
            })
            .times(1)
            .returning(|_| Ok(()));

        let use_case = DerivedUseCases::new(Arc::new(store));
        use_case
            .recompute_maintenance()
            .await
            .expect("recompute succeeds");
    }

    #[tokio::test]
    async fn heat_never_goes_negative() {
        let mut store = MockSheetStore::new();
        store
            .expect_read_fields()
            .returning(|_| Ok(FieldSnapshot::new().with("heat", "11")));
        store
            .expect_write_fields()
            .withf(|patch| patch.get("heat_dice") == Some("0"))
            .times(1)
            .returning(|_| Ok(()));

        let use_case = DerivedUseCases::new(Arc::new(store));
        use_case.recompute_heat().await.expect("recompute succeeds");
    }

    #[tokio::test]
    async fn storage_errors_propagate() {
        let mut store = MockSheetStore::new();
        store
            .expect_read_fields()
            .returning(|_| Err(PortError::storage("read_fields", "sheet closed")));

        let use_case = DerivedUseCases::new(Arc::new(store));
        let err = use_case.recompute_claims().await.expect_err("read fails");
        assert!(matches!(err, SheetError::Port(_)));
    }
}
