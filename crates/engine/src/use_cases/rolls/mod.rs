//! Roll use cases.
//!
//! Every roll goes through the same pipeline: read the roll's inputs and the
//! modifier buffers, compute the pool, reset the buffers, request the roll,
//! classify the dice and complete the roll with its label.

use std::collections::BTreeMap;
use std::sync::Arc;

use babel_domain::aggregates::{heat, maintenance};
use babel_domain::fields::{
    CHARACTER_NAME, CREW_TIER, ENGAGEMENT_DICE, FORTUNE_DICE, HEAT, MAINTENANCE_CLOCKS,
    MAINTENANCE_PAID,
};
use babel_domain::game_systems::{cohort_status, maintenance_decision, resolve};
use babel_domain::{
    Action, Attribute, CohortKind, FieldSnapshot, PoolDecision, RollContext, RollFormula,
    RollKind, RowId, Section,
};
use tracing::instrument;

use super::{write_changes, CompletedRoll, HandlerOutcome, SheetError};
use crate::infrastructure::ports::{RollPort, RollRequest, SheetStore};

/// Engagement pool when the sheet has no value.
pub const DEFAULT_ENGAGEMENT_DICE: i32 = 1;

/// Inputs captured for one roll, after the modifier buffers were reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRoll {
    pub snapshot: FieldSnapshot,
    pub context: RollContext,
    pub base_dice: i32,
    pub dice: i32,
}

impl PreparedRoll {
    fn character_name(&self) -> &str {
        self.snapshot.text(CHARACTER_NAME)
    }
}

/// Container for roll use cases.
pub struct RollUseCases {
    store: Arc<dyn SheetStore>,
    roller: Arc<dyn RollPort>,
}

impl RollUseCases {
    pub fn new(store: Arc<dyn SheetStore>, roller: Arc<dyn RollPort>) -> Self {
        Self { store, roller }
    }

    /// Reads `fields` plus the modifier buffers, computes the pool and
    /// resets the buffers before any dice are requested.
    pub async fn prepare<F>(
        &self,
        fields: Vec<String>,
        base_dice: F,
        outcome: &mut HandlerOutcome,
    ) -> Result<PreparedRoll, SheetError>
    where
        F: FnOnce(&FieldSnapshot) -> i32 + Send,
    {
        let mut names = fields;
        names.extend(RollContext::FIELDS.iter().map(|f| f.to_string()));
        names.push(CHARACTER_NAME.to_string());

        let snapshot = self.store.read_fields(&names).await?;
        let base = base_dice(&snapshot);
        let context = RollContext::from_snapshot(&snapshot);
        let dice = context.final_dice(base);

        write_changes(
            self.store.as_ref(),
            RollContext::reset_patch(),
            &snapshot,
            outcome,
        )
        .await?;

        Ok(PreparedRoll {
            snapshot,
            context,
            base_dice: base,
            dice,
        })
    }

    /// Requests `request`, classifies the dice and completes the roll.
    async fn perform(
        &self,
        request: RollRequest,
        outcome: &mut HandlerOutcome,
    ) -> Result<(), SheetError> {
        let result = self.roller.request_roll(&request).await?;

        let (label, fields) = match &result.dice {
            Some(dice) => {
                let resolution = resolve(request.kind, dice, &request.context);
                (resolution.label, resolution.fields)
            }
            None => {
                let label = request.note.clone().unwrap_or_default();
                let fields = BTreeMap::from([("outcome".to_string(), label.clone())]);
                (label, fields)
            }
        };

        self.roller.complete_roll(&result.roll_id, &fields).await?;
        tracing::info!(
            kind = %request.kind,
            roll_id = %result.roll_id,
            label = %label,
            "Roll completed"
        );

        outcome.rolls.push(CompletedRoll {
            roll_id: result.roll_id,
            kind: request.kind,
            roll_string: request.roll_string(),
            label,
            fields,
        });
        Ok(())
    }

    async fn roll_pool(
        &self,
        kind: RollKind,
        title: &str,
        prepared: PreparedRoll,
        mut outcome: HandlerOutcome,
    ) -> Result<HandlerOutcome, SheetError> {
        let request = RollRequest::new(kind, title, RollFormula::for_pool(prepared.dice))
            .with_character(prepared.character_name())
            .with_context(prepared.context);
        self.perform(request, &mut outcome).await?;
        Ok(outcome)
    }

    #[instrument(skip(self))]
    pub async fn roll_action(&self, action: Action) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();
        let prepared = self
            .prepare(vec![action.as_str().to_string()], |s| action.rating(s), &mut outcome)
            .await?;
        self.roll_pool(RollKind::Action, &title_case(action.as_str()), prepared, outcome)
            .await
    }

    #[instrument(skip(self))]
    pub async fn roll_resistance(&self, attribute: Attribute) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();
        let prepared = self
            .prepare(attribute.dependencies(), |s| attribute.rating(s), &mut outcome)
            .await?;
        let title = format!("{} Resistance", title_case(attribute.as_str()));
        self.roll_pool(RollKind::Resistance, &title, prepared, outcome)
            .await
    }

    #[instrument(skip(self))]
    pub async fn roll_fortune(&self) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();
        let prepared = self
            .prepare(vec![FORTUNE_DICE.to_string()], |s| s.int(FORTUNE_DICE, 0), &mut outcome)
            .await?;
        self.roll_pool(RollKind::Fortune, "Fortune", prepared, outcome)
            .await
    }

    /// Indulging a vice rolls the lowest attribute rating.
    #[instrument(skip(self))]
    pub async fn roll_vice(&self) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();
        let fields = Action::ALL.iter().map(|a| a.as_str().to_string()).collect();
        let prepared = self.prepare(fields, lowest_attribute, &mut outcome).await?;
        self.roll_pool(RollKind::Vice, "Indulge Vice", prepared, outcome)
            .await
    }

    #[instrument(skip(self))]
    pub async fn roll_disengage(&self) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();
        let prepared = self
            .prepare(vec![HEAT.to_string()], heat::dice_from_snapshot, &mut outcome)
            .await?;
        self.roll_pool(RollKind::Disengage, "Disengagement", prepared, outcome)
            .await
    }

    #[instrument(skip(self))]
    pub async fn roll_engagement(&self) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();
        let prepared = self
            .prepare(
                vec![ENGAGEMENT_DICE.to_string()],
                |s| s.int(ENGAGEMENT_DICE, DEFAULT_ENGAGEMENT_DICE),
                &mut outcome,
            )
            .await?;
        self.roll_pool(RollKind::Engagement, "Engagement", prepared, outcome)
            .await
    }

    /// Lowest of one die per unpaid clock; nothing to roll when all are paid.
    #[instrument(skip(self))]
    pub async fn roll_maintenance(&self) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();
        let prepared = self
            .prepare(
                vec![MAINTENANCE_CLOCKS.to_string(), MAINTENANCE_PAID.to_string()],
                maintenance::unpaid_clocks,
                &mut outcome,
            )
            .await?;

        let pool = if prepared.base_dice > 0 {
            prepared.dice.max(1)
        } else {
            0
        };
        let request = match maintenance_decision(pool) {
            PoolDecision::Roll(formula) => {
                RollRequest::new(RollKind::Maintenance, "Maintenance", formula)
                    .with_context(prepared.context.clone())
            }
            PoolDecision::Settled(label) => {
                RollRequest::without_dice(RollKind::Maintenance, "Maintenance", label)
            }
        }
        .with_character(prepared.character_name());

        self.perform(request, &mut outcome).await?;
        Ok(outcome)
    }

    /// Rolls the cohort in `row`. Broken and dead cohorts do not roll.
    #[instrument(skip(self))]
    pub async fn roll_cohort(&self, row: &RowId) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();
        let section = Section::Cohorts;
        let fields = vec![
            CREW_TIER.to_string(),
            section.field(row, "name"),
            section.field(row, "type"),
            section.field(row, "elite"),
            section.field(row, "harm"),
        ];
        let status = |s: &FieldSnapshot| {
            cohort_status(
                s.int(CREW_TIER, 0),
                CohortKind::from_field(s.text(&section.field(row, "type"))),
                s.flag(&section.field(row, "elite")),
                s.int(&section.field(row, "harm"), 0),
            )
        };
        let prepared = self
            .prepare(fields, |s| status(s).dice(), &mut outcome)
            .await?;

        let name = prepared.snapshot.text(&section.field(row, "name")).trim();
        let title = if name.is_empty() { "Cohort" } else { name }.to_string();

        match status(&prepared.snapshot).settled_label() {
            None => {
                self.roll_pool(RollKind::Cohort, &title, prepared, outcome)
                    .await
            }
            Some(terminal) => {
                let request = RollRequest::without_dice(RollKind::Cohort, title, terminal)
                    .with_character(prepared.character_name());
                self.perform(request, &mut outcome).await?;
                Ok(outcome)
            }
        }
    }

    /// Dice-less message roll.
    #[instrument(skip(self))]
    pub async fn roll_note(&self, title: &str, note: &str) -> Result<HandlerOutcome, SheetError> {
        let mut outcome = HandlerOutcome::new();
        let snapshot = self
            .store
            .read_fields(&[CHARACTER_NAME.to_string()])
            .await?;
        let request = RollRequest::note(title, note).with_character(snapshot.text(CHARACTER_NAME));
        self.perform(request, &mut outcome).await?;
        Ok(outcome)
    }
}

fn lowest_attribute(snapshot: &FieldSnapshot) -> i32 {
    Attribute::ALL
        .iter()
        .map(|attribute| attribute.rating(snapshot))
        .min()
        .unwrap_or(0)
}

/// "street_warrior" -> "Street Warrior"
pub(crate) fn title_case(value: &str) -> String {
    value
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
