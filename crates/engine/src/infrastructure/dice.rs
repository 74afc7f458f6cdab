//! Local roll engine backed by `rand`, for running without a host.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use babel_domain::{DiceOutcome, RollFormula, RollId};
use rand::Rng;

use super::ports::{PortError, RollPort, RollRequest, RollResult};

/// Rolls real dice and logs completed rolls.
#[derive(Debug, Default)]
pub struct RandomRoller {
    next_id: AtomicU64,
}

impl RandomRoller {
    pub fn new() -> Self {
        Self::default()
    }
}

fn roll_dice(formula: &RollFormula) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..formula.dice_count)
        .map(|_| rng.gen_range(1..=formula.die_size))
        .collect()
}

#[async_trait]
impl RollPort for RandomRoller {
    async fn request_roll(&self, request: &RollRequest) -> Result<RollResult, PortError> {
        let roll_id = RollId::new(format!(
            "roll-{}",
            self.next_id.fetch_add(1, Ordering::SeqCst) + 1
        ));
        tracing::info!(roll_id = %roll_id, roll = %request.roll_string(), "Roll requested");

        let Some(formula) = request.formula else {
            return Ok(RollResult {
                roll_id,
                dice: None,
            });
        };
        let dice = roll_dice(&formula);
        let result = formula
            .kept(&dice)
            .ok_or_else(|| PortError::roll(format!("formula {formula} rolled no dice")))?;

        Ok(RollResult {
            roll_id,
            dice: Some(DiceOutcome::new(result, dice)),
        })
    }

    async fn complete_roll(
        &self,
        roll_id: &RollId,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), PortError> {
        tracing::info!(roll_id = %roll_id, ?fields, "Roll completed");
        Ok(())
    }
}
