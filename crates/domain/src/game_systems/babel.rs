//! Dark City, Shining Babel roll resolution.
//!
//! The game uses Forged-in-the-Dark d6 pools:
//! - Roll the pool, keep the highest die (zero dice: roll two, keep lowest)
//! - 6 is a full success, 4-5 a mixed result, 1-3 a bad one
//! - Two or more sixes anywhere in the roll is a critical
//!
//! Each roll kind maps those tiers to its own labels and may add extra
//! fields (stress taken, stress cleared, improved effect).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{DiceOutcome, RollContext, RollFormula, DIE_SIZE};

/// Outcome tier shared by every roll kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    /// Multiple 6s - overrides everything else
    Critical,
    /// Kept die is 6
    Success,
    /// Kept die is 4-5
    PartialSuccess,
    /// Kept die is 1-3
    Failure,
}

impl OutcomeTier {
    /// Tier from the kept result and the critical flag.
    pub fn classify(result: u8, critical: bool) -> Self {
        if critical {
            OutcomeTier::Critical
        } else if result >= DIE_SIZE {
            OutcomeTier::Success
        } else if result >= 4 {
            OutcomeTier::PartialSuccess
        } else {
            OutcomeTier::Failure
        }
    }
}

/// Every kind of roll the sheet can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollKind {
    Action,
    Resistance,
    Fortune,
    Vice,
    Disengage,
    Engagement,
    Maintenance,
    Cohort,
    /// Dice-less message roll used to report problems to the player
    Note,
}

impl RollKind {
    pub const ALL: [RollKind; 9] = [
        RollKind::Action,
        RollKind::Resistance,
        RollKind::Fortune,
        RollKind::Vice,
        RollKind::Disengage,
        RollKind::Engagement,
        RollKind::Maintenance,
        RollKind::Cohort,
        RollKind::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RollKind::Action => "action",
            RollKind::Resistance => "resistance",
            RollKind::Fortune => "fortune",
            RollKind::Vice => "vice",
            RollKind::Disengage => "disengage",
            RollKind::Engagement => "engagement",
            RollKind::Maintenance => "maintenance",
            RollKind::Cohort => "cohort",
            RollKind::Note => "note",
        }
    }

    /// Host roll template that renders this kind.
    pub fn template(&self) -> String {
        format!("dcsb-{}", self.as_str())
    }

    /// Label table: critical, 6, 4-5, 1-3.
    fn labels(&self) -> [&'static str; 4] {
        match self {
            RollKind::Action | RollKind::Cohort => {
                ["Critical Success", "Success", "Partial Success", "Failure"]
            }
            RollKind::Fortune | RollKind::Note => {
                ["Critical", "Full Result", "Partial Result", "Poor Result"]
            }
            RollKind::Disengage => [
                "Clean Getaway",
                "Escaped",
                "Escaped with Complications",
                "Caught: Suffer All Three",
            ],
            RollKind::Engagement => [
                "Exceptional Start",
                "Controlled Position",
                "Risky Position",
                "Desperate Position",
            ],
            RollKind::Maintenance => ["Flawless Upkeep", "Systems Hold", "Glitch", "Malfunction"],
            // Resistance and vice labels are computed from the result
            RollKind::Resistance | RollKind::Vice => ["", "", "", ""],
        }
    }

    /// Narrative label for a classified roll.
    pub fn label(&self, tier: OutcomeTier, result: u8) -> String {
        match self {
            RollKind::Resistance => match tier {
                OutcomeTier::Critical => "Critical: Clear 1 Stress".to_string(),
                _ => format!("Take {} Stress", resistance_stress(result, false)),
            },
            RollKind::Vice => format!("Clear {} Stress", result),
            _ => {
                let labels = self.labels();
                let index = match tier {
                    OutcomeTier::Critical => 0,
                    OutcomeTier::Success => 1,
                    OutcomeTier::PartialSuccess => 2,
                    OutcomeTier::Failure => 3,
                };
                labels[index].to_string()
            }
        }
    }
}

impl fmt::Display for RollKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RollKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RollKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::parse(format!("Unknown roll kind: {}", s)))
    }
}

/// Stress a resistance roll costs: 6 minus the kept die, none on a critical.
pub fn resistance_stress(result: u8, critical: bool) -> i32 {
    if critical {
        0
    } else {
        (i32::from(DIE_SIZE) - i32::from(result)).max(0)
    }
}

/// Label and extra display fields attached when a roll is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub tier: OutcomeTier,
    pub label: String,
    pub fields: BTreeMap<String, String>,
}

/// Classifies a finished roll of `kind`.
pub fn resolve(kind: RollKind, outcome: &DiceOutcome, context: &RollContext) -> Resolution {
    let critical = outcome.is_critical();
    let tier = OutcomeTier::classify(outcome.result, critical);
    let label = kind.label(tier, outcome.result);

    let mut fields = BTreeMap::new();
    fields.insert("outcome".to_string(), label.clone());
    fields.insert("critical".to_string(), u8::from(critical).to_string());

    match kind {
        RollKind::Resistance => {
            let stress = resistance_stress(outcome.result, critical);
            fields.insert("stress".to_string(), stress.to_string());
            fields.insert(
                "stress_cleared".to_string(),
                u8::from(critical).to_string(),
            );
        }
        RollKind::Vice => {
            fields.insert("stress_cleared".to_string(), outcome.result.to_string());
        }
        RollKind::Action | RollKind::Cohort if critical => {
            fields.insert("effect".to_string(), context.effect.increase().to_string());
        }
        _ => {}
    }

    Resolution {
        tier,
        label,
        fields,
    }
}

/// What a roll handler should do before touching the dice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolDecision {
    /// Request this formula from the host.
    Roll(RollFormula),
    /// No dice needed; report this label directly.
    Settled(String),
}

/// Maintenance failure roll: lowest of one die per unpaid clock.
pub fn maintenance_decision(unpaid_clocks: i32) -> PoolDecision {
    match RollFormula::lowest_of(unpaid_clocks) {
        Some(formula) => PoolDecision::Roll(formula),
        None => PoolDecision::Settled("Nothing Due".to_string()),
    }
}

/// Harm at which a cohort stops acting.
pub const COHORT_BROKEN_HARM: i32 = 3;
/// Harm at which a cohort is lost.
pub const COHORT_DEAD_HARM: i32 = 4;

/// Gangs act in numbers; experts are specialists with a bonus die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CohortKind {
    #[default]
    Gang,
    Expert,
}

impl CohortKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CohortKind::Gang => "gang",
            CohortKind::Expert => "expert",
        }
    }

    /// Lenient read of a row field: anything but "expert" is a gang.
    pub fn from_field(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("expert") {
            CohortKind::Expert
        } else {
            CohortKind::Gang
        }
    }
}

/// Whether a cohort can act, and with how many dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CohortStatus {
    Active(i32),
    Broken,
    Dead,
}

impl CohortStatus {
    /// Base dice; a cohort that cannot act has none.
    pub fn dice(&self) -> i32 {
        match self {
            CohortStatus::Active(dice) => *dice,
            CohortStatus::Broken | CohortStatus::Dead => 0,
        }
    }

    /// Label reported instead of a roll when the cohort cannot act.
    pub fn settled_label(&self) -> Option<&'static str> {
        match self {
            CohortStatus::Active(_) => None,
            CohortStatus::Broken => Some("Broken"),
            CohortStatus::Dead => Some("Dead"),
        }
    }
}

/// Crew tier, plus one for experts and one for elites, minus harm.
pub fn cohort_status(crew_tier: i32, kind: CohortKind, elite: bool, harm: i32) -> CohortStatus {
    if harm >= COHORT_DEAD_HARM {
        return CohortStatus::Dead;
    }
    if harm >= COHORT_BROKEN_HARM {
        return CohortStatus::Broken;
    }
    let type_bonus = i32::from(kind == CohortKind::Expert);
    let elite_bonus = i32::from(elite);
    CohortStatus::Active(
        crew_tier
            .saturating_add(type_bonus)
            .saturating_add(elite_bonus)
            .saturating_sub(harm.max(0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::Effect;

    #[test]
    fn tiers_from_results() {
        assert_eq!(OutcomeTier::classify(6, false), OutcomeTier::Success);
        assert_eq!(OutcomeTier::classify(5, false), OutcomeTier::PartialSuccess);
        assert_eq!(OutcomeTier::classify(4, false), OutcomeTier::PartialSuccess);
        assert_eq!(OutcomeTier::classify(3, false), OutcomeTier::Failure);
        assert_eq!(OutcomeTier::classify(1, true), OutcomeTier::Critical);
    }

    #[test]
    fn action_critical_beats_success_and_raises_effect() {
        let context = RollContext::new(Default::default(), Effect::Standard, 1);
        let resolution = resolve(RollKind::Action, &DiceOutcome::new(6, vec![5, 6, 6]), &context);
        assert_eq!(resolution.tier, OutcomeTier::Critical);
        assert_eq!(resolution.label, "Critical Success");
        assert_eq!(resolution.fields.get("critical").map(String::as_str), Some("1"));
        assert_eq!(resolution.fields.get("effect").map(String::as_str), Some("great"));
    }

    #[test]
    fn resistance_stress_messages() {
        let context = RollContext::default();
        let partial = resolve(RollKind::Resistance, &DiceOutcome::new(4, vec![4, 1]), &context);
        assert_eq!(partial.label, "Take 2 Stress");
        assert_eq!(partial.fields.get("stress").map(String::as_str), Some("2"));

        let critical = resolve(RollKind::Resistance, &DiceOutcome::new(6, vec![6, 6]), &context);
        assert_eq!(critical.label, "Critical: Clear 1 Stress");
        assert_eq!(critical.fields.get("stress").map(String::as_str), Some("0"));
        assert_eq!(critical.fields.get("stress_cleared").map(String::as_str), Some("1"));

        assert_eq!(resistance_stress(6, false), 0);
        assert_eq!(resistance_stress(1, false), 5);
    }

    #[test]
    fn vice_clears_result() {
        let resolution = resolve(RollKind::Vice, &DiceOutcome::new(3, vec![3, 2]), &RollContext::default());
        assert_eq!(resolution.label, "Clear 3 Stress");
        assert_eq!(resolution.fields.get("stress_cleared").map(String::as_str), Some("3"));
    }

    #[test]
    fn kind_specific_labels() {
        assert_eq!(RollKind::Disengage.label(OutcomeTier::Failure, 2), "Caught: Suffer All Three");
        assert_eq!(RollKind::Engagement.label(OutcomeTier::PartialSuccess, 5), "Risky Position");
        assert_eq!(RollKind::Maintenance.label(OutcomeTier::Success, 6), "Systems Hold");
        assert_eq!(RollKind::Fortune.label(OutcomeTier::Critical, 6), "Critical");
        assert_eq!(RollKind::Cohort.template(), "dcsb-cohort");
    }

    #[test]
    fn maintenance_short_circuits_without_clocks() {
        assert_eq!(
            maintenance_decision(0),
            PoolDecision::Settled("Nothing Due".to_string())
        );
        match maintenance_decision(2) {
            PoolDecision::Roll(formula) => assert_eq!(formula.to_string(), "2d6kl1"),
            other => panic!("expected a roll, got {:?}", other),
        }
    }

    #[test]
    fn cohort_pools() {
        assert_eq!(cohort_status(2, CohortKind::Gang, false, 0), CohortStatus::Active(2));
        assert_eq!(cohort_status(2, CohortKind::Expert, true, 1), CohortStatus::Active(3));
        assert_eq!(cohort_status(0, CohortKind::Gang, false, 2), CohortStatus::Active(-2));
        assert_eq!(cohort_status(4, CohortKind::Expert, true, 3), CohortStatus::Broken);
        assert_eq!(cohort_status(4, CohortKind::Expert, true, 4), CohortStatus::Dead);
        assert_eq!(CohortStatus::Broken.settled_label(), Some("Broken"));
        assert_eq!(CohortStatus::Active(3).settled_label(), None);
        assert_eq!(CohortStatus::Dead.dice(), 0);
        assert_eq!(CohortKind::from_field("Expert"), CohortKind::Expert);
        assert_eq!(CohortKind::from_field(""), CohortKind::Gang);
    }

    #[test]
    fn cohort_pool_saturates_on_huge_tiers() {
        assert_eq!(
            cohort_status(i32::MAX, CohortKind::Expert, true, 0),
            CohortStatus::Active(i32::MAX)
        );
        assert_eq!(
            cohort_status(i32::MIN, CohortKind::Gang, false, 2),
            CohortStatus::Active(i32::MIN)
        );
    }

    #[test]
    fn roll_kind_names() {
        for kind in RollKind::ALL {
            assert_eq!(kind.as_str().parse::<RollKind>(), Ok(kind));
        }
    }
}
