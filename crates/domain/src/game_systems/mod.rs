//! Game system rules.
//!
//! Dark City, Shining Babel is a Forged-in-the-Dark game: d6 pools, keep
//! the highest die, criticals on multiple sixes.

mod babel;

pub use babel::{
    cohort_status, maintenance_decision, resistance_stress, resolve, CohortKind, CohortStatus,
    OutcomeTier, PoolDecision, Resolution, RollKind, COHORT_BROKEN_HARM, COHORT_DEAD_HARM,
};
