//! Dark City, Shining Babel - sheet domain
//!
//! Pure calculations behind the character and crew sheets: numeric parsing,
//! derived-field aggregators, the claim grid, roll formulas and contexts,
//! outcome classification, and repeating-section planning. Nothing here does
//! I/O; the engine crate reads and writes the host's fields.

pub mod common;

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod fields;
pub mod game_systems;
pub mod ids;
pub mod population;
pub mod repeating;
pub mod value_objects;

pub use aggregates::{Action, Attribute, ClaimGrid, LoadSummary, MaintenanceSummary};

pub use entities::{
    Augment, Catalogue, ClaimConnection, ClaimEdge, CohortTemplate, CrewAbility, CrewType,
    Faction, FactionCategory, Playbook, StartingItem, Upgrades,
};

pub use error::DomainError;

pub use fields::{RepeatingField, Section};

pub use game_systems::{CohortKind, OutcomeTier, PoolDecision, Resolution, RollKind};

pub use ids::{RollId, RowId};

pub use population::{PopulationPlan, SectionTargets};

pub use repeating::{RowTemplate, SyncMode, SyncPlan};

pub use value_objects::{
    DiceOutcome, Effect, FieldPatch, FieldSnapshot, KeepDirective, Position,
    RollContext, RollFormula, WriteProvenance,
};
