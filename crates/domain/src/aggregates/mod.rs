//! Derived-value aggregators.
//!
//! Each aggregator exposes the fields it reads (`dependencies`) and a pure
//! `recompute` that turns a snapshot of those fields into a write-suppressed
//! patch.

pub mod attributes;
pub mod claims;
pub mod heat;
pub mod load;
pub mod maintenance;

pub use attributes::{Action, Attribute};
pub use claims::ClaimGrid;
pub use load::LoadSummary;
pub use maintenance::MaintenanceSummary;
