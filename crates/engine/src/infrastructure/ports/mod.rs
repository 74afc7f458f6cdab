//! Port traits for host boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Sheet field storage (the virtual tabletop's attribute store)
//! - Dice rolling (the host's roll engine)

mod error;
mod rolls;
mod sheet;

pub use error::PortError;
pub use rolls::{RollPort, RollRequest, RollResult, UNKNOWN_CHARACTER};
pub use sheet::SheetStore;

#[cfg(test)]
pub use rolls::MockRollPort;
#[cfg(test)]
pub use sheet::MockSheetStore;
