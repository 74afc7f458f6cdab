//! API layer - the sheet's entry points.

pub mod dispatcher;
pub mod events;

pub use dispatcher::{cascade_events, Dispatcher, DEFAULT_MAX_CASCADE_DEPTH};
pub use events::{Route, SheetEvent};
