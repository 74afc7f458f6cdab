//! Dark City, Shining Babel engine library.
//!
//! Runs the sheet against a host through two ports: the field store and the
//! roll engine.
//!
//! ## Structure
//!
//! - `use_cases/` - One handler per logical sheet event
//! - `infrastructure/` - Ports, in-memory and local adapters, config, catalogue loading
//! - `api/` - Sheet events and the dispatcher that routes them
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;


pub use app::App;
