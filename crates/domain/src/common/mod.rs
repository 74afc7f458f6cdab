//! Common utility functions shared across the domain and engine crates.
//!
//! # Design Principles
//!
//! - **Pure functions only** - no side effects, no I/O
//! - **Never fail** - malformed input falls back to a caller-supplied default

pub mod numeric;

// Re-export commonly used functions at crate root for convenience
pub use numeric::{parse_flag, parse_int, parse_int_or};
