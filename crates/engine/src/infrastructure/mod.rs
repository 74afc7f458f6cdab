//! Infrastructure - ports and the adapters that implement them.

pub mod catalogue;
pub mod config;
pub mod dice;
pub mod memory;
pub mod ports;
