//! Unified error types for the domain layer
//!
//! Sheet calculations never fail: missing or malformed field values fall back
//! to defaults. Errors only surface when parsing typed values out of strings
//! (positions, effects, roll kinds) and when validating catalogue data.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., catalogue entry out of range)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for reference data that breaks an invariant.
    ///
    /// # Example
    /// ```ignore
    /// if !(1..=6).contains(&faction.tier) {
    ///     return Err(DomainError::validation("faction tier must be 1-6"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant or format.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
