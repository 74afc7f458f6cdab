//! Error types for port operations.

/// Host collaborator errors with context for debugging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The host rejected or failed a field operation.
    #[error("Sheet storage error in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },

    /// A repeating row the handler expected is gone.
    #[error("Row not found in {section}: {row_id}")]
    RowNotFound { section: String, row_id: String },

    /// The roll engine failed to produce or accept a roll.
    #[error("Roll engine error: {0}")]
    Roll(String),
}

impl PortError {
    /// Create a Storage error with operation context.
    pub fn storage(operation: &'static str, message: impl ToString) -> Self {
        Self::Storage {
            operation,
            message: message.to_string(),
        }
    }

    pub fn row_not_found(section: impl ToString, row_id: impl ToString) -> Self {
        Self::RowNotFound {
            section: section.to_string(),
            row_id: row_id.to_string(),
        }
    }

    pub fn roll(message: impl ToString) -> Self {
        Self::Roll(message.to_string())
    }
}
