use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanEaseError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanEaseError {
    fn from(e: serde_json::Error) -> Self {
        LoanEaseError::SerializationError(e.to_string())
    }
}

impl LoanEaseError {
    /// Shorthand for the validation failure every operation reports.
    pub fn invalid(field: &str, reason: &str) -> Self {
        LoanEaseError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
