use thiserror::Error;

#[derive(Debug, Error)]
pub enum BankabilityError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BankabilityError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        BankabilityError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BankabilityError {
    fn from(e: serde_json::Error) -> Self {
        BankabilityError::SerializationError(e.to_string())
    }
}
