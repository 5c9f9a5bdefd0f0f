use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PlannerError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        PlannerError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl PlannerError {
    /// Prefix the error with where it occurred, keeping its variant.
    pub fn in_context(self, location: &str) -> Self {
        match self {
            PlannerError::InvalidInput { field, reason } => PlannerError::InvalidInput {
                field: format!("{location}.{field}"),
                reason,
            },
            PlannerError::InsufficientData(msg) => {
                PlannerError::InsufficientData(format!("{location}: {msg}"))
            }
            PlannerError::DivisionByZero { context } => PlannerError::DivisionByZero {
                context: format!("{location}: {context}"),
            },
            PlannerError::Overflow { context } => PlannerError::Overflow {
                context: format!("{location}: {context}"),
            },
            PlannerError::SerializationError(msg) => {
                PlannerError::SerializationError(format!("{location}: {msg}"))
            }
        }
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        PlannerError::SerializationError(e.to_string())
    }
}
