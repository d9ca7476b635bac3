use thiserror::Error;

#[derive(Debug, Error)]
pub enum LienError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid interval: end {end} precedes start {start}")]
    InvalidInterval { start: u64, end: u64 },

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Unsupported asset kind: {0}")]
    UnsupportedAssetKind(String),

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LienError {
    fn from(e: serde_json::Error) -> Self {
        LienError::SerializationError(e.to_string())
    }
}
