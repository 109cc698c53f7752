//! Engine errors
//!
//! Analytics never fail on missing or odd data; they fall back to neutral values.
//! These errors cover the few operations that validate a write or a setup step.

use child_health_diagnostics::{CH0004, CH0005, CH0302, ErrorBuilder, ErrorCode, HealthError};
use child_health_reference::ReferenceError;
use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by engine operations
#[derive(Debug, Error, Clone)]
pub enum EngineError {
    /// Recording a dose beyond the schedule's dose count
    #[error("Dose {dose} exceeds the {doses_required} dose(s) scheduled for {vaccine}")]
    DoseExceedsSchedule {
        vaccine: String,
        dose: u32,
        doses_required: u32,
    },

    /// Schedule id not present in the reference data
    #[error("Unknown vaccination schedule entry: {id}")]
    UnknownSchedule { id: u32 },

    /// Engine configuration could not be read or is out of range
    #[error("Invalid engine configuration: {message}")]
    Config { message: String },

    /// Reference data failed to load
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

impl EngineError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DoseExceedsSchedule { .. } => CH0004,
            Self::UnknownSchedule { .. } => CH0005,
            Self::Config { .. } => CH0302,
            Self::Reference(err) => err.code(),
        }
    }
}

impl From<EngineError> for HealthError {
    fn from(err: EngineError) -> Self {
        let code = err.code();
        match err {
            EngineError::Reference(inner) => inner.into(),
            EngineError::Config { message } => ErrorBuilder::new(code, message).system(),
            other => HealthError::input(code, other.to_string()),
        }
    }
}
