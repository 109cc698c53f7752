//! Reference data loading errors

use child_health_diagnostics::{
    CH0100, CH0101, CH0301, CH0304, ErrorBuilder, ErrorCode, HealthError, RecordLocation,
};
use thiserror::Error;

/// Errors raised while loading reference documents
#[derive(Debug, Clone, Error)]
pub enum ReferenceError {
    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse {document}: {message}")]
    Parse { document: String, message: String },

    #[error("Invalid record at {location}: {message}")]
    Invalid {
        code: ErrorCode,
        location: RecordLocation,
        message: String,
    },

    #[error("Unsupported reference file: {0}")]
    UnsupportedFile(String),

    #[error("Reference document not found: {0}")]
    Missing(String),
}

impl ReferenceError {
    pub fn invalid(code: ErrorCode, location: RecordLocation, message: impl Into<String>) -> Self {
        Self::Invalid {
            code,
            location,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => CH0301,
            Self::Parse { .. } => CH0101,
            Self::Invalid { code, .. } => *code,
            Self::UnsupportedFile(_) => CH0304,
            Self::Missing(_) => CH0100,
        }
    }
}

impl From<ReferenceError> for HealthError {
    fn from(err: ReferenceError) -> Self {
        let code = err.code();
        match err {
            ReferenceError::Invalid {
                location, message, ..
            } => ErrorBuilder::new(code, message).at(location).reference(),
            ReferenceError::Parse { document, message } => ErrorBuilder::new(code, message)
                .at(RecordLocation::document(document))
                .reference(),
            ReferenceError::Io { path, message } => {
                ErrorBuilder::new(code, message).context(path).system()
            }
            other => HealthError::reference(code, other.to_string()),
        }
    }
}
