//! Child health error types

use crate::{ErrorCode, RecordLocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Loading or evaluation cannot proceed
    Error,
    /// Suspicious input that was tolerated
    Warning,
    /// Informational message
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A diagnostic message with location and help
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Record the diagnostic refers to
    pub location: Option<RecordLocation>,
    /// Additional help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message)
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: RecordLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render with terminal colors
    #[cfg(feature = "colored")]
    pub fn render_colored(&self) -> String {
        use colored::Colorize;

        let label = match self.severity {
            Severity::Error => format!("{}[{}]", self.severity, self.code).red().bold(),
            Severity::Warning => format!("{}[{}]", self.severity, self.code).yellow().bold(),
            Severity::Info => format!("{}[{}]", self.severity, self.code).blue().bold(),
        };
        let mut out = format!("{}: {}", label, self.message);
        if let Some(loc) = &self.location {
            out.push_str(&format!("\n  {} {}", "-->".cyan(), loc));
        }
        if let Some(help) = self.help.as_deref().or(self.code.info().help) {
            out.push_str(&format!("\n  {} {}", "help:".green(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main child health error type
#[derive(Debug, Clone, Error)]
pub enum HealthError {
    /// Invalid subject data or write-path request
    #[error("{code}: {message}")]
    Input {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },

    /// Reference data could not be loaded or validated
    #[error("{code}: {message}")]
    Reference {
        code: ErrorCode,
        message: String,
        location: Option<RecordLocation>,
        context: Option<String>,
    },

    /// System error
    #[error("{code}: {message}")]
    System {
        code: ErrorCode,
        message: String,
        context: Option<String>,
    },
}

impl HealthError {
    /// Create an input error
    pub fn input(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Input {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Create a reference data error
    pub fn reference(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Reference {
            code,
            message: message.into(),
            location: None,
            context: None,
        }
    }

    /// Create a reference data error pointing at a record
    pub fn reference_at(
        code: ErrorCode,
        message: impl Into<String>,
        location: RecordLocation,
    ) -> Self {
        Self::Reference {
            code,
            message: message.into(),
            location: Some(location),
            context: None,
        }
    }

    /// Create a system error
    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::System {
            code,
            message: message.into(),
            context: None,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Input { code, .. }
            | Self::Reference { code, .. }
            | Self::System { code, .. } => *code,
        }
    }

    /// Get the location if available
    pub fn location(&self) -> Option<&RecordLocation> {
        match self {
            Self::Reference { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Reference {
                code,
                message,
                location,
                context,
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(loc) = location {
                    diag = diag.with_location(loc.clone());
                }
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                }
                diag
            }
            Self::Input {
                code,
                message,
                context,
            }
            | Self::System {
                code,
                message,
                context,
            } => {
                let mut diag = Diagnostic::error(*code, message.clone());
                if let Some(ctx) = context {
                    diag = diag.with_help(ctx.clone());
                }
                diag
            }
        }
    }
}

/// Builder for creating errors with fluent API
pub struct ErrorBuilder {
    code: ErrorCode,
    message: String,
    location: Option<RecordLocation>,
    context: Option<String>,
}

impl ErrorBuilder {
    /// Create a new error builder
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            context: None,
        }
    }

    /// Set the record location
    pub fn at(mut self, location: RecordLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Add context information
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Build an input error
    pub fn input(self) -> HealthError {
        HealthError::Input {
            code: self.code,
            message: self.message,
            context: self.context,
        }
    }

    /// Build a reference data error
    pub fn reference(self) -> HealthError {
        HealthError::Reference {
            code: self.code,
            message: self.message,
            location: self.location,
            context: self.context,
        }
    }

    /// Build a system error
    pub fn system(self) -> HealthError {
        HealthError::System {
            code: self.code,
            message: self.message,
            context: self.context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CH0004, CH0102};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_builder() {
        let err = ErrorBuilder::new(CH0102, "S must be positive")
            .at(RecordLocation::record("growth_lms.json", 7).with_field("s"))
            .context("row skipped")
            .reference();

        assert!(matches!(err, HealthError::Reference { .. }));
        assert_eq!(err.code(), CH0102);
        assert_eq!(
            err.location().map(ToString::to_string),
            Some("growth_lms.json[7].s".to_string())
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = HealthError::reference_at(
            CH0102,
            "M must be positive",
            RecordLocation::record("growth_lms.json", 2),
        )
        .to_diagnostic();

        assert_eq!(
            diag.to_string(),
            "error: CH0102 - M must be positive at growth_lms.json[2]"
        );
    }

    #[test]
    fn test_input_error_keeps_code() {
        let err = HealthError::input(CH0004, "dose 4 of 3");
        assert_eq!(err.code(), CH0004);
        assert_eq!(err.to_string(), "CH0004: dose 4 of 3");
        assert_eq!(err.location(), None);
    }

    #[test]
    fn test_warning_keeps_message() {
        let diag = Diagnostic::warning(CH0102, "inverted band").with_help("swap bounds");
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.help.as_deref(), Some("swap bounds"));
    }
}
