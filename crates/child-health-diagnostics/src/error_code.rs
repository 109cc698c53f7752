//! Error codes following a structured numbering system
//!
//! Error code ranges:
//! - CH0001-CH0099: Input errors (subject data, dose recording)
//! - CH0100-CH0199: Reference data errors (LMS tables, catalogs, bands)
//! - CH0300-CH0399: System errors (I/O, configuration)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is an input error (0001-0099)
    pub const fn is_input_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a reference data error (0100-0199)
    pub const fn is_reference_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a system error (0300-0399)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CH{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Input errors (0001-0099)
    map.insert(1, ErrorInfo::new("Invalid date"));
    map.insert(2, ErrorInfo::new("Invalid sex label"));
    map.insert(3, ErrorInfo::new("Invalid measurement value"));
    map.insert(
        4,
        ErrorInfo::new("Dose number exceeds schedule")
            .with_help("All doses required by this schedule entry are already recorded"),
    );
    map.insert(5, ErrorInfo::new("Unknown schedule entry"));
    map.insert(6, ErrorInfo::new("Invalid profile document"));

    // Reference data errors (0100-0199)
    map.insert(
        100,
        ErrorInfo::new("Reference document missing")
            .with_help("Check the reference directory; files absent from an existing directory fall back to embedded defaults"),
    );
    map.insert(101, ErrorInfo::new("Reference document malformed"));
    map.insert(102, ErrorInfo::new("Invalid LMS row"));
    map.insert(103, ErrorInfo::new("Empty LMS table"));
    map.insert(
        104,
        ErrorInfo::new("Invalid requirement band")
            .with_help("age_min_months must not exceed age_max_months"),
    );
    map.insert(105, ErrorInfo::new("Duplicate identifier"));
    map.insert(106, ErrorInfo::new("Unknown nutrient"));

    // System errors (0300-0399)
    map.insert(300, ErrorInfo::new("Internal error"));
    map.insert(301, ErrorInfo::new("I/O error"));
    map.insert(302, ErrorInfo::new("Configuration error"));
    map.insert(303, ErrorInfo::new("File not found"));
    map.insert(304, ErrorInfo::new("Invalid format"));

    map
});

// Input errors
pub const CH0001: ErrorCode = ErrorCode::new(1);
pub const CH0002: ErrorCode = ErrorCode::new(2);
pub const CH0003: ErrorCode = ErrorCode::new(3);
pub const CH0004: ErrorCode = ErrorCode::new(4);
pub const CH0005: ErrorCode = ErrorCode::new(5);
pub const CH0006: ErrorCode = ErrorCode::new(6);

// Reference data errors
pub const CH0100: ErrorCode = ErrorCode::new(100);
pub const CH0101: ErrorCode = ErrorCode::new(101);
pub const CH0102: ErrorCode = ErrorCode::new(102);
pub const CH0103: ErrorCode = ErrorCode::new(103);
pub const CH0104: ErrorCode = ErrorCode::new(104);
pub const CH0105: ErrorCode = ErrorCode::new(105);
pub const CH0106: ErrorCode = ErrorCode::new(106);

// System errors
pub const CH0300: ErrorCode = ErrorCode::new(300);
pub const CH0301: ErrorCode = ErrorCode::new(301);
pub const CH0302: ErrorCode = ErrorCode::new(302);
pub const CH0303: ErrorCode = ErrorCode::new(303);
pub const CH0304: ErrorCode = ErrorCode::new(304);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(CH0004.to_string(), "CH0004");
        assert_eq!(CH0301.to_string(), "CH0301");
    }

    #[rstest]
    #[case(CH0001, true, false, false)]
    #[case(CH0102, false, true, false)]
    #[case(CH0304, false, false, true)]
    #[case(ErrorCode::new(250), false, false, false)]
    fn test_ranges(
        #[case] code: ErrorCode,
        #[case] input: bool,
        #[case] reference: bool,
        #[case] system: bool,
    ) {
        assert_eq!(code.is_input_error(), input);
        assert_eq!(code.is_reference_error(), reference);
        assert_eq!(code.is_system_error(), system);
    }

    #[test]
    fn test_info_lookup() {
        assert_eq!(CH0004.info().description, "Dose number exceeds schedule");
        assert!(CH0004.info().help.is_some());
        assert_eq!(ErrorCode::new(999).info().description, "Unknown error");
    }
}
