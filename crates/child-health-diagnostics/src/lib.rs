//! Child health diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the reference
//! loader, the analytics engine and the CLI: error codes, record locations
//! inside reference documents, and diagnostic reporting.

mod error;
mod error_code;
mod location;

pub use error::*;
pub use error_code::*;
pub use location::*;

/// Result type for child health operations
pub type Result<T> = std::result::Result<T, HealthError>;
