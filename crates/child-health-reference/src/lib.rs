//! Reference data for child health analytics
//!
//! This crate provides:
//! - Growth standard LMS tables (WHO below 24 months, CDC from 24 months)
//! - Nutrition requirement bands by age in months
//! - Food and recipe catalogs
//! - Vaccination schedule and milestone catalogs
//! - Embedded defaults, loaded once and shared read-only
//! - JSON loaders for replacing any document at runtime

pub mod documents;
pub mod embedded;
pub mod error;
pub mod growth;
pub mod loader;
pub mod store;
pub mod validate;

pub use documents::ReferenceDocument;
pub use embedded::{EMBEDDED_REFERENCE, embedded_reference};
pub use error::ReferenceError;
pub use growth::{FamilyTables, GrowthReference, LmsTable};
pub use store::ReferenceData;
