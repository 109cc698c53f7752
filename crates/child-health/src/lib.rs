//! Child health analytics for Rust
//!
//! This crate bundles the child health workspace:
//! - Error codes and diagnostics
//! - The data model for subjects, measurements, meals, vaccines and milestones
//! - Growth, nutrition, vaccination and milestone reference data
//! - The analytics engine: z-scores, weekly nutrition, vaccination status,
//!   feature extraction, prediction reuse and risk
//!
//! # Example
//!
//! ```ignore
//! use child_health::{EvaluationContext, HealthEngine, Sex, Subject};
//!
//! let engine = HealthEngine::embedded()?;
//! let ctx = EvaluationContext::new(Subject::new(Sex::Female, dob), as_of);
//! let summary = engine.profile_summary(&ctx, &records, None);
//! ```

// Re-export all public APIs from internal crates
pub use child_health_diagnostics as diagnostics;
pub use child_health_engine as engine;
pub use child_health_reference as reference;
pub use child_health_types as types;

mod load;
pub use load::{load_config, load_reference};

// Convenience re-exports
pub use child_health_diagnostics::{HealthError, Result};
pub use child_health_engine::{EngineConfig, EvaluationContext, HealthEngine, ProfileSummary, SubjectRecords};
pub use child_health_reference::ReferenceData;
pub use child_health_types::{AgeGroup, RiskLevel, Sex, Subject};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
