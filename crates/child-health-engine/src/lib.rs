//! Child Health Analytics Engine
//!
//! Deterministic, age- and sex-conditioned analytics over sparse, irregularly
//! timed child health records:
//!
//! - **Growth**: LMS z-scores with interpolation, weight trend, BMI and MUAC
//! - **Nutrition**: weekly adequacy per nutrient, needed nutrients, food and
//!   recipe recommendations with age-based safety rules
//! - **Vaccination**: free-text due-date parsing, per-group status, summary with
//!   missed doses and the next due dose, dose recording
//! - **Prediction**: typed feature vectors and the cache reuse decision
//! - **Risk**: Red/Yellow/Green verdict with stable reason codes
//!
//! # Example
//!
//! ```ignore
//! use child_health_engine::{EvaluationContext, HealthEngine, SubjectRecords};
//!
//! let engine = HealthEngine::embedded()?;
//! let ctx = EvaluationContext::new(subject, as_of);
//! let summary = engine.profile_summary(&ctx, &records, None);
//! println!("{}", summary.risk.level);
//! ```
//!
//! # Fail-soft results
//!
//! Computations never fail on missing data. An undefined z-score is `0.0`, a
//! subject without meal logs gets an explicit "no data" summary, and an
//! unparseable schedule text has no due date. Errors are reserved for invalid
//! configuration, reference loading and recording a dose past the schedule.

pub mod age;
pub mod analytics;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod report;
pub mod summary;

pub use age::{AgeDisplay, AgeSpan};
pub use analytics::*;
pub use config::EngineConfig;
pub use context::{EvaluationContext, SubjectRecords};
pub use engine::HealthEngine;
pub use error::{EngineError, EngineResult};
pub use report::{IllnessFlag, IllnessRisk, PredictionReport};
pub use summary::ProfileSummary;
