//! Profile input files
//!
//! A profile is one JSON document holding the subject, their records and the
//! optional last prediction snapshot:
//!
//! ```json
//! {
//!   "subject": { "id": "c-17", "sex": "female", "date_of_birth": "2023-01-01" },
//!   "measurements": [{ "log_date": "2024-08-01", "weight_kg": 9.8, "height_cm": 78.0 }],
//!   "meal_logs": [],
//!   "last_prediction": null
//! }
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use child_health_engine::{EvaluationContext, SubjectRecords};
use child_health_types::{PredictionSnapshot, Subject};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfileInput {
    pub subject: Subject,
    #[serde(flatten)]
    pub records: SubjectRecords,
    #[serde(default)]
    pub last_prediction: Option<PredictionSnapshot>,
}

impl ProfileInput {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid profile document")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).with_context(|| format!("Failed to read profile: {}", path.display()))?;
        let profile =
            Self::from_json(&json).with_context(|| format!("Failed to parse profile: {}", path.display()))?;
        log::info!(
            "Loaded profile with {} measurement(s), {} meal log(s), {} vaccine record(s)",
            profile.records.measurements.len(),
            profile.records.meal_logs.len(),
            profile.records.vaccine_records.len()
        );
        Ok(profile)
    }

    pub fn context(&self, as_of: NaiveDate) -> EvaluationContext {
        EvaluationContext::new(self.subject.clone(), as_of)
    }
}
