//! Engine configuration

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable constants of the analytics
///
/// Every field has a default, so a JSON file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Trailing window for the weight trend
    pub trend_window_days: i64,
    /// Length of the nutrition window, also the divisor of the daily average
    pub nutrition_window_days: i64,
    /// Trailing window for illness counts
    pub illness_window_days: i64,
    /// Foods suggested per needed nutrient
    pub foods_per_nutrient: usize,
    /// Recipe cap for children aged 6 months or less
    pub infant_recipe_cap: usize,
    pub recipe_cap: usize,
    /// Energy intake percentage below which the energy deficit is severe
    pub severe_energy_pct: f64,
    /// A vaccine due within this many days is "due soon"
    pub due_soon_days: i64,
    /// Illness probabilities below this are hidden
    pub illness_mask_threshold: f64,
    /// Milestone delay probabilities below this are hidden
    pub milestone_mask_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trend_window_days: 180,
            nutrition_window_days: 7,
            illness_window_days: 90,
            foods_per_nutrient: 5,
            infant_recipe_cap: 2,
            recipe_cap: 4,
            severe_energy_pct: 60.0,
            due_soon_days: 14,
            illness_mask_threshold: 0.5,
            milestone_mask_threshold: 0.3,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON text and check ranges
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| EngineError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> EngineResult<()> {
        for (name, days) in [
            ("trend_window_days", self.trend_window_days),
            ("nutrition_window_days", self.nutrition_window_days),
            ("illness_window_days", self.illness_window_days),
        ] {
            if days <= 0 {
                return Err(EngineError::config(format!("{name} must be positive, got {days}")));
            }
        }
        for (name, p) in [
            ("illness_mask_threshold", self.illness_mask_threshold),
            ("milestone_mask_threshold", self.milestone_mask_threshold),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EngineError::config(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        Ok(())
    }
}
