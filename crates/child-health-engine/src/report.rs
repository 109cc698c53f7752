//! Caregiver-facing presentation of stored predictions
//!
//! Low probabilities are hidden, the remaining ones get plain-language flags,
//! and feature codes are mapped to labels.

use crate::analytics::features::match_milestone;
use crate::analytics::growth::round_to;
use crate::config::EngineConfig;
use crate::engine::HealthEngine;
use chrono::NaiveDateTime;
use child_health_types::{
    AgeGroup, FeatureVector, GroupFeatures, MilestoneCode, PredictionOutputs, PredictionSnapshot,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Illness probabilities below this are never shown as a flag
pub const ILLNESS_FLAG_MIN_PROBABILITY: f64 = 0.5;
/// A milestone delay probability at or above this counts as a delay
pub const MILESTONE_DELAY_PROBABILITY: f64 = 0.6;
/// Horizon of an illness risk flag
pub const RISK_WINDOW_DAYS: u32 = 7;

/// Text for a growth z-score
pub fn zscore_flag(z: f64) -> &'static str {
    if z < -3.0 {
        "Very low for age (needs medical review)"
    } else if z < -2.0 {
        "Low for age"
    } else if z <= 2.0 {
        "Within normal range"
    } else if z <= 3.0 {
        "High for age"
    } else {
        "Very high for age (needs medical review)"
    }
}

/// Illness likelihood band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IllnessRisk {
    Low,
    Mild,
    Moderate,
    High,
}

impl fmt::Display for IllnessRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::High => "High",
        })
    }
}

pub fn illness_risk_flag(p: f64) -> IllnessRisk {
    if p < 0.3 {
        IllnessRisk::Low
    } else if p < 0.6 {
        IllnessRisk::Mild
    } else if p < 0.8 {
        IllnessRisk::Moderate
    } else {
        IllnessRisk::High
    }
}

pub fn milestone_delay_flag(p: f64) -> &'static str {
    if p < 0.3 {
        "On track"
    } else if p < 0.6 {
        "Slight delay risk"
    } else if p < 0.8 {
        "Delay risk"
    } else {
        "High delay risk"
    }
}

/// Label of a group-specific feeding code
pub fn feeding_type_label(group: AgeGroup, code: u8) -> Option<&'static str> {
    let labels: &[&str] = match group {
        AgeGroup::Infant => &["Breastmilk", "Formula", "Mixed"],
        AgeGroup::Toddler => &["FamilyFood", "Mixed", "Milk"],
        AgeGroup::Preschool => &["FamilyFood", "Mixed"],
        AgeGroup::SchoolAge => &["FamilyFood"],
    };
    labels.get(usize::from(code)).copied()
}

pub fn vaccination_status_label(code: u8) -> Option<&'static str> {
    ["Up-to-date", "Partial", "Delayed"].get(usize::from(code)).copied()
}

pub fn nutrition_flag_label(flag: u8) -> Option<&'static str> {
    ["Normal", "Nutrition risk"].get(usize::from(flag)).copied()
}

/// Illness flag shown on the profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IllnessFlag {
    pub severity: IllnessRisk,
    pub probability: f64,
    pub risk_window_days: u32,
    pub message: &'static str,
}

/// Flag for an illness probability; `None` below the display threshold
pub fn illness_flag(p: Option<f64>) -> Option<IllnessFlag> {
    let p = p.filter(|p| p.is_finite() && *p >= ILLNESS_FLAG_MIN_PROBABILITY)?;
    let (severity, message) = if p < 0.6 {
        (IllnessRisk::Mild, "Possible in next few days")
    } else if p < 0.8 {
        (IllnessRisk::Moderate, "Likely in next few days")
    } else {
        (IllnessRisk::High, "Very likely in next few days")
    };
    Some(IllnessFlag {
        severity,
        probability: round_to(p, 3),
        risk_window_days: RISK_WINDOW_DAYS,
        message,
    })
}

fn illness_probabilities(outputs: &PredictionOutputs) -> [(&'static str, Option<f64>); 3] {
    [
        ("fever", outputs.prob_fever),
        ("cold", outputs.prob_cold),
        ("diarrhea", outputs.prob_diarrhea),
    ]
}

/// Flags for the illnesses above the display threshold
pub fn illness_flags(outputs: &PredictionOutputs) -> IndexMap<&'static str, IllnessFlag> {
    illness_probabilities(outputs)
        .into_iter()
        .filter_map(|(name, p)| illness_flag(p).map(|flag| (name, flag)))
        .collect()
}

/// Hide probabilities under the configured thresholds
pub fn mask_outputs(outputs: &PredictionOutputs, config: &EngineConfig) -> PredictionOutputs {
    let hide = |p: Option<f64>, min: f64| p.filter(|v| *v >= min);
    PredictionOutputs {
        prob_fever: hide(outputs.prob_fever, config.illness_mask_threshold),
        prob_cold: hide(outputs.prob_cold, config.illness_mask_threshold),
        prob_diarrhea: hide(outputs.prob_diarrhea, config.illness_mask_threshold),
        milestone_delay: outputs
            .milestone_delay
            .iter()
            .map(|(code, p)| (*code, hide(*p, config.milestone_mask_threshold)))
            .collect(),
        ..outputs.clone()
    }
}

/// Whole months of age recorded in a feature vector
pub fn feature_age_months(features: &FeatureVector) -> i64 {
    match features.group {
        GroupFeatures::Infant { age_days, .. } => (age_days as f64 / 30.44) as i64,
        GroupFeatures::Toddler { age_months, .. } | GroupFeatures::Preschool { age_months, .. } => age_months,
        GroupFeatures::SchoolAge { age_years, .. } => age_years * 12,
    }
}

/// A stored prediction prepared for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionReport {
    pub created_at: NaiveDateTime,
    pub age_group: AgeGroup,
    pub features: FeatureVector,
    pub outputs: PredictionOutputs,
    pub weight_zscore_flag: &'static str,
    pub height_zscore_flag: &'static str,
    pub illness_risk: IndexMap<&'static str, IllnessRisk>,
    pub milestone_delay_flags: IndexMap<MilestoneCode, &'static str>,
    pub feeding_type_label: Option<&'static str>,
    pub vaccination_status_label: Option<&'static str>,
    pub nutrition_flag_label: Option<&'static str>,
}

impl HealthEngine<'_> {
    /// Masked outputs with flags and labels.
    ///
    /// MUAC is not shown under 6 months, where it is always an estimate.
    pub fn prediction_report(&self, snapshot: &PredictionSnapshot) -> PredictionReport {
        let mut features = snapshot.features.clone();
        if feature_age_months(&features) < 6 {
            features.muac_cm = 0.0;
        }
        let outputs = mask_outputs(&snapshot.outputs, self.config());
        let illness_risk = illness_probabilities(&outputs)
            .into_iter()
            .filter_map(|(name, p)| p.map(|p| (name, illness_risk_flag(p))))
            .collect();
        let milestone_delay_flags = outputs
            .milestone_delay
            .iter()
            .filter_map(|(code, p)| p.map(|p| (*code, milestone_delay_flag(p))))
            .collect();
        PredictionReport {
            created_at: snapshot.created_at,
            age_group: features.age_group(),
            weight_zscore_flag: zscore_flag(features.weight_zscore),
            height_zscore_flag: zscore_flag(features.height_zscore),
            feeding_type_label: feeding_type_label(features.age_group(), features.feeding_type),
            vaccination_status_label: vaccination_status_label(features.vaccination_status),
            nutrition_flag_label: outputs.nutrition_flag.and_then(nutrition_flag_label),
            illness_risk,
            milestone_delay_flags,
            features,
            outputs,
        }
    }

    /// Catalog names of the group's milestones predicted as delayed, deduplicated
    pub fn milestone_delays(&self, group: AgeGroup, outputs: &PredictionOutputs) -> Vec<String> {
        let expected = MilestoneCode::for_group(group);
        let delayed: Vec<MilestoneCode> = expected
            .iter()
            .copied()
            .filter(|code| {
                outputs
                    .milestone_delay
                    .get(code)
                    .copied()
                    .flatten()
                    .is_some_and(|p| p >= MILESTONE_DELAY_PROBABILITY)
            })
            .collect();

        let mut names: Vec<String> = Vec::new();
        for code in delayed {
            for m in self.reference().milestones_for_group(group) {
                if match_milestone(m, expected) == Some(code) && !names.contains(&m.name) {
                    names.push(m.name.clone());
                }
            }
        }
        names
    }
}
