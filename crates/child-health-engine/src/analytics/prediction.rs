//! Prediction cache reuse
//!
//! A stored prediction is reused only while nothing it depends on has changed.

use child_health_types::{
    ChangeSensitiveField, FeatureVector, MealLog, PredictionOutputs, PredictionSnapshot,
};
use std::fmt;

/// Why a stored prediction cannot be reused
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReuseVeto {
    NoSnapshot,
    AgeGroupChanged,
    FieldChanged(ChangeSensitiveField),
    NewerMealLog,
}

impl fmt::Display for ReuseVeto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSnapshot => f.write_str("no prior prediction"),
            Self::AgeGroupChanged => f.write_str("age group changed"),
            Self::FieldChanged(field) => write!(f, "{field:?} changed"),
            Self::NewerMealLog => f.write_str("meal logged after the last prediction"),
        }
    }
}

fn same_value(a: Option<f64>, b: Option<f64>) -> bool {
    // NaN never equals itself, so a NaN field always forces recomputation
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        _ => false,
    }
}

/// First reason the snapshot cannot be reused, if any
pub fn reuse_veto(
    current: &FeatureVector,
    last: Option<&PredictionSnapshot>,
    meal_logs: &[MealLog],
) -> Option<ReuseVeto> {
    let Some(last) = last else {
        return Some(ReuseVeto::NoSnapshot);
    };
    if last.age_group() != current.age_group() {
        return Some(ReuseVeto::AgeGroupChanged);
    }
    if let Some(field) = ChangeSensitiveField::all()
        .find(|field| !same_value(field.value(current), field.value(&last.features)))
    {
        return Some(ReuseVeto::FieldChanged(field));
    }
    if meal_logs.iter().any(|log| log.created_at > last.created_at) {
        return Some(ReuseVeto::NewerMealLog);
    }
    None
}

/// Whether the last stored prediction can be served for `current`
pub fn should_reuse(current: &FeatureVector, last: Option<&PredictionSnapshot>, meal_logs: &[MealLog]) -> bool {
    match reuse_veto(current, last, meal_logs) {
        Some(veto) => {
            log::debug!("recomputing prediction: {veto}");
            false
        }
        None => {
            log::debug!("reusing prediction");
            true
        }
    }
}

/// Clear delay probabilities of milestones already achieved
pub fn void_achieved_milestones(outputs: &mut PredictionOutputs, features: &FeatureVector) {
    for (code, achieved) in features.group.milestone_flags() {
        if achieved {
            if let Some(p) = outputs.milestone_delay.get_mut(&code) {
                *p = None;
            }
        }
    }
}
