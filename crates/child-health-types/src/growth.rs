//! Growth measurements and LMS reference rows

use crate::subject::Sex;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One growth-log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub log_date: NaiveDate,
    #[serde(default)]
    pub height_cm: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    /// Mid-upper-arm circumference
    #[serde(default)]
    pub muac_cm: Option<f64>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
}

impl Measurement {
    pub fn new(log_date: NaiveDate) -> Self {
        Self {
            log_date,
            height_cm: None,
            weight_kg: None,
            muac_cm: None,
            sleep_hours: None,
        }
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = Some(weight_kg);
        self
    }

    pub fn with_height(mut self, height_cm: f64) -> Self {
        self.height_cm = Some(height_cm);
        self
    }

    pub fn with_muac(mut self, muac_cm: f64) -> Self {
        self.muac_cm = Some(muac_cm);
        self
    }

    pub fn with_sleep(mut self, hours: f64) -> Self {
        self.sleep_hours = Some(hours);
        self
    }
}

/// Quantity a z-score is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthMetric {
    WeightForAge,
    /// Length below 24 months, standing height above
    HeightForAge,
}

impl GrowthMetric {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WeightForAge => "weight_for_age",
            Self::HeightForAge => "height_for_age",
        }
    }
}

impl fmt::Display for GrowthMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Published growth standard a table belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceFamily {
    /// WHO child growth standards, valid below 24 months
    Who,
    /// CDC growth charts, valid from 24 months
    Cdc,
}

impl ReferenceFamily {
    /// Age at which the second family takes over
    pub const SWITCH_AGE_MONTHS: f64 = 24.0;

    /// Family applicable at an age
    pub fn for_age(age_months: f64) -> Self {
        if age_months < Self::SWITCH_AGE_MONTHS {
            Self::Who
        } else {
            Self::Cdc
        }
    }
}

/// L, M and S parameters at one tabulated age.
///
/// Deserializes from either an object or a compact `[age, l, m, s]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LmsPoint {
    pub age_months: f64,
    pub l: f64,
    pub m: f64,
    pub s: f64,
}

impl LmsPoint {
    pub const fn new(age_months: f64, l: f64, m: f64, s: f64) -> Self {
        Self { age_months, l, m, s }
    }
}

/// A reference row with its sex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthReferenceRow {
    pub sex: Sex,
    #[serde(flatten)]
    pub point: LmsPoint,
}

/// Weight-for-age classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightForAgeClass {
    Underweight,
    Normal,
    Overweight,
}

/// Height-for-age classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightForAgeClass {
    Stunted,
    Normal,
}

/// Direction of the recent weight trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Improving,
    Stable,
    Declining,
}

impl TrendDirection {
    /// Display arrow for dashboards
    pub const fn arrow(&self) -> &'static str {
        match self {
            Self::Improving => "\u{2191}",
            Self::Stable => "\u{2192}",
            Self::Declining => "\u{2193}",
        }
    }
}

impl fmt::Display for WeightForAgeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for HeightForAgeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self, self.arrow())
    }
}
