//! Subjects, sex and age groups

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recorded sex of a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    /// Parse a free-form label: anything starting with `m` is male, `f` female
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if label.starts_with('m') {
            Self::Male
        } else if label.starts_with('f') {
            Self::Female
        } else {
            Self::Other
        }
    }

    /// Numeric code used in feature vectors (male 0, otherwise 1)
    pub const fn feature_code(&self) -> u8 {
        match self {
            Self::Male => 0,
            Self::Female | Self::Other => 1,
        }
    }

    /// Sex whose growth reference table applies.
    ///
    /// Reference standards are tabulated for male and female only; other
    /// labels share the female tables, matching the feature encoding.
    pub const fn reference_sex(&self) -> Self {
        match self {
            Self::Male => Self::Male,
            Self::Female | Self::Other => Self::Female,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A child. Age is always derived at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Identifier assigned by the collaborating store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sex: Sex,
    pub date_of_birth: NaiveDate,
}

impl Subject {
    pub fn new(sex: Sex, date_of_birth: NaiveDate) -> Self {
        Self {
            id: None,
            sex,
            date_of_birth,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Developmental age group driving schedules, milestones and feature sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Infant,
    Toddler,
    Preschool,
    SchoolAge,
}

impl AgeGroup {
    /// All groups in developmental order
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Infant,
        AgeGroup::Toddler,
        AgeGroup::Preschool,
        AgeGroup::SchoolAge,
    ];

    /// Group for an age in (fractional) years
    pub fn from_age_years(years: f64) -> Self {
        if years < 1.0 {
            Self::Infant
        } else if years < 4.0 {
            Self::Toddler
        } else if years <= 6.0 {
            Self::Preschool
        } else {
            Self::SchoolAge
        }
    }

    /// The following group, if any
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Infant => Some(Self::Toddler),
            Self::Toddler => Some(Self::Preschool),
            Self::Preschool => Some(Self::SchoolAge),
            Self::SchoolAge => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Infant => "Infant",
            Self::Toddler => "Toddler",
            Self::Preschool => "Preschool",
            Self::SchoolAge => "SchoolAge",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
