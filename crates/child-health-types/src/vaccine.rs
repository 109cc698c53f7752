//! Vaccination schedule entries and per-dose records

use crate::subject::AgeGroup;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Schedule category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VaccineCategory {
    /// Mandatory; used for missed-dose risk scoring
    Core,
    Optional,
    Regional,
    Supplemental,
}

/// Catalog entry of the vaccination schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineScheduleEntry {
    pub id: u32,
    pub vaccine_name: String,
    #[serde(default)]
    pub disease_prevented: String,
    /// Free text such as `"6, 10, 14 weeks"` or `"At birth"`
    pub recommended_age: String,
    pub doses_required: u32,
    pub category: VaccineCategory,
    pub age_group: AgeGroup,
}

impl VaccineScheduleEntry {
    pub fn is_core(&self) -> bool {
        self.category == VaccineCategory::Core
    }
}

/// Recorded state of one dose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoseStatus {
    Pending,
    Completed,
    Missed,
}

impl fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Missed => "missed",
        })
    }
}

/// Per-subject record of one dose of a schedule entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccineStatusRecord {
    pub schedule_id: u32,
    pub dose_number: u32,
    pub status: DoseStatus,
    #[serde(default)]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default)]
    pub actual_date: Option<NaiveDate>,
}

impl VaccineStatusRecord {
    pub fn pending(schedule_id: u32, dose_number: u32) -> Self {
        Self {
            schedule_id,
            dose_number,
            status: DoseStatus::Pending,
            scheduled_date: None,
            actual_date: None,
        }
    }

    pub fn given(schedule_id: u32, dose_number: u32, on: NaiveDate) -> Self {
        Self {
            status: DoseStatus::Completed,
            actual_date: Some(on),
            ..Self::pending(schedule_id, dose_number)
        }
    }

    pub fn with_scheduled_date(mut self, date: NaiveDate) -> Self {
        self.scheduled_date = Some(date);
        self
    }

    /// A dose counts as completed when it has an actual date or a completed status
    pub fn is_completed(&self) -> bool {
        self.actual_date.is_some() || self.status == DoseStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_completion_by_date_or_status() {
        assert!(VaccineStatusRecord::given(1, 1, date(2024, 1, 5)).is_completed());

        let mut dated = VaccineStatusRecord::pending(1, 2);
        dated.actual_date = Some(date(2024, 3, 1));
        assert!(dated.is_completed());

        assert!(!VaccineStatusRecord::pending(1, 3).is_completed());
    }

    #[test]
    fn test_schedule_entry_json() {
        let entry: VaccineScheduleEntry = serde_json::from_str(
            r#"{"id": 4, "vaccine_name": "Pentavalent", "recommended_age": "6, 10, 14 weeks",
                "doses_required": 3, "category": "Core", "age_group": "Infant"}"#,
        )
        .unwrap();
        assert!(entry.is_core());
        assert_eq!(entry.disease_prevented, "");
    }
}
