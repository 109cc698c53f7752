//! Evaluation context and subject records

use crate::age::AgeSpan;
use chrono::{Duration, NaiveDate};
use child_health_types::{
    AgeGroup, IllnessLog, MealLog, Measurement, MilestoneStatusRecord, Subject, VaccineStatusRecord,
};
use serde::{Deserialize, Serialize};

/// The subject being evaluated and the evaluation date
///
/// Ages are always derived from these two values, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationContext {
    pub subject: Subject,
    pub as_of: NaiveDate,
}

impl EvaluationContext {
    pub fn new(subject: Subject, as_of: NaiveDate) -> Self {
        Self { subject, as_of }
    }

    pub fn age(&self) -> AgeSpan {
        AgeSpan::between(self.subject.date_of_birth, self.as_of)
    }

    /// Age on another date, e.g. the end of a nutrition window
    pub fn age_on(&self, date: NaiveDate) -> AgeSpan {
        AgeSpan::between(self.subject.date_of_birth, date)
    }

    pub fn age_group(&self) -> AgeGroup {
        self.age().age_group()
    }

    /// First day of a trailing window ending on `as_of`
    pub fn window_start(&self, days: i64) -> NaiveDate {
        self.as_of - Duration::days(days)
    }

    /// Days from `as_of` until `date` (negative when in the past)
    pub fn days_until(&self, date: NaiveDate) -> i64 {
        (date - self.as_of).num_days()
    }
}

/// Rows read from the collaborating store for one subject
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectRecords {
    pub measurements: Vec<Measurement>,
    pub meal_logs: Vec<MealLog>,
    pub illness_logs: Vec<IllnessLog>,
    pub vaccine_records: Vec<VaccineStatusRecord>,
    pub milestone_records: Vec<MilestoneStatusRecord>,
}

impl SubjectRecords {
    /// Most recent measurement logged on or before `as_of`; the later entry wins on equal dates
    pub fn latest_measurement(&self, as_of: NaiveDate) -> Option<&Measurement> {
        self.measurements
            .iter()
            .enumerate()
            .filter(|(_, m)| m.log_date <= as_of)
            .max_by_key(|(i, m)| (m.log_date, *i))
            .map(|(_, m)| m)
    }

    /// Illness logs with `start <= log_date <= end`
    pub fn illness_logs_between(&self, start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = &IllnessLog> {
        self.illness_logs
            .iter()
            .filter(move |log| start <= log.log_date && log.log_date <= end)
    }
}
