//! Due-date command implementation

use super::output::{self, key_value_table};
use super::session::Session;
use anyhow::Result;
use chrono::NaiveDate;
use child_health_engine::due_date;
use serde::Serialize;

/// Configuration for due-date command
pub struct DueDateConfig {
    pub text: String,
    pub dose: u32,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueDateReport {
    pub recommended_age: String,
    pub dose_number: u32,
    pub date_of_birth: NaiveDate,
    pub due_date: Option<NaiveDate>,
    /// Days from the evaluation date; negative when already past
    pub days_until_due: Option<i64>,
}

pub fn due_date_report(session: &Session, config: &DueDateConfig) -> DueDateReport {
    let due = due_date(&config.text, config.dose, config.date_of_birth);
    DueDateReport {
        recommended_age: config.text.clone(),
        dose_number: config.dose,
        date_of_birth: config.date_of_birth,
        due_date: due,
        days_until_due: due.map(|d| (d - session.as_of).num_days()),
    }
}

pub fn run(session: &Session, config: DueDateConfig) -> Result<()> {
    let report = due_date_report(session, &config);
    if report.due_date.is_none() {
        eprintln!(
            "{}",
            output::format_warning(&format!("no due date can be derived from '{}'", config.text))
        );
    }
    output::print_report(&report, session.format, session.output_path(), |r| {
        key_value_table([
            ("Recommended age", r.recommended_age.clone()),
            ("Dose", r.dose_number.to_string()),
            ("Date of birth", r.date_of_birth.to_string()),
            ("Due date", r.due_date.map_or_else(|| "-".to_string(), |d| d.to_string())),
            ("Days until due", r.days_until_due.map_or_else(|| "-".to_string(), |d| d.to_string())),
        ])
    })
}
