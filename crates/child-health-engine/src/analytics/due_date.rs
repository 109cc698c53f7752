//! Due dates from free-text recommended ages
//!
//! Recommended ages are written for people ("6, 10, 14 weeks", "15–18 months",
//! "At birth"). Rules are tried in order over the normalized text:
//!
//! 1. "at birth" is due on the date of birth
//! 2. a range with a unit is due at its upper bound
//! 3. a list of numbers with a unit picks the value for the dose, clamped to the list
//! 4. a single number with a unit
//! 5. recurring phrases ("every year", "every 6 months")
//!
//! Anything else has no due date. Units are 7, 30 and 365 days.

use chrono::{Duration, NaiveDate};
use child_health_types::normalize_text;
use once_cell::sync::Lazy;
use regex::Regex;

static RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*-\s*(\d+)").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Unit of a recommended age
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeUnit {
    Week,
    Month,
    Year,
}

impl AgeUnit {
    pub const fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }

    /// First unit mentioned by priority week, month, year
    fn detect(text: &str) -> Option<Self> {
        if text.contains("week") {
            Some(Self::Week)
        } else if text.contains("month") {
            Some(Self::Month)
        } else if text.contains("year") {
            Some(Self::Year)
        } else {
            None
        }
    }
}

fn offset(dob: NaiveDate, value: i64, unit: AgeUnit) -> Option<NaiveDate> {
    dob.checked_add_signed(Duration::days(value.checked_mul(unit.days())?))
}

/// Due date of `dose_number` (1-based) for a recommended age text
pub fn due_date(recommended_age: &str, dose_number: u32, date_of_birth: NaiveDate) -> Option<NaiveDate> {
    let text = normalize_text(recommended_age);
    if text.is_empty() {
        return None;
    }
    if text.contains("at birth") {
        return Some(date_of_birth);
    }

    if let Some(unit) = AgeUnit::detect(&text) {
        if let Some(caps) = RANGE.captures(&text) {
            let upper: i64 = caps[2].parse().ok()?;
            return offset(date_of_birth, upper, unit);
        }
        let values: Vec<i64> = NUMBER
            .find_iter(&text)
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        if !values.is_empty() {
            let index = (dose_number.max(1) as usize - 1).min(values.len() - 1);
            return offset(date_of_birth, values[index], unit);
        }
    }

    recurring_due_date(&text, date_of_birth)
}

/// Due date for recurring phrases
///
/// "every 6 months" maps to 270 days, or 180 when the text also mentions
/// "9 months". Inside [`due_date`] that branch is never reached: the text holds a
/// number and a unit, so the single-number rule answers first (6 × 30 days).
/// Called directly, this decides recurring phrases on their own.
pub fn recurring_due_date(text: &str, date_of_birth: NaiveDate) -> Option<NaiveDate> {
    let text = normalize_text(text);
    let days = if text.contains("every year") {
        365
    } else if text.contains("every 6 months") {
        if text.contains("9 months") { 180 } else { 270 }
    } else {
        log::debug!("no due date rule matches '{text}'");
        return None;
    };
    date_of_birth.checked_add_signed(Duration::days(days))
}
