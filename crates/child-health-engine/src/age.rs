//! Age derived from date of birth
//!
//! Several month conventions coexist: whole 30-day months for features and growth
//! lookups, 30.4375-day calendar months for requirement bands and recipes, and a
//! 365-day year for display.

use child_health_types::AgeGroup;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Elapsed days between a date of birth and an evaluation date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AgeSpan {
    pub days: i64,
}

const DAYS_PER_CALENDAR_MONTH: f64 = 30.4375;
const DAYS_PER_YEAR: f64 = 365.25;

impl AgeSpan {
    pub fn between(date_of_birth: NaiveDate, as_of: NaiveDate) -> Self {
        Self {
            days: (as_of - date_of_birth).num_days(),
        }
    }

    pub const fn from_days(days: i64) -> Self {
        Self { days }
    }

    /// Whole 30-day months
    pub fn months(&self) -> i64 {
        self.days.div_euclid(30)
    }

    pub fn years(&self) -> f64 {
        self.days as f64 / DAYS_PER_YEAR
    }

    /// Whole calendar months, never negative
    pub fn calendar_months(&self) -> u32 {
        if self.days <= 0 {
            return 0;
        }
        (self.days as f64 / DAYS_PER_CALENDAR_MONTH).floor() as u32
    }

    pub fn age_group(&self) -> AgeGroup {
        AgeGroup::from_age_years(self.years())
    }

    pub fn display(&self) -> AgeDisplay {
        let days = self.days.max(0);
        AgeDisplay {
            years: days / 365,
            months: (days % 365) / 30,
        }
    }
}

/// Years and months for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeDisplay {
    pub years: i64,
    pub months: i64,
}

impl fmt::Display for AgeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = |n: i64| if n == 1 { "" } else { "s" };
        match (self.years, self.months) {
            (0, m) => write!(f, "{m} month{}", plural(m)),
            (y, 0) => write!(f, "{y} year{}", plural(y)),
            (y, m) => write!(f, "{y} year{} {m} month{}", plural(y), plural(m)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_conventions_differ() {
        let span = AgeSpan::from_days(365);
        assert_eq!(span.months(), 12);
        assert_eq!(span.calendar_months(), 11);
        assert_eq!(span.age_group(), AgeGroup::Infant);
    }

    #[rstest]
    #[case(0, "0 months")]
    #[case(31, "1 month")]
    #[case(365, "1 year")]
    #[case(365 + 95, "1 year 3 months")]
    #[case(800, "2 years 2 months")]
    fn test_display(#[case] days: i64, #[case] expected: &str) {
        assert_eq!(AgeSpan::from_days(days).display().to_string(), expected);
    }

    #[test]
    fn test_future_birth_date_is_clamped() {
        let span = AgeSpan::between(date(2024, 6, 1), date(2024, 5, 1));
        assert!(span.days < 0);
        assert_eq!(span.calendar_months(), 0);
        assert_eq!(span.months(), -2);
        assert_eq!(span.display().to_string(), "0 months");
    }

    #[test]
    fn test_between() {
        let span = AgeSpan::between(date(2023, 1, 1), date(2024, 9, 1));
        assert_eq!(span.days, 609);
        assert_eq!(span.months(), 20);
        assert_eq!(span.age_group(), AgeGroup::Toddler);
    }
}
