//! Growth z-scores, weight trend and derived anthropometry
//!
//! z-scores follow the LMS method over the reference tables. The computation is
//! total: a missing value, an empty table, a non-positive median or spread, or a
//! non-finite result all yield the neutral score 0.0.

use crate::context::EvaluationContext;
use crate::engine::HealthEngine;
use chrono::{Duration, NaiveDate};
use child_health_types::{
    GrowthMetric, HeightForAgeClass, LmsPoint, Measurement, ReferenceFamily, Sex, TrendDirection,
    WeightForAgeClass,
};
use serde::Serialize;

/// Interpolate L, M and S at `age_months` over rows sorted by age.
///
/// Ages outside the table clamp to the nearest end row.
pub fn interpolate_lms(rows: &[LmsPoint], age_months: f64) -> Option<LmsPoint> {
    let (first, last) = (rows.first()?, rows.last()?);
    if !age_months.is_finite() {
        return None;
    }
    if age_months <= first.age_months {
        return Some(*first);
    }
    if age_months >= last.age_months {
        return Some(*last);
    }
    if let Some(row) = rows.iter().find(|r| r.age_months == age_months) {
        return Some(*row);
    }
    let pair = rows
        .windows(2)
        .find(|w| w[0].age_months <= age_months && age_months <= w[1].age_months)?;
    let (lo, hi) = (pair[0], pair[1]);
    if hi.age_months == lo.age_months {
        return Some(lo);
    }
    let t = (age_months - lo.age_months) / (hi.age_months - lo.age_months);
    let lerp = |a: f64, b: f64| a + t * (b - a);
    Some(LmsPoint::new(
        age_months,
        lerp(lo.l, hi.l),
        lerp(lo.m, hi.m),
        lerp(lo.s, hi.s),
    ))
}

/// LMS transform of a single value; `None` when undefined
pub fn lms_transform(value: f64, point: &LmsPoint) -> Option<f64> {
    let LmsPoint { l, m, s, .. } = *point;
    if !value.is_finite() || !(m > 0.0) || !(s > 0.0) {
        return None;
    }
    let z = if l == 0.0 {
        (value / m).ln() / s
    } else {
        ((value / m).powf(l) - 1.0) / (l * s)
    };
    z.is_finite().then_some(z)
}

pub fn classify_weight_for_age(z: f64) -> WeightForAgeClass {
    if z < -2.0 {
        WeightForAgeClass::Underweight
    } else if z > 2.0 {
        WeightForAgeClass::Overweight
    } else {
        WeightForAgeClass::Normal
    }
}

pub fn classify_height_for_age(z: f64) -> HeightForAgeClass {
    if z < -2.0 {
        HeightForAgeClass::Stunted
    } else {
        HeightForAgeClass::Normal
    }
}

/// Direction of the average monthly weight gain; no trend reads as stable
pub fn trend_direction(avg_gain: Option<f64>) -> TrendDirection {
    match avg_gain {
        Some(g) if g >= 0.1 => TrendDirection::Improving,
        Some(g) if g <= -0.05 => TrendDirection::Declining,
        _ => TrendDirection::Stable,
    }
}

/// Body mass index; needs a non-zero weight and height
pub fn bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<f64> {
    let (w, h) = (weight_kg.filter(|w| *w != 0.0)?, height_cm.filter(|h| *h != 0.0)?);
    let h_m = h / 100.0;
    Some(w / (h_m * h_m).max(1e-6))
}

pub const MUAC_FALLBACK_CM: f64 = 9.5;

/// Mid-upper-arm circumference estimated from weight, height and sex code
pub fn estimate_muac(sex: Sex, weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<f64> {
    let (w, h) = (weight_kg?, height_cm?);
    let estimate = 10.5 + 0.25 * w + 0.02 * (h - 60.0) + 0.3 * f64::from(sex.feature_code());
    Some(estimate.clamp(9.0, 17.0))
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Weight change over the trailing window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightTrend {
    /// Average gain in kg per 30 days
    pub avg_gain: Option<f64>,
    /// Gain in kg per day
    pub velocity: Option<f64>,
    /// Measurements inside the window, with or without weight
    pub points: usize,
}

impl WeightTrend {
    /// Two or more measurements in the window mark an existing subject
    pub fn is_existing(&self) -> bool {
        self.points >= 2
    }
}

/// z-scores and classes for one measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthAssessment {
    pub log_date: NaiveDate,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub weight_zscore: f64,
    pub height_zscore: f64,
    pub weight_for_age: WeightForAgeClass,
    pub height_for_age: HeightForAgeClass,
    pub bmi: Option<f64>,
}

impl HealthEngine<'_> {
    /// z-score of `value` for a sex, age and metric
    pub fn zscore(&self, sex: Sex, age_months: f64, value: f64, metric: GrowthMetric) -> f64 {
        let family = ReferenceFamily::for_age(age_months);
        let rows = self.reference().growth().rows(family, metric, sex);
        interpolate_lms(rows, age_months)
            .and_then(|point| lms_transform(value, &point))
            .unwrap_or(0.0)
    }

    /// As [`HealthEngine::zscore`] for an optional value; a missing value scores 0.0
    pub fn measurement_zscore(&self, sex: Sex, age_months: f64, value: Option<f64>, metric: GrowthMetric) -> f64 {
        value.map_or(0.0, |v| self.zscore(sex, age_months, v, metric))
    }

    /// Weight trend over measurements logged in the trailing window ending on `as_of`
    pub fn weight_trend(&self, measurements: &[Measurement], as_of: NaiveDate) -> WeightTrend {
        let since = as_of - Duration::days(self.config().trend_window_days);
        let mut rows: Vec<&Measurement> = measurements
            .iter()
            .filter(|m| since <= m.log_date && m.log_date <= as_of)
            .collect();
        rows.sort_by_key(|m| m.log_date);

        let points = rows.len();
        let none = WeightTrend {
            avg_gain: None,
            velocity: None,
            points,
        };
        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            return none;
        };
        if points < 2 {
            return none;
        }
        let (Some(w0), Some(w1)) = (first.weight_kg, last.weight_kg) else {
            return none;
        };
        let days = match (last.log_date - first.log_date).num_days() {
            0 => 1,
            d => d,
        };
        let delta = w1 - w0;
        WeightTrend {
            avg_gain: Some(delta / (days as f64 / 30.0).max(0.01)),
            velocity: Some(delta / days as f64),
            points,
        }
    }

    /// z-scores and classes for a measurement, aged on its log date
    pub fn assess_growth(&self, ctx: &EvaluationContext, measurement: &Measurement) -> GrowthAssessment {
        let age_months = ctx.age_on(measurement.log_date).months() as f64;
        let sex = ctx.subject.sex;
        let weight_zscore =
            self.measurement_zscore(sex, age_months, measurement.weight_kg, GrowthMetric::WeightForAge);
        let height_zscore =
            self.measurement_zscore(sex, age_months, measurement.height_cm, GrowthMetric::HeightForAge);
        GrowthAssessment {
            log_date: measurement.log_date,
            weight_kg: measurement.weight_kg,
            height_cm: measurement.height_cm,
            weight_zscore,
            height_zscore,
            weight_for_age: classify_weight_for_age(weight_zscore),
            height_for_age: classify_height_for_age(height_zscore),
            bmi: bmi(measurement.weight_kg, measurement.height_cm).map(|b| round_to(b, 3)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use child_health_reference::{GrowthReference, ReferenceData};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    // ========================================================================
    // Test Helpers
    // ========================================================================

    fn rows() -> Vec<LmsPoint> {
        vec![
            LmsPoint::new(0.0, 0.35, 3.3, 0.146),
            LmsPoint::new(12.0, 0.1, 9.6, 0.12),
            LmsPoint::new(20.0, 0.1, 11.5, 0.12),
            LmsPoint::new(23.0, 0.08, 12.2, 0.118),
        ]
    }

    fn reference() -> ReferenceData {
        ReferenceData::empty().with_growth(GrowthReference::default().with_rows(
            ReferenceFamily::Who,
            GrowthMetric::WeightForAge,
            Sex::Male,
            rows(),
        ))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ========================================================================
    // z-scores
    // ========================================================================

    #[test]
    fn test_tabulated_age_uses_row_directly() {
        let data = reference();
        let engine = HealthEngine::new(&data);
        let z = engine.zscore(Sex::Male, 20.0, 9.0, GrowthMetric::WeightForAge);
        let expected = ((9.0f64 / 11.5).powf(0.1) - 1.0) / (0.1 * 0.12);
        assert!((z - expected).abs() < 1e-12);
        assert_eq!(classify_weight_for_age(z), WeightForAgeClass::Underweight);
    }

    #[test]
    fn test_interpolates_between_rows() {
        let point = interpolate_lms(&rows(), 16.0).unwrap();
        assert!((point.m - 10.55).abs() < 1e-12);
        assert!((point.l - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_zero_lambda_uses_log() {
        let point = LmsPoint::new(0.0, 0.0, 10.0, 0.1);
        let z = lms_transform(10.0 * 1.1f64.exp().powf(0.1), &point).unwrap();
        assert!((z - 1.1).abs() < 1e-9);
    }

    #[rstest]
    #[case(LmsPoint::new(0.0, 0.1, 0.0, 0.1))]
    #[case(LmsPoint::new(0.0, 0.1, 10.0, 0.0))]
    #[case(LmsPoint::new(0.0, 0.1, -1.0, 0.1))]
    #[case(LmsPoint::new(0.0, 0.0, 10.0, f64::NAN))]
    fn test_degenerate_rows_are_undefined(#[case] point: LmsPoint) {
        assert_eq!(lms_transform(9.0, &point), None);
    }

    #[test]
    fn test_missing_data_is_neutral() {
        let data = reference();
        let engine = HealthEngine::new(&data);
        // female table is empty
        assert_eq!(engine.zscore(Sex::Female, 20.0, 9.0, GrowthMetric::WeightForAge), 0.0);
        // height tables are empty
        assert_eq!(engine.zscore(Sex::Male, 20.0, 80.0, GrowthMetric::HeightForAge), 0.0);
        assert_eq!(
            engine.measurement_zscore(Sex::Male, 20.0, None, GrowthMetric::WeightForAge),
            0.0
        );
        assert_eq!(engine.zscore(Sex::Male, f64::NAN, 9.0, GrowthMetric::WeightForAge), 0.0);
        // log of a negative value
        assert_eq!(
            lms_transform(-1.0, &LmsPoint::new(0.0, 0.0, 10.0, 0.1)),
            None
        );
    }

    proptest! {
        #[test]
        fn prop_below_table_clamps_to_first_row(age in -100.0f64..0.0, value in 2.0f64..20.0) {
            let data = reference();
            let engine = HealthEngine::new(&data);
            let clamped = engine.zscore(Sex::Male, age, value, GrowthMetric::WeightForAge);
            let at_min = engine.zscore(Sex::Male, 0.0, value, GrowthMetric::WeightForAge);
            prop_assert_eq!(clamped, at_min);
        }

        #[test]
        fn prop_zscore_is_total(age in -50.0f64..300.0, value in -50.0f64..200.0) {
            let data = reference();
            let engine = HealthEngine::new(&data);
            let z = engine.zscore(Sex::Male, age, value, GrowthMetric::WeightForAge);
            prop_assert!(z.is_finite());
        }
    }

    // ========================================================================
    // Trend and anthropometry
    // ========================================================================

    #[test]
    fn test_weight_trend() {
        let data = ReferenceData::empty();
        let engine = HealthEngine::new(&data);
        let measurements = vec![
            Measurement::new(date(2024, 6, 1)).with_weight(9.6),
            Measurement::new(date(2023, 1, 1)).with_weight(6.0),
            Measurement::new(date(2024, 3, 3)).with_weight(9.0),
        ];
        let trend = engine.weight_trend(&measurements, date(2024, 6, 10));
        assert_eq!(trend.points, 2);
        assert!(trend.is_existing());
        // 90 days between the in-window rows
        assert!((trend.avg_gain.unwrap() - 0.2).abs() < 1e-9);
        assert!((trend.velocity.unwrap() - 0.6 / 90.0).abs() < 1e-12);
        assert_eq!(trend_direction(trend.avg_gain), TrendDirection::Improving);
    }

    #[test]
    fn test_trend_needs_two_weights() {
        let data = ReferenceData::empty();
        let engine = HealthEngine::new(&data);
        let measurements = vec![
            Measurement::new(date(2024, 5, 1)).with_height(80.0),
            Measurement::new(date(2024, 6, 1)).with_weight(9.6),
        ];
        let trend = engine.weight_trend(&measurements, date(2024, 6, 10));
        assert_eq!(trend.points, 2);
        assert_eq!(trend.avg_gain, None);
        assert_eq!(trend_direction(trend.avg_gain), TrendDirection::Stable);
    }

    #[test]
    fn test_same_day_trend_uses_one_day() {
        let data = ReferenceData::empty();
        let engine = HealthEngine::new(&data);
        let measurements = vec![
            Measurement::new(date(2024, 6, 1)).with_weight(9.0),
            Measurement::new(date(2024, 6, 1)).with_weight(8.9),
        ];
        let trend = engine.weight_trend(&measurements, date(2024, 6, 1));
        assert!((trend.velocity.unwrap() + 0.1).abs() < 1e-9);
        assert_eq!(trend_direction(trend.avg_gain), TrendDirection::Declining);
    }

    #[test]
    fn test_trend_ignores_measurements_after_as_of() {
        let data = ReferenceData::empty();
        let engine = HealthEngine::new(&data);
        let as_of = date(2024, 6, 1);
        let measurements = vec![
            Measurement::new(as_of - Duration::days(30)).with_weight(11.0),
            Measurement::new(as_of + Duration::days(30)).with_weight(10.0),
        ];
        let trend = engine.weight_trend(&measurements, as_of);
        assert_eq!(trend.points, 1);
        assert!(!trend.is_existing());
        assert_eq!(trend.avg_gain, None);
        assert_eq!(trend.velocity, None);
    }

    #[rstest]
    #[case(Some(10.0), Some(100.0), Some(10.0))]
    #[case(Some(10.0), None, None)]
    #[case(Some(0.0), Some(80.0), None)]
    fn test_bmi(#[case] w: Option<f64>, #[case] h: Option<f64>, #[case] expected: Option<f64>) {
        assert_eq!(bmi(w, h), expected);
    }

    #[test]
    fn test_muac_estimate_clamps() {
        let infant = estimate_muac(Sex::Male, Some(4.0), Some(55.0)).unwrap();
        assert!((infant - 11.4).abs() < 1e-9);
        assert_eq!(estimate_muac(Sex::Female, Some(40.0), Some(140.0)), Some(17.0));
        assert_eq!(estimate_muac(Sex::Male, None, Some(55.0)), None);
    }
}
