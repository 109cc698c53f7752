//! Engine benchmarks using divan
//!
//! Benchmarks for the per-request analytics over the embedded reference data.

use chrono::{Duration, NaiveDate};
use child_health_engine::{EvaluationContext, HealthEngine, SubjectRecords, due_date};
use child_health_types::{
    FoodRef, GrowthMetric, IllnessLog, MealItem, MealLog, MealSlot, Measurement, Nutrient, NutrientTotals,
    Sex, Subject, VaccineStatusRecord,
};

fn main() {
    divan::main();
}

fn dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
}

fn context() -> EvaluationContext {
    EvaluationContext::new(Subject::new(Sex::Female, dob()), dob() + Duration::days(600))
}

// Helper to create a month of daily records
fn records() -> SubjectRecords {
    let as_of = context().as_of;
    let meal_logs = (0..30)
        .map(|i| {
            let on = as_of - Duration::days(i);
            MealLog {
                log_date: on,
                created_at: on.and_hms_opt(20, 0, 0).unwrap(),
                items: vec![
                    MealItem::new(
                        MealSlot::Breakfast,
                        FoodRef::Catalog(12),
                        NutrientTotals::ZERO.with(Nutrient::Energy, 180.0).with(Nutrient::Protein, 4.0),
                    ),
                    MealItem::new(
                        MealSlot::Lunch,
                        FoodRef::Custom("Khichdi".into()),
                        NutrientTotals::ZERO.with(Nutrient::Energy, 220.0).with(Nutrient::Iron, 1.2),
                    ),
                ],
            }
        })
        .collect();
    SubjectRecords {
        measurements: (0..6)
            .map(|i| {
                Measurement::new(as_of - Duration::days(30 * i))
                    .with_weight(10.5 - 0.2 * i as f64)
                    .with_height(81.0 - 0.8 * i as f64)
            })
            .collect(),
        meal_logs,
        illness_logs: vec![IllnessLog::new(as_of - Duration::days(12)).with_fever()],
        vaccine_records: (1..=3).map(|d| VaccineStatusRecord::given(4, d, dob() + Duration::days(120))).collect(),
        milestone_records: Vec::new(),
    }
}

// === Growth Benchmarks ===

mod growth {
    use super::*;

    #[divan::bench]
    fn zscore_tabulated(bencher: divan::Bencher) {
        let engine = HealthEngine::embedded().unwrap();
        bencher.bench_local(|| engine.zscore(Sex::Male, divan::black_box(20.0), 9.0, GrowthMetric::WeightForAge));
    }

    #[divan::bench]
    fn zscore_interpolated(bencher: divan::Bencher) {
        let engine = HealthEngine::embedded().unwrap();
        bencher.bench_local(|| engine.zscore(Sex::Female, divan::black_box(37.4), 95.0, GrowthMetric::HeightForAge));
    }
}

// === Schedule Text Benchmarks ===

mod schedule {
    use super::*;

    #[divan::bench(args = ["At birth", "6, 10, 14 weeks", "15\u{2013}18 months", "every year"])]
    fn parse_due_date(text: &str) -> Option<NaiveDate> {
        due_date(divan::black_box(text), 2, dob())
    }
}

// === Whole-Profile Benchmarks ===

mod profile {
    use super::*;

    #[divan::bench]
    fn weekly_summary(bencher: divan::Bencher) {
        let engine = HealthEngine::embedded().unwrap();
        let (ctx, records) = (context(), records());
        bencher.bench_local(|| engine.weekly_summary(&ctx, divan::black_box(&records.meal_logs), None));
    }

    #[divan::bench]
    fn build_features(bencher: divan::Bencher) {
        let engine = HealthEngine::embedded().unwrap();
        let (ctx, records) = (context(), records());
        bencher.bench_local(|| engine.build_features(&ctx, divan::black_box(&records)));
    }

    #[divan::bench]
    fn profile_summary(bencher: divan::Bencher) {
        let engine = HealthEngine::embedded().unwrap();
        let (ctx, records) = (context(), records());
        bencher.bench_local(|| engine.profile_summary(&ctx, divan::black_box(&records), None));
    }
}
