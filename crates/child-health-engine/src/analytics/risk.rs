//! Aggregate risk classification
//!
//! A pure function of its inputs. Red conditions are checked first and, when
//! any holds, the Yellow conditions are not evaluated at all.

use crate::config::EngineConfig;
use crate::engine::HealthEngine;
use child_health_types::{Nutrient, RiskLevel, RiskReason, RiskResult};
use serde::{Deserialize, Serialize};

const SEVERE_Z: f64 = -3.0;
const BORDERLINE_Z: f64 = -2.0;

/// Signals fused into the risk verdict
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskInputs {
    pub weight_z: f64,
    pub height_z: f64,
    /// kg per 30 days; absent when there is no trend
    pub avg_weight_gain: Option<f64>,
    pub missed_vaccine_count: u32,
    /// Primary deficiency among protein, energy, iron and calcium
    pub nutrient_deficiency: Option<Nutrient>,
    /// Energy intake as percent of requirement; 0 when unknown
    pub energy_intake_pct: f64,
    pub next_due_in_days: Option<i64>,
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn is_energy_or_protein(n: Nutrient) -> bool {
    matches!(n, Nutrient::Energy | Nutrient::Protein)
}

/// Classify into Red, Yellow or Green with ordered reasons
pub fn classify_risk(inputs: &RiskInputs, config: &EngineConfig) -> RiskResult {
    let wz = finite_or_zero(inputs.weight_z);
    let hz = finite_or_zero(inputs.height_z);
    let gain = inputs.avg_weight_gain.map_or(0.0, finite_or_zero);
    let energy_pct = finite_or_zero(inputs.energy_intake_pct);

    let mut red = Vec::new();
    if wz <= SEVERE_Z || hz <= SEVERE_Z {
        red.push(RiskReason::SevereUndernutrition);
    }
    if gain < 0.0 {
        red.push(RiskReason::GrowthFaltering);
    }
    if inputs.missed_vaccine_count >= 2 {
        red.push(RiskReason::MultipleMissedVaccines);
    }
    if let Some(n) = inputs.nutrient_deficiency.filter(|n| is_energy_or_protein(*n)) {
        if energy_pct < config.severe_energy_pct {
            red.push(RiskReason::SevereDietaryDeficit(n));
        }
    }
    if !red.is_empty() {
        return RiskResult {
            level: RiskLevel::Red,
            reasons: red,
        };
    }

    let borderline = |z: f64| z > SEVERE_Z && z <= BORDERLINE_Z;
    let mut yellow = Vec::new();
    if borderline(wz) || borderline(hz) {
        yellow.push(RiskReason::BorderlineGrowth);
    }
    if inputs.missed_vaccine_count == 1 {
        yellow.push(RiskReason::MissedVaccine);
    }
    if inputs
        .next_due_in_days
        .is_some_and(|d| (0..=config.due_soon_days).contains(&d))
    {
        yellow.push(RiskReason::UpcomingVaccineDueSoon);
    }
    if let Some(n) = inputs.nutrient_deficiency.filter(|n| !is_energy_or_protein(*n)) {
        yellow.push(RiskReason::NutrientDeficit(n));
    }
    if yellow.is_empty() {
        RiskResult::green()
    } else {
        RiskResult {
            level: RiskLevel::Yellow,
            reasons: yellow,
        }
    }
}

impl HealthEngine<'_> {
    /// [`classify_risk`] with this engine's thresholds
    pub fn classify_risk(&self, inputs: &RiskInputs) -> RiskResult {
        classify_risk(inputs, self.config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn classify(inputs: RiskInputs) -> RiskResult {
        classify_risk(&inputs, &EngineConfig::default())
    }

    #[test]
    fn test_no_signal_is_green() {
        assert_eq!(classify(RiskInputs::default()), RiskResult::green());
    }

    #[test]
    fn test_red_accumulates_its_reasons() {
        let result = classify(RiskInputs {
            weight_z: -3.2,
            avg_weight_gain: Some(-0.2),
            missed_vaccine_count: 3,
            nutrient_deficiency: Some(Nutrient::Protein),
            energy_intake_pct: 45.0,
            next_due_in_days: Some(3),
            ..Default::default()
        });
        assert_eq!(result.level, RiskLevel::Red);
        insta::assert_debug_snapshot!(result.codes(), @r###"
        [
            "severe_undernutrition",
            "growth_faltering",
            "multiple_missed_vaccines",
            "severe_dietary_deficit_protein",
        ]
        "###);
    }

    #[test]
    fn test_yellow_accumulates_its_reasons() {
        let result = classify(RiskInputs {
            height_z: -2.0,
            missed_vaccine_count: 1,
            nutrient_deficiency: Some(Nutrient::Iron),
            energy_intake_pct: 95.0,
            next_due_in_days: Some(14),
            ..Default::default()
        });
        assert_eq!(result.level, RiskLevel::Yellow);
        insta::assert_debug_snapshot!(result.codes(), @r###"
        [
            "borderline_growth",
            "missed_vaccine",
            "upcoming_vaccine_due_soon",
            "nutrient_deficit_iron",
        ]
        "###);
    }

    #[rstest]
    #[case(Some(Nutrient::Energy), 59.9, RiskLevel::Red)]
    #[case(Some(Nutrient::Energy), 60.0, RiskLevel::Green)]
    #[case(Some(Nutrient::Protein), 10.0, RiskLevel::Red)]
    #[case(Some(Nutrient::Calcium), 10.0, RiskLevel::Yellow)]
    #[case(None, 0.0, RiskLevel::Green)]
    fn test_dietary_deficit(#[case] deficiency: Option<Nutrient>, #[case] energy_pct: f64, #[case] expected: RiskLevel) {
        let result = classify(RiskInputs {
            nutrient_deficiency: deficiency,
            energy_intake_pct: energy_pct,
            ..Default::default()
        });
        assert_eq!(result.level, expected);
    }

    #[rstest]
    #[case(Some(-1), false)]
    #[case(Some(0), true)]
    #[case(Some(15), false)]
    #[case(None, false)]
    fn test_due_soon_window(#[case] days: Option<i64>, #[case] due_soon: bool) {
        let result = classify(RiskInputs {
            next_due_in_days: days,
            ..Default::default()
        });
        assert_eq!(result.reasons.contains(&RiskReason::UpcomingVaccineDueSoon), due_soon);
    }

    #[test]
    fn test_non_finite_scores_are_neutral() {
        let result = classify(RiskInputs {
            weight_z: f64::NAN,
            height_z: f64::NEG_INFINITY,
            ..Default::default()
        });
        assert_eq!(result, RiskResult::green());
    }

    proptest! {
        #[test]
        fn prop_severe_weight_is_always_red(
            height_z in -5.0f64..5.0,
            gain in proptest::option::of(-1.0f64..1.0),
            missed in 0u32..5,
            energy_pct in 0.0f64..200.0,
            due in proptest::option::of(-30i64..60),
        ) {
            let result = classify(RiskInputs {
                weight_z: -3.5,
                height_z,
                avg_weight_gain: gain,
                missed_vaccine_count: missed,
                nutrient_deficiency: Some(Nutrient::Iron),
                energy_intake_pct: energy_pct,
                next_due_in_days: due,
            });
            prop_assert_eq!(result.level, RiskLevel::Red);
            prop_assert_eq!(result.reasons[0], RiskReason::SevereUndernutrition);
        }
    }
}
