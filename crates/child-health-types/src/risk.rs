//! Aggregate risk verdicts

use crate::nutrient::Nutrient;
use serde::{Serialize, Serializer};
use std::fmt;

/// Risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskLevel {
    Red,
    Yellow,
    Green,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Red => "Red",
            Self::Yellow => "Yellow",
            Self::Green => "Green",
        })
    }
}

/// Machine-readable reason behind a risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskReason {
    SevereUndernutrition,
    GrowthFaltering,
    MultipleMissedVaccines,
    /// Severe energy intake deficit with energy or protein as primary deficiency
    SevereDietaryDeficit(Nutrient),
    BorderlineGrowth,
    MissedVaccine,
    UpcomingVaccineDueSoon,
    NutrientDeficit(Nutrient),
}

impl RiskReason {
    /// Stable code for display mapping
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SevereUndernutrition => "severe_undernutrition",
            Self::GrowthFaltering => "growth_faltering",
            Self::MultipleMissedVaccines => "multiple_missed_vaccines",
            Self::SevereDietaryDeficit(Nutrient::Protein) => "severe_dietary_deficit_protein",
            Self::SevereDietaryDeficit(_) => "severe_dietary_deficit_energy",
            Self::BorderlineGrowth => "borderline_growth",
            Self::MissedVaccine => "missed_vaccine",
            Self::UpcomingVaccineDueSoon => "upcoming_vaccine_due_soon",
            Self::NutrientDeficit(n) => match n {
                Nutrient::Energy => "nutrient_deficit_energy",
                Nutrient::Protein => "nutrient_deficit_protein",
                Nutrient::Carbohydrate => "nutrient_deficit_carbohydrate",
                Nutrient::Fat => "nutrient_deficit_fat",
                Nutrient::Iron => "nutrient_deficit_iron",
                Nutrient::Calcium => "nutrient_deficit_calcium",
                Nutrient::VitaminA => "nutrient_deficit_vitamin_a",
                Nutrient::VitaminC => "nutrient_deficit_vitamin_c",
            },
        }
    }
}

impl fmt::Display for RiskReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for RiskReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Risk tier with its ordered reasons
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskResult {
    pub level: RiskLevel,
    pub reasons: Vec<RiskReason>,
}

impl RiskResult {
    pub fn green() -> Self {
        Self {
            level: RiskLevel::Green,
            reasons: Vec::new(),
        }
    }

    /// Reason codes as strings
    pub fn codes(&self) -> Vec<&'static str> {
        self.reasons.iter().map(RiskReason::code).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes_are_stable() {
        assert_eq!(
            RiskReason::SevereDietaryDeficit(Nutrient::Energy).code(),
            "severe_dietary_deficit_energy"
        );
        assert_eq!(
            RiskReason::NutrientDeficit(Nutrient::VitaminA).code(),
            "nutrient_deficit_vitamin_a"
        );
    }

    #[test]
    fn test_serializes_as_codes() {
        let result = RiskResult {
            level: RiskLevel::Yellow,
            reasons: vec![RiskReason::MissedVaccine, RiskReason::NutrientDeficit(Nutrient::Iron)],
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"level":"Yellow","reasons":["missed_vaccine","nutrient_deficit_iron"]}"#
        );
    }
}
