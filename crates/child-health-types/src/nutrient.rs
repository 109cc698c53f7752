//! Nutrients, nutrient vectors and requirement bands

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the eight tracked nutrients
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    #[serde(rename = "energy_kcal")]
    Energy,
    #[serde(rename = "protein_g")]
    Protein,
    #[serde(rename = "carb_g")]
    Carbohydrate,
    #[serde(rename = "fat_g")]
    Fat,
    #[serde(rename = "iron_mg")]
    Iron,
    #[serde(rename = "calcium_mg")]
    Calcium,
    #[serde(rename = "vitamin_a_mcg")]
    VitaminA,
    #[serde(rename = "vitamin_c_mg")]
    VitaminC,
}

impl Nutrient {
    /// All nutrients in reporting order
    pub const ALL: [Nutrient; 8] = [
        Nutrient::Energy,
        Nutrient::Protein,
        Nutrient::Carbohydrate,
        Nutrient::Fat,
        Nutrient::Iron,
        Nutrient::Calcium,
        Nutrient::VitaminA,
        Nutrient::VitaminC,
    ];

    /// Stable key, also the field name in nutrient records
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Energy => "energy_kcal",
            Self::Protein => "protein_g",
            Self::Carbohydrate => "carb_g",
            Self::Fat => "fat_g",
            Self::Iron => "iron_mg",
            Self::Calcium => "calcium_mg",
            Self::VitaminA => "vitamin_a_mcg",
            Self::VitaminC => "vitamin_c_mg",
        }
    }

    /// Human-readable name
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Energy => "Energy",
            Self::Protein => "Protein",
            Self::Carbohydrate => "Carbohydrate",
            Self::Fat => "Fat",
            Self::Iron => "Iron",
            Self::Calcium => "Calcium",
            Self::VitaminA => "Vitamin A",
            Self::VitaminC => "Vitamin C",
        }
    }

    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Energy => "kcal",
            Self::Protein | Self::Carbohydrate | Self::Fat => "g",
            Self::Iron | Self::Calcium | Self::VitaminC => "mg",
            Self::VitaminA => "mcg",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error for an unrecognized nutrient name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNutrient(pub String);

impl fmt::Display for UnknownNutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown nutrient '{}'", self.0)
    }
}

impl std::error::Error for UnknownNutrient {}

impl FromStr for Nutrient {
    type Err = UnknownNutrient;

    /// Accepts keys (`iron_mg`) and plain names (`iron`, `Vitamin A`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = crate::text::normalize_identifier(s);
        Nutrient::ALL
            .into_iter()
            .find(|n| n.key() == norm || crate::text::normalize_identifier(n.label()) == norm)
            .or(match norm.as_str() {
                "energy" | "calories" | "kcal" => Some(Nutrient::Energy),
                "carbs" | "carbohydrates" => Some(Nutrient::Carbohydrate),
                _ => None,
            })
            .ok_or_else(|| UnknownNutrient(s.to_string()))
    }
}

/// Flat record form used for (de)serialization
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct NutrientRecord {
    energy_kcal: f64,
    protein_g: f64,
    carb_g: f64,
    fat_g: f64,
    iron_mg: f64,
    calcium_mg: f64,
    vitamin_a_mcg: f64,
    vitamin_c_mg: f64,
}

/// Amounts of all eight nutrients. Every amount is finite and non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "NutrientRecord", into = "NutrientRecord")]
pub struct NutrientTotals {
    values: [f64; 8],
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

impl NutrientTotals {
    /// All-zero totals
    pub const ZERO: NutrientTotals = NutrientTotals { values: [0.0; 8] };

    /// Build from amounts in `Nutrient::ALL` order
    pub fn from_array(values: [f64; 8]) -> Self {
        Self {
            values: values.map(sanitize),
        }
    }

    /// Set one amount, returning the updated totals
    pub fn with(mut self, nutrient: Nutrient, value: f64) -> Self {
        self.set(nutrient, value);
        self
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        self.values[nutrient as usize]
    }

    /// Set one amount; negative or non-finite values are stored as zero
    pub fn set(&mut self, nutrient: Nutrient, value: f64) {
        self.values[nutrient as usize] = sanitize(value);
    }

    /// Add `other × factor` in place
    pub fn add_scaled(&mut self, other: &NutrientTotals, factor: f64) {
        for n in Nutrient::ALL {
            let sum = self.get(n) + other.get(n) * factor;
            self.set(n, sum);
        }
    }

    /// Every amount multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        let mut out = NutrientTotals::ZERO;
        out.add_scaled(self, factor);
        out
    }

    /// Each amount rounded to `decimals` places
    pub fn rounded(&self, decimals: i32) -> Self {
        let factor = 10f64.powi(decimals);
        Self::from_array(self.values.map(|v| (v * factor).round() / factor))
    }

    /// Iterate `(nutrient, amount)` pairs in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        Nutrient::ALL.into_iter().map(|n| (n, self.get(n)))
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }
}

impl From<NutrientRecord> for NutrientTotals {
    fn from(r: NutrientRecord) -> Self {
        Self::from_array([
            r.energy_kcal,
            r.protein_g,
            r.carb_g,
            r.fat_g,
            r.iron_mg,
            r.calcium_mg,
            r.vitamin_a_mcg,
            r.vitamin_c_mg,
        ])
    }
}

impl From<NutrientTotals> for NutrientRecord {
    fn from(t: NutrientTotals) -> Self {
        let [energy_kcal, protein_g, carb_g, fat_g, iron_mg, calcium_mg, vitamin_a_mcg, vitamin_c_mg] =
            t.values;
        Self {
            energy_kcal,
            protein_g,
            carb_g,
            fat_g,
            iron_mg,
            calcium_mg,
            vitamin_a_mcg,
            vitamin_c_mg,
        }
    }
}

/// Intake relative to a daily requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adequacy {
    Deficit,
    Adequate,
    Excess,
    NotApplicable,
}

impl Adequacy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deficit => "deficit",
            Self::Adequate => "adequate",
            Self::Excess => "excess",
            Self::NotApplicable => "not_applicable",
        }
    }
}

impl fmt::Display for Adequacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daily targets for an inclusive age band in months
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRequirement {
    pub age_min_months: u32,
    pub age_max_months: u32,
    #[serde(flatten)]
    pub targets: NutrientTotals,
}

impl NutritionRequirement {
    pub fn contains(&self, age_months: u32) -> bool {
        self.age_min_months <= age_months && age_months <= self.age_max_months
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_negative_amounts_are_zeroed() {
        let totals: NutrientTotals =
            serde_json::from_str(r#"{"energy_kcal": -5, "iron_mg": 2.5}"#).unwrap();
        assert_eq!(totals.get(Nutrient::Energy), 0.0);
        assert_eq!(totals.get(Nutrient::Iron), 2.5);
        assert_eq!(totals.get(Nutrient::Protein), 0.0);
    }

    #[test]
    fn test_serializes_flat_keys() {
        let totals = NutrientTotals::ZERO.with(Nutrient::VitaminC, 40.0);
        let json = serde_json::to_value(totals).unwrap();
        assert_eq!(json["vitamin_c_mg"], 40.0);
        assert_eq!(json["energy_kcal"], 0.0);
    }

    #[test]
    fn test_requirement_flattened_targets() {
        let req: NutritionRequirement = serde_json::from_str(
            r#"{"age_min_months": 12, "age_max_months": 23, "energy_kcal": 900, "protein_g": 11}"#,
        )
        .unwrap();
        assert!(req.contains(12));
        assert!(req.contains(23));
        assert!(!req.contains(24));
        assert_eq!(req.targets.get(Nutrient::Energy), 900.0);
    }

    #[test]
    fn test_nutrient_parsing() {
        assert_eq!("iron_mg".parse::<Nutrient>(), Ok(Nutrient::Iron));
        assert_eq!("Vitamin A".parse::<Nutrient>(), Ok(Nutrient::VitaminA));
        assert_eq!("energy".parse::<Nutrient>(), Ok(Nutrient::Energy));
        assert!("zinc".parse::<Nutrient>().is_err());
    }

    proptest! {
        #[test]
        fn prop_amounts_never_negative(values in proptest::array::uniform8(-1.0e6f64..1.0e6), factor in -10.0f64..10.0) {
            let totals = NutrientTotals::from_array(values);
            let mut acc = NutrientTotals::ZERO;
            acc.add_scaled(&totals, factor);
            for (_, v) in acc.iter() {
                prop_assert!(v >= 0.0 && v.is_finite());
            }
        }
    }
}
