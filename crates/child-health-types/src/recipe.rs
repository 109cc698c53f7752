//! Recipe catalog entries

use crate::nutrient::Nutrient;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Energy density tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyDensity {
    Low,
    Medium,
    High,
}

/// Meal type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// Texture tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Texture {
    Liquid,
    Soft,
    SemiSolid,
    Solid,
}

/// Immutable recipe catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Stable catalog code
    pub code: String,
    pub name: String,
    pub age_min_months: u32,
    pub age_max_months: u32,
    pub primary_nutrient: Nutrient,
    #[serde(default)]
    pub secondary_nutrients: SmallVec<[Nutrient; 4]>,
    #[serde(default)]
    pub energy_density: Option<EnergyDensity>,
    #[serde(default)]
    pub meal_type: Option<MealType>,
    #[serde(default)]
    pub texture: Option<Texture>,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub prep_time_mins: Option<u32>,
    #[serde(default)]
    pub is_veg: Option<bool>,
    #[serde(default)]
    pub video_url: Option<String>,
}

impl Recipe {
    pub fn suits_age(&self, age_months: u32) -> bool {
        self.age_min_months <= age_months && age_months <= self.age_max_months
    }

    /// Lowercased name and ingredients, the text safety rules scan
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.ingredients, self.name).to_lowercase()
    }

    /// Primary followed by secondary nutrients
    pub fn nutrients(&self) -> impl Iterator<Item = Nutrient> + '_ {
        std::iter::once(self.primary_nutrient).chain(self.secondary_nutrients.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal() {
        let recipe: Recipe = serde_json::from_str(
            r#"{"code": "R6-01", "name": "Ragi malt", "age_min_months": 6, "age_max_months": 11,
                "primary_nutrient": "calcium_mg", "secondary_nutrients": ["iron_mg"],
                "texture": "semi-solid", "ingredients": "Ragi flour, Water"}"#,
        )
        .unwrap();
        assert_eq!(recipe.texture, Some(Texture::SemiSolid));
        assert_eq!(
            recipe.nutrients().collect::<Vec<_>>(),
            vec![Nutrient::Calcium, Nutrient::Iron]
        );
        assert!(recipe.suits_age(6));
        assert!(!recipe.suits_age(12));
        assert_eq!(recipe.searchable_text(), "ragi flour, water ragi malt");
    }
}
