//! Meal logs and the food catalog

use crate::nutrient::NutrientTotals;
use crate::subject::AgeGroup;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Meal slot an item was eaten in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    MidMorning,
    Lunch,
    EveningSnack,
    Dinner,
    #[serde(other)]
    Other,
}

/// What was eaten: a catalog entry or a caregiver-typed name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodRef {
    Catalog(u32),
    Custom(String),
}

/// One eaten item with its resolved per-serving nutrients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealItem {
    pub meal_slot: MealSlot,
    pub food: FoodRef,
    #[serde(default)]
    pub quantity_g: Option<f64>,
    /// Times the item was eaten that day
    #[serde(default = "default_frequency")]
    pub frequency: u32,
    #[serde(default)]
    pub nutrients: NutrientTotals,
}

fn default_frequency() -> u32 {
    1
}

impl MealItem {
    pub fn new(meal_slot: MealSlot, food: FoodRef, nutrients: NutrientTotals) -> Self {
        Self {
            meal_slot,
            food,
            quantity_g: None,
            frequency: 1,
            nutrients,
        }
    }

    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Repetition count, at least one
    pub fn effective_frequency(&self) -> u32 {
        self.frequency.max(1)
    }
}

/// A day's eaten items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLog {
    pub log_date: NaiveDate,
    /// When the log was written, compared against prediction report times
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub items: Vec<MealItem>,
}

/// Age group a catalog food is offered to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodAgeGroup {
    Infant,
    Toddler,
    Preschool,
    #[serde(alias = "school_age")]
    SchoolAge,
    All,
}

impl FoodAgeGroup {
    /// Whether foods of this group are offered to a subject in `group`
    pub fn serves(&self, group: AgeGroup) -> bool {
        match self {
            Self::All => true,
            Self::Infant => group == AgeGroup::Infant,
            Self::Toddler => group == AgeGroup::Toddler,
            Self::Preschool => group == AgeGroup::Preschool,
            Self::SchoolAge => group == AgeGroup::SchoolAge,
        }
    }
}

/// Catalog food with nutrients per average serving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: u32,
    pub name: String,
    pub age_group: FoodAgeGroup,
    #[serde(default)]
    pub food_group: Option<String>,
    #[serde(default)]
    pub avg_serving_g: Option<f64>,
    #[serde(flatten)]
    pub per_serving: NutrientTotals,
    #[serde(default = "default_veg")]
    pub is_veg: bool,
}

fn default_veg() -> bool {
    true
}

impl Food {
    const FALLBACK_SERVING_G: f64 = 100.0;

    /// Nutrients for a serving of `serving_g` grams (one average serving when absent)
    pub fn nutrients_for_serving(&self, serving_g: Option<f64>) -> NutrientTotals {
        let avg = self
            .avg_serving_g
            .filter(|g| *g > 0.0)
            .unwrap_or(Self::FALLBACK_SERVING_G);
        let serving = serving_g.filter(|g| *g > 0.0).unwrap_or(avg);
        self.per_serving.scaled(serving / avg)
    }

    pub fn is_milk_group(&self) -> bool {
        self.food_group
            .as_deref()
            .is_some_and(|g| g.eq_ignore_ascii_case("milk"))
    }
}
