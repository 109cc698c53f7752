//! Weekly nutrient adequacy and food suggestions
//!
//! Intake is summed over a fixed-length window and divided by the window length
//! (7 days by default) whatever the number of logged days.

use crate::analytics::recipes::RecommendedRecipe;
use crate::context::EvaluationContext;
use crate::engine::HealthEngine;
use chrono::{Duration, NaiveDate};
use child_health_types::{
    Adequacy, AgeGroup, Food, FoodAgeGroup, MealLog, Nutrient, NutrientTotals, NutritionRequirement,
};
use indexmap::IndexMap;
use serde::Serialize;

/// Intake below this percentage of the requirement is a deficit
pub const DEFICIT_BELOW_PCT: f64 = 90.0;
/// Intake above this percentage of the requirement is an excess
pub const EXCESS_ABOVE_PCT: f64 = 120.0;

/// Name or group fragments identifying breast milk and formula
pub const MILK_KEYWORDS: [&str; 10] = [
    "breastmilk",
    "breast milk",
    "breast-feeding",
    "breastfeeding",
    "mother's milk",
    "mothers milk",
    "human milk",
    "infant formula",
    "baby formula",
    "formula milk",
];

/// Nutrients that can name the major deficiency, in priority order
const MAJOR_DEFICIENCIES: [Nutrient; 4] = [
    Nutrient::Protein,
    Nutrient::Energy,
    Nutrient::Iron,
    Nutrient::Calcium,
];

/// Classify one nutrient's intake percentage
pub fn classify_intake(intake_pct: f64, requirement: f64) -> Adequacy {
    if requirement <= 0.0 {
        Adequacy::NotApplicable
    } else if intake_pct < DEFICIT_BELOW_PCT {
        Adequacy::Deficit
    } else if intake_pct <= EXCESS_ABOVE_PCT {
        Adequacy::Adequate
    } else {
        Adequacy::Excess
    }
}

/// How far below the requirement a nutrient is, in percentage points
pub fn deficit_severity(intake_pct: f64) -> f64 {
    (100.0 - intake_pct).max(0.0)
}

/// First needed nutrient among protein, energy, iron and calcium
pub fn major_deficiency(needed: &[Nutrient]) -> Option<Nutrient> {
    needed.iter().copied().find(|n| MAJOR_DEFICIENCIES.contains(n))
}

/// One nutrient's standing over the window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientAdequacy {
    pub daily_average: f64,
    pub requirement: f64,
    pub percent_of_requirement: f64,
    /// Requirement minus daily average; positive while intake falls short
    pub gap: f64,
    pub adequacy: Adequacy,
}

impl NutrientAdequacy {
    fn unrated(daily_average: f64) -> Self {
        Self {
            daily_average,
            requirement: 0.0,
            percent_of_requirement: 0.0,
            gap: 0.0,
            adequacy: Adequacy::NotApplicable,
        }
    }

    pub fn severity(&self) -> f64 {
        deficit_severity(self.percent_of_requirement)
    }
}

/// A catalog food suggested for a needed nutrient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodSuggestion {
    pub food_id: u32,
    pub name: String,
    pub age_group: FoodAgeGroup,
    pub food_group: Option<String>,
    pub is_veg: bool,
}

impl From<&Food> for FoodSuggestion {
    fn from(food: &Food) -> Self {
        Self {
            food_id: food.id,
            name: food.name.clone(),
            age_group: food.age_group,
            food_group: food.food_group.clone(),
            is_veg: food.is_veg,
        }
    }
}

/// Weekly nutrition summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionSummary {
    pub has_data: bool,
    pub window_start: Option<NaiveDate>,
    pub window_end: Option<NaiveDate>,
    pub age_months: Option<u32>,
    pub requirement: Option<NutritionRequirement>,
    pub daily_average: NutrientTotals,
    pub adequacy: IndexMap<Nutrient, NutrientAdequacy>,
    /// Deficit nutrients, most severe first
    pub needed_nutrients: Vec<Nutrient>,
    pub top_foods_by_nutrient: IndexMap<Nutrient, Vec<FoodSuggestion>>,
    pub recommended_foods: Vec<FoodSuggestion>,
    pub recommended_recipes: Vec<RecommendedRecipe>,
    pub message: Option<String>,
}

impl NutritionSummary {
    /// Result for a subject without any meal log
    pub fn no_data() -> Self {
        Self {
            has_data: false,
            window_start: None,
            window_end: None,
            age_months: None,
            requirement: None,
            daily_average: NutrientTotals::ZERO,
            adequacy: IndexMap::new(),
            needed_nutrients: Vec::new(),
            top_foods_by_nutrient: IndexMap::new(),
            recommended_foods: Vec::new(),
            recommended_recipes: Vec::new(),
            message: Some("No meal logs found for this child.".to_string()),
        }
    }

    pub fn adequacy_of(&self, nutrient: Nutrient) -> Adequacy {
        self.adequacy
            .get(&nutrient)
            .map_or(Adequacy::NotApplicable, |a| a.adequacy)
    }

    pub fn percent_of(&self, nutrient: Nutrient) -> f64 {
        self.adequacy
            .get(&nutrient)
            .map_or(0.0, |a| a.percent_of_requirement)
    }

    pub fn major_deficiency(&self) -> Option<Nutrient> {
        major_deficiency(&self.needed_nutrients)
    }
}

/// Window over which intake is averaged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NutritionWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
}

impl NutritionWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Sum of `nutrient × frequency` over the items of logs inside the window
pub fn window_totals<'a>(logs: impl IntoIterator<Item = &'a MealLog>, window: &NutritionWindow) -> NutrientTotals {
    let mut totals = NutrientTotals::ZERO;
    for log in logs.into_iter().filter(|l| window.contains(l.log_date)) {
        for item in &log.items {
            totals.add_scaled(&item.nutrients, f64::from(item.effective_frequency()));
        }
    }
    totals
}

fn is_breastmilk_like(food: &Food) -> bool {
    let text = format!(
        "{} {}",
        food.name.to_lowercase(),
        food.food_group.as_deref().unwrap_or_default().to_lowercase()
    );
    MILK_KEYWORDS.iter().any(|k| text.contains(k))
}

impl HealthEngine<'_> {
    /// Averaging window: `[start, start + days - 1]` when a start is given,
    /// otherwise the window ending on the latest log date
    pub fn nutrition_window(&self, meal_logs: &[MealLog], start: Option<NaiveDate>) -> Option<NutritionWindow> {
        let days = self.config().nutrition_window_days;
        let span = Duration::days(days - 1);
        let (start, end) = match start {
            Some(start) => (start, start + span),
            None => {
                let end = meal_logs.iter().map(|l| l.log_date).max()?;
                (end - span, end)
            }
        };
        Some(NutritionWindow { start, end, days })
    }

    /// Nutrient adequacy, needed nutrients and food and recipe suggestions
    pub fn weekly_summary(
        &self,
        ctx: &EvaluationContext,
        meal_logs: &[MealLog],
        start: Option<NaiveDate>,
    ) -> NutritionSummary {
        if meal_logs.is_empty() {
            return NutritionSummary::no_data();
        }
        let Some(window) = self.nutrition_window(meal_logs, start) else {
            return NutritionSummary::no_data();
        };

        let daily_average = window_totals(meal_logs, &window).scaled(1.0 / window.days as f64);
        let age = ctx.age_on(window.end);
        let age_months = age.calendar_months();
        let requirement = self.reference().requirement_for(age_months).cloned();
        match &requirement {
            Some(band) => log::debug!(
                "requirement band {}-{} months for age {age_months}",
                band.age_min_months,
                band.age_max_months
            ),
            None => log::debug!("no requirement band covers age {age_months} months"),
        }

        let adequacy = rate_intake(&daily_average, requirement.as_ref(), age_months);
        let needed_nutrients = rank_deficits(&adequacy);

        let foods = self.candidate_foods(age.age_group(), age_months);
        let top_foods_by_nutrient = self.top_foods(&foods, &needed_nutrients);
        let recommended_foods = foods
            .iter()
            .filter(|food| {
                top_foods_by_nutrient
                    .values()
                    .any(|list| list.iter().any(|s| s.food_id == food.id))
            })
            .map(|food| FoodSuggestion::from(*food))
            .collect();

        let recommended_recipes = if requirement.is_some() && !needed_nutrients.is_empty() {
            self.recommend_recipes(age_months, &adequacy, &needed_nutrients)
        } else {
            Vec::new()
        };

        NutritionSummary {
            has_data: true,
            window_start: Some(window.start),
            window_end: Some(window.end),
            age_months: Some(age_months),
            requirement,
            daily_average,
            adequacy,
            needed_nutrients,
            top_foods_by_nutrient,
            recommended_foods,
            recommended_recipes,
            message: None,
        }
    }

    /// Catalog foods offered at this age
    fn candidate_foods(&self, group: AgeGroup, age_months: u32) -> Vec<&Food> {
        let mut foods: Vec<&Food> = self.reference().foods_for_group(group).collect();
        if group == AgeGroup::Infant {
            foods.retain(|f| f.is_milk_group());
        }
        if age_months <= 6 {
            foods.retain(|f| is_breastmilk_like(f));
        }
        foods
    }

    fn top_foods(&self, foods: &[&Food], needed: &[Nutrient]) -> IndexMap<Nutrient, Vec<FoodSuggestion>> {
        needed
            .iter()
            .map(|&nutrient| {
                let mut ranked = foods.to_vec();
                ranked.sort_by(|a, b| b.per_serving.get(nutrient).total_cmp(&a.per_serving.get(nutrient)));
                let top = ranked
                    .into_iter()
                    .take(self.config().foods_per_nutrient)
                    .map(FoodSuggestion::from)
                    .collect();
                (nutrient, top)
            })
            .collect()
    }
}

fn rate_intake(
    daily_average: &NutrientTotals,
    requirement: Option<&NutritionRequirement>,
    age_months: u32,
) -> IndexMap<Nutrient, NutrientAdequacy> {
    daily_average
        .iter()
        .map(|(nutrient, avg)| {
            let Some(band) = requirement else {
                return (nutrient, NutrientAdequacy::unrated(avg));
            };
            let req = band.targets.get(nutrient);
            let pct = if req > 0.0 { avg / req * 100.0 } else { 0.0 };
            let mut adequacy = classify_intake(pct, req);
            // milk-fed infants read high on iron without real excess
            if nutrient == Nutrient::Iron && adequacy == Adequacy::Excess && age_months < 6 {
                adequacy = Adequacy::Adequate;
            }
            let rated = NutrientAdequacy {
                daily_average: avg,
                requirement: req,
                percent_of_requirement: pct,
                gap: req - avg,
                adequacy,
            };
            (nutrient, rated)
        })
        .collect()
}

fn rank_deficits(adequacy: &IndexMap<Nutrient, NutrientAdequacy>) -> Vec<Nutrient> {
    let mut deficits: Vec<(Nutrient, f64)> = adequacy
        .iter()
        .filter(|(_, a)| a.adequacy == Adequacy::Deficit)
        .map(|(n, a)| (*n, a.severity()))
        .filter(|(_, severity)| *severity > 0.0)
        .collect();
    deficits.sort_by(|a, b| b.1.total_cmp(&a.1));
    deficits.into_iter().map(|(n, _)| n).collect()
}
