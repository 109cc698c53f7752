//! Recipe recommendation
//!
//! Candidates come from the recipes whose age band contains the subject's age.
//! A recipe is dropped if it targets a nutrient that is not needed, touches a
//! nutrient already in excess, or fails the texture and ingredient rules for the
//! age. Survivors are scored and the best few returned.

use crate::analytics::nutrition::{MILK_KEYWORDS, NutrientAdequacy, deficit_severity};
use crate::engine::HealthEngine;
use child_health_types::{Adequacy, EnergyDensity, MealType, Nutrient, Recipe, Texture};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// Ingredients never offered below 12 months
pub const BANNED_INFANT_INGREDIENTS: [&str; 12] = [
    "honey",
    "whole nut",
    "whole nuts",
    "peanut",
    "groundnut",
    "almond",
    "cashew",
    "pista",
    "walnut",
    "fried",
    "deep fry",
    "deep-fried",
];

const MEAL_TYPE_BONUS: f64 = 5.0;

/// Meal types that suit a recipe built around `nutrient`
pub fn preferred_meal_types(nutrient: Nutrient) -> &'static [MealType] {
    match nutrient {
        Nutrient::Energy | Nutrient::Fat => &[MealType::Lunch, MealType::Dinner],
        Nutrient::Protein | Nutrient::VitaminA => &[MealType::Lunch],
        Nutrient::Calcium => &[MealType::Breakfast, MealType::Snack],
        Nutrient::VitaminC => &[MealType::Snack],
        Nutrient::Carbohydrate | Nutrient::Iron => &[],
    }
}

/// Texture and ingredient rules by age in months
pub fn is_recipe_safe(recipe: &Recipe, age_months: u32) -> bool {
    let text = recipe.searchable_text();
    let texture = recipe.texture;
    let liquid_or_soft = matches!(texture, Some(Texture::Liquid | Texture::Soft));
    let banned = || BANNED_INFANT_INGREDIENTS.iter().any(|w| text.contains(w));

    if age_months <= 6 {
        liquid_or_soft && MILK_KEYWORDS.iter().any(|k| text.contains(k)) && !banned()
    } else if age_months < 12 {
        liquid_or_soft && !banned()
    } else if age_months < 36 {
        matches!(texture, Some(Texture::Soft | Texture::SemiSolid))
    } else {
        true
    }
}

/// A recommended recipe with its ranking score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedRecipe {
    pub score: f64,
    #[serde(flatten)]
    pub recipe: Recipe,
}

impl HealthEngine<'_> {
    /// Score and select recipes for the needed nutrients
    pub fn recommend_recipes(
        &self,
        age_months: u32,
        adequacy: &IndexMap<Nutrient, NutrientAdequacy>,
        needed: &[Nutrient],
    ) -> Vec<RecommendedRecipe> {
        let config = self.config();
        let adequacy_of = |n: Nutrient| adequacy.get(&n).map_or(Adequacy::NotApplicable, |a| a.adequacy);
        let severity_of = |n: Nutrient| {
            adequacy
                .get(&n)
                .map_or(0.0, |a| deficit_severity(a.percent_of_requirement))
        };
        let energy_pct = adequacy
            .get(&Nutrient::Energy)
            .map_or(0.0, |a| a.percent_of_requirement);
        let energy_severe = energy_pct < config.severe_energy_pct;

        let mut candidates: Vec<RecommendedRecipe> = self
            .reference()
            .recipes_for_age(age_months)
            .filter(|r| needed.contains(&r.primary_nutrient))
            .filter(|r| r.nutrients().all(|n| adequacy_of(n) != Adequacy::Excess))
            .filter(|r| is_recipe_safe(r, age_months))
            .filter_map(|r| {
                let severity = severity_of(r.primary_nutrient);
                if severity <= 0.0 {
                    return None;
                }
                let mut score = severity * 10.0;
                score += r.secondary_nutrients.iter().filter(|n| needed.contains(n)).count() as f64;
                if r
                    .meal_type
                    .is_some_and(|m| preferred_meal_types(r.primary_nutrient).contains(&m))
                {
                    score += MEAL_TYPE_BONUS;
                }
                if energy_severe && r.primary_nutrient == Nutrient::Energy {
                    score += if r.energy_density == Some(EnergyDensity::High) { 10.0 } else { 5.0 };
                }
                Some(RecommendedRecipe {
                    score,
                    recipe: r.clone(),
                })
            })
            .collect();
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        let cap = if age_months <= 6 {
            config.infant_recipe_cap
        } else {
            config.recipe_cap
        };
        let mut selected: Vec<RecommendedRecipe> = Vec::with_capacity(cap);
        let mut seen: HashSet<&str> = HashSet::new();

        if energy_severe {
            if let Some(first) = candidates
                .iter()
                .find(|c| c.recipe.primary_nutrient == Nutrient::Energy)
            {
                log::debug!("severe energy deficit, leading with {}", first.recipe.code);
                seen.insert(&first.recipe.code);
                selected.push(first.clone());
            }
        }
        for candidate in &candidates {
            if selected.len() >= cap {
                break;
            }
            if seen.insert(&candidate.recipe.code) {
                selected.push(candidate.clone());
            }
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use child_health_reference::ReferenceData;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use smallvec::SmallVec;

    fn recipe(name: &str, texture: Option<Texture>, ingredients: &str) -> Recipe {
        Recipe {
            code: "R-1".into(),
            name: name.into(),
            age_min_months: 0,
            age_max_months: 120,
            primary_nutrient: Nutrient::Energy,
            secondary_nutrients: SmallVec::new(),
            energy_density: None,
            meal_type: None,
            texture,
            ingredients: ingredients.into(),
            instructions: String::new(),
            prep_time_mins: None,
            is_veg: Some(true),
            video_url: None,
        }
    }

    #[rstest]
    #[case(recipe("Formula feed", Some(Texture::Liquid), "Infant formula, water"), 4, true)]
    #[case(recipe("Rice water", Some(Texture::Liquid), "Rice, water"), 4, false)]
    #[case(recipe("Honey milk", Some(Texture::Liquid), "Breast milk, honey"), 4, false)]
    #[case(recipe("Formula pudding", Some(Texture::SemiSolid), "Baby formula"), 4, false)]
    #[case(recipe("Rice water", Some(Texture::Liquid), "Rice, water"), 8, true)]
    #[case(recipe("Peanut sooji crumble", Some(Texture::Soft), "Sooji, ghee"), 8, false)]
    #[case(recipe("Dal khichdi", None, "Rice, dal"), 8, false)]
    #[case(recipe("Dal khichdi", Some(Texture::SemiSolid), "Rice, dal"), 20, true)]
    #[case(recipe("Pumpkin soup", Some(Texture::Liquid), "Pumpkin"), 20, false)]
    #[case(recipe("Banana fritters", Some(Texture::Solid), "Banana, fried in oil"), 40, true)]
    fn test_safety_rules(#[case] r: Recipe, #[case] age: u32, #[case] safe: bool) {
        assert_eq!(is_recipe_safe(&r, age), safe);
    }

    #[test]
    fn test_meal_preferences() {
        assert!(preferred_meal_types(Nutrient::Calcium).contains(&MealType::Snack));
        assert!(preferred_meal_types(Nutrient::Iron).is_empty());
    }

    // ========================================================================
    // Scoring and selection
    // ========================================================================

    fn catalog_recipe(code: &str, primary: Nutrient, secondary: &[Nutrient]) -> Recipe {
        Recipe {
            code: code.into(),
            name: format!("{code} porridge"),
            primary_nutrient: primary,
            secondary_nutrients: secondary.iter().copied().collect(),
            ..recipe("", Some(Texture::Soft), "Breast milk, ragi")
        }
    }

    fn with_meal(mut recipe: Recipe, meal_type: MealType) -> Recipe {
        recipe.meal_type = Some(meal_type);
        recipe
    }

    fn with_density(mut recipe: Recipe, density: EnergyDensity) -> Recipe {
        recipe.energy_density = Some(density);
        recipe
    }

    /// Every nutrient at 100% except the given percentages
    fn adequacy(percents: &[(Nutrient, f64)]) -> IndexMap<Nutrient, NutrientAdequacy> {
        Nutrient::ALL
            .iter()
            .map(|&n| {
                let pct = percents.iter().find(|(p, _)| *p == n).map_or(100.0, |(_, v)| *v);
                let rated = NutrientAdequacy {
                    daily_average: pct,
                    requirement: 100.0,
                    percent_of_requirement: pct,
                    gap: 100.0 - pct,
                    adequacy: crate::analytics::nutrition::classify_intake(pct, 100.0),
                };
                (n, rated)
            })
            .collect()
    }

    fn picks(selected: &[RecommendedRecipe]) -> Vec<(&str, f64)> {
        selected.iter().map(|r| (r.recipe.code.as_str(), r.score)).collect()
    }

    #[test]
    fn test_score_components() {
        let data = ReferenceData::empty().with_recipes(vec![
            // severity 50 × 10 + one needed secondary
            with_meal(catalog_recipe("IRON-1", Nutrient::Iron, &[Nutrient::Calcium]), MealType::Lunch),
            // vitamin C is in excess
            catalog_recipe("IRON-2", Nutrient::Iron, &[Nutrient::VitaminC]),
            // 30 × 10 + two secondaries + snack bonus
            with_meal(
                catalog_recipe("CAL-1", Nutrient::Calcium, &[Nutrient::Iron, Nutrient::Energy]),
                MealType::Snack,
            ),
            // 20 × 10 + dinner bonus; energy is short but not severely
            with_density(
                with_meal(catalog_recipe("EN-1", Nutrient::Energy, &[]), MealType::Dinner),
                EnergyDensity::High,
            ),
            catalog_recipe("FAT-1", Nutrient::Fat, &[]),
            Recipe {
                texture: Some(Texture::Liquid),
                ..catalog_recipe("EN-2", Nutrient::Energy, &[])
            },
        ]);
        let engine = HealthEngine::new(&data);
        let rated = adequacy(&[
            (Nutrient::Energy, 80.0),
            (Nutrient::Iron, 50.0),
            (Nutrient::Calcium, 70.0),
            (Nutrient::VitaminC, 150.0),
        ]);
        let needed = [Nutrient::Iron, Nutrient::Calcium, Nutrient::Energy];

        let selected = engine.recommend_recipes(20, &rated, &needed);
        assert_eq!(picks(&selected), vec![("IRON-1", 501.0), ("CAL-1", 307.0), ("EN-1", 205.0)]);
    }

    fn severe_energy_catalog() -> ReferenceData {
        ReferenceData::empty().with_recipes(vec![
            catalog_recipe("IRON-1", Nutrient::Iron, &[]),
            catalog_recipe("CAL-1", Nutrient::Calcium, &[]),
            with_meal(catalog_recipe("PRO-1", Nutrient::Protein, &[]), MealType::Lunch),
            with_density(
                with_meal(catalog_recipe("EN-LOW", Nutrient::Energy, &[]), MealType::Breakfast),
                EnergyDensity::Low,
            ),
            with_density(
                with_meal(catalog_recipe("EN-HIGH", Nutrient::Energy, &[]), MealType::Lunch),
                EnergyDensity::High,
            ),
            catalog_recipe("IRON-2", Nutrient::Iron, &[Nutrient::Calcium]),
            // same code listed twice in the catalog
            catalog_recipe("IRON-2", Nutrient::Iron, &[Nutrient::Calcium]),
        ])
    }

    fn severe_energy_week() -> IndexMap<Nutrient, NutrientAdequacy> {
        adequacy(&[
            (Nutrient::Energy, 40.0),
            (Nutrient::Iron, 10.0),
            (Nutrient::Calcium, 30.0),
            (Nutrient::Protein, 50.0),
        ])
    }

    const SEVERE_NEEDED: [Nutrient; 4] = [Nutrient::Iron, Nutrient::Calcium, Nutrient::Energy, Nutrient::Protein];

    #[test]
    fn test_severe_energy_leads_with_best_energy_recipe() {
        let data = severe_energy_catalog();
        let engine = HealthEngine::new(&data);
        let selected = engine.recommend_recipes(20, &severe_energy_week(), &SEVERE_NEEDED);
        // 60 × 10 + lunch bonus + high density bonus, ahead of higher scores
        assert_eq!(
            picks(&selected),
            vec![("EN-HIGH", 615.0), ("IRON-2", 901.0), ("IRON-1", 900.0), ("CAL-1", 700.0)]
        );
    }

    #[rstest]
    #[case(4, 2)]
    #[case(6, 2)]
    #[case(7, 4)]
    #[case(20, 4)]
    #[case(49, 4)]
    fn test_recipe_cap_by_age(#[case] age_months: u32, #[case] cap: usize) {
        let data = severe_energy_catalog();
        let engine = HealthEngine::new(&data);
        let selected = engine.recommend_recipes(age_months, &severe_energy_week(), &SEVERE_NEEDED);
        assert_eq!(selected.len(), cap);
        assert_eq!(selected[0].recipe.code, "EN-HIGH");
        let mut codes: Vec<&str> = selected.iter().map(|r| r.recipe.code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), cap);
    }

    #[test]
    fn test_unneeded_primary_is_never_offered() {
        let data = severe_energy_catalog();
        let engine = HealthEngine::new(&data);
        let selected = engine.recommend_recipes(20, &severe_energy_week(), &[Nutrient::Protein]);
        assert_eq!(picks(&selected), vec![("PRO-1", 505.0)]);
    }
}
