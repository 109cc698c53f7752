//! The immutable reference data object
//!
//! Constructed once and shared by reference with every engine call. Nothing in
//! here mutates after construction, so concurrent readers need no locking.

use crate::growth::GrowthReference;
use child_health_types::{
    AgeGroup, Food, MilestoneDefinition, NutritionRequirement, Recipe, VaccineScheduleEntry,
};
use serde::Serialize;

/// All reference tables and catalogs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub(crate) growth: GrowthReference,
    pub(crate) requirements: Vec<NutritionRequirement>,
    pub(crate) foods: Vec<Food>,
    pub(crate) recipes: Vec<Recipe>,
    pub(crate) vaccines: Vec<VaccineScheduleEntry>,
    pub(crate) milestones: Vec<MilestoneDefinition>,
}

/// Record counts per document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReferenceCounts {
    pub lms_rows: usize,
    pub requirement_bands: usize,
    pub foods: usize,
    pub recipes: usize,
    pub vaccines: usize,
    pub milestones: usize,
}

impl ReferenceData {
    /// Reference data with no tables; useful as a base for custom fixtures
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_growth(mut self, growth: GrowthReference) -> Self {
        self.growth = growth;
        self
    }

    pub fn with_requirements(mut self, requirements: Vec<NutritionRequirement>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_foods(mut self, foods: Vec<Food>) -> Self {
        self.foods = foods;
        self
    }

    pub fn with_recipes(mut self, recipes: Vec<Recipe>) -> Self {
        self.recipes = recipes;
        self
    }

    pub fn with_vaccines(mut self, vaccines: Vec<VaccineScheduleEntry>) -> Self {
        self.vaccines = vaccines;
        self
    }

    pub fn with_milestones(mut self, milestones: Vec<MilestoneDefinition>) -> Self {
        self.milestones = milestones;
        self
    }

    pub fn growth(&self) -> &GrowthReference {
        &self.growth
    }

    pub fn requirements(&self) -> &[NutritionRequirement] {
        &self.requirements
    }

    /// Band containing `age_months`; the largest minimum bound wins on overlap
    pub fn requirement_for(&self, age_months: u32) -> Option<&NutritionRequirement> {
        self.requirements
            .iter()
            .filter(|band| band.contains(age_months))
            .max_by_key(|band| band.age_min_months)
    }

    pub fn foods(&self) -> &[Food] {
        &self.foods
    }

    pub fn food(&self, id: u32) -> Option<&Food> {
        self.foods.iter().find(|f| f.id == id)
    }

    /// Foods offered to an age group, including those offered to all groups
    pub fn foods_for_group(&self, group: AgeGroup) -> impl Iterator<Item = &Food> {
        self.foods.iter().filter(move |f| f.age_group.serves(group))
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Recipes whose age band contains `age_months`
    pub fn recipes_for_age(&self, age_months: u32) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter().filter(move |r| r.suits_age(age_months))
    }

    pub fn vaccines(&self) -> &[VaccineScheduleEntry] {
        &self.vaccines
    }

    pub fn vaccine(&self, id: u32) -> Option<&VaccineScheduleEntry> {
        self.vaccines.iter().find(|v| v.id == id)
    }

    /// Schedule entries of an age group in catalog order
    pub fn schedules_for_group(&self, group: AgeGroup) -> impl Iterator<Item = &VaccineScheduleEntry> {
        self.vaccines.iter().filter(move |v| v.age_group == group)
    }

    pub fn milestones(&self) -> &[MilestoneDefinition] {
        &self.milestones
    }

    pub fn milestones_for_group(&self, group: AgeGroup) -> impl Iterator<Item = &MilestoneDefinition> {
        self.milestones.iter().filter(move |m| m.age_group == group)
    }

    pub fn counts(&self) -> ReferenceCounts {
        ReferenceCounts {
            lms_rows: self.growth.tables().map(|(_, _, t)| t.len()).sum(),
            requirement_bands: self.requirements.len(),
            foods: self.foods.len(),
            recipes: self.recipes.len(),
            vaccines: self.vaccines.len(),
            milestones: self.milestones.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use child_health_types::{Nutrient, NutrientTotals};
    use rstest::rstest;

    fn band(min: u32, max: u32, energy: f64) -> NutritionRequirement {
        NutritionRequirement {
            age_min_months: min,
            age_max_months: max,
            targets: NutrientTotals::ZERO.with(Nutrient::Energy, energy),
        }
    }

    #[rstest]
    #[case(0, Some(550.0))]
    #[case(5, Some(550.0))]
    #[case(6, Some(700.0))]
    #[case(12, Some(900.0))]
    #[case(18, Some(950.0))]
    #[case(40, None)]
    fn test_requirement_selection(#[case] age: u32, #[case] energy: Option<f64>) {
        let data = ReferenceData::empty().with_requirements(vec![
            band(0, 5, 550.0),
            band(6, 11, 700.0),
            band(12, 23, 900.0),
            band(18, 30, 950.0),
        ]);
        assert_eq!(
            data.requirement_for(age).map(|b| b.targets.get(Nutrient::Energy)),
            energy
        );
    }
}
