//! Serialized shapes of the reference documents
//!
//! Catalogs are published grouped (recipes by age band, vaccines by age group);
//! these shapes are flattened into the domain records on load.

use child_health_types::{
    AgeGroup, EnergyDensity, MealType, Nutrient, Recipe, Texture, VaccineCategory,
    VaccineScheduleEntry,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// The six documents making up the reference data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceDocument {
    Growth,
    Requirements,
    Foods,
    Recipes,
    Vaccines,
    Milestones,
}

impl ReferenceDocument {
    pub const ALL: [ReferenceDocument; 6] = [
        ReferenceDocument::Growth,
        ReferenceDocument::Requirements,
        ReferenceDocument::Foods,
        ReferenceDocument::Recipes,
        ReferenceDocument::Vaccines,
        ReferenceDocument::Milestones,
    ];

    /// File name inside a reference directory
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Growth => "growth_lms.json",
            Self::Requirements => "nutrition_requirements.json",
            Self::Foods => "foods.json",
            Self::Recipes => "recipes.json",
            Self::Vaccines => "vaccination_schedule.json",
            Self::Milestones => "milestones.json",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|doc| doc.file_name() == name)
    }
}

impl fmt::Display for ReferenceDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// `recipes.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeCatalogDocument {
    #[serde(default)]
    pub groups: Vec<RecipeGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeGroup {
    pub age_min_months: u32,
    pub age_max_months: u32,
    #[serde(default)]
    pub recipes: Vec<RecipeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub recipe_id: String,
    pub recipe_name: String,
    #[serde(default)]
    pub veg_nonveg: Option<String>,
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
    /// Bare video id or full URL
    #[serde(default)]
    pub youtube_video_id: Option<String>,
}

/// Expand a bare video id into a watch URL; full URLs pass through
pub fn video_url(id: Option<&str>) -> Option<String> {
    let id = id.map(str::trim).filter(|s| !s.is_empty())?;
    if id.starts_with("http://") || id.starts_with("https://") {
        Some(id.to_string())
    } else {
        Some(format!("https://www.youtube.com/watch?v={}", id))
    }
}

impl RecipeCatalogDocument {
    /// Flatten into recipes carrying their group's age band
    pub fn into_recipes(self) -> Vec<Recipe> {
        self.groups
            .into_iter()
            .flat_map(|group| {
                let (min, max) = (group.age_min_months, group.age_max_months);
                group.recipes.into_iter().map(move |entry| Recipe {
                    code: entry.recipe_id.trim().to_string(),
                    name: entry.recipe_name,
                    age_min_months: min,
                    age_max_months: max,
                    primary_nutrient: entry.primary_nutrient,
                    secondary_nutrients: entry.secondary_nutrients,
                    energy_density: entry.energy_density,
                    meal_type: entry.meal_type,
                    texture: entry.texture,
                    ingredients: entry.ingredients,
                    instructions: entry.instructions,
                    prep_time_mins: entry.prep_time_mins,
                    is_veg: entry
                        .veg_nonveg
                        .as_deref()
                        .map(|v| !v.trim().eq_ignore_ascii_case("nonveg")),
                    video_url: video_url(entry.youtube_video_id.as_deref()),
                })
            })
            .collect()
    }
}

/// `vaccination_schedule.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaccineScheduleDocument {
    #[serde(default)]
    pub groups: Vec<VaccineGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccineGroup {
    pub age_group: AgeGroup,
    #[serde(default)]
    pub vaccines: Vec<VaccineEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccineEntry {
    pub id: u32,
    pub vaccine_name: String,
    #[serde(default)]
    pub disease_prevented: String,
    pub recommended_age: String,
    pub doses_required: u32,
    pub category: VaccineCategory,
}

impl VaccineScheduleDocument {
    pub fn into_entries(self) -> Vec<VaccineScheduleEntry> {
        self.groups
            .into_iter()
            .flat_map(|group| {
                let age_group = group.age_group;
                group.vaccines.into_iter().map(move |v| VaccineScheduleEntry {
                    id: v.id,
                    vaccine_name: v.vaccine_name.trim().to_string(),
                    disease_prevented: v.disease_prevented,
                    recommended_age: v.recommended_age.trim().to_string(),
                    doses_required: v.doses_required,
                    category: v.category,
                    age_group,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("abc123"), Some("https://www.youtube.com/watch?v=abc123"))]
    #[case(Some("https://youtu.be/xyz"), Some("https://youtu.be/xyz"))]
    #[case(Some("   "), None)]
    #[case(None, None)]
    fn test_video_url(#[case] id: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(video_url(id).as_deref(), expected);
    }

    #[test]
    fn test_recipes_inherit_group_band() {
        let doc: RecipeCatalogDocument = serde_json::from_str(
            r#"{"groups": [{"age_min_months": 7, "age_max_months": 11, "recipes": [
                {"recipe_id": " R7-01 ", "recipe_name": "Ragi porridge", "veg_nonveg": "veg",
                 "primary_nutrient": "calcium_mg", "texture": "soft"}]}]}"#,
        )
        .unwrap();
        let recipes = doc.into_recipes();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].code, "R7-01");
        assert_eq!((recipes[0].age_min_months, recipes[0].age_max_months), (7, 11));
        assert_eq!(recipes[0].is_veg, Some(true));
    }

    #[test]
    fn test_file_names_round_trip() {
        for doc in ReferenceDocument::ALL {
            assert_eq!(ReferenceDocument::from_file_name(doc.file_name()), Some(doc));
        }
        assert_eq!(ReferenceDocument::from_file_name("other.json"), None);
    }
}
