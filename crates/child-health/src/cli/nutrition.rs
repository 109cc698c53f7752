//! Nutrition command implementation

use super::input::ProfileInput;
use super::output::{self, rows_table};
use super::session::Session;
use anyhow::Result;
use chrono::NaiveDate;
use child_health_engine::NutritionSummary;
use std::path::PathBuf;
use tabled::Tabled;

/// Configuration for nutrition command
pub struct NutritionConfig {
    pub profile: PathBuf,
    /// First day of the window; defaults to the week ending at the latest log
    pub start: Option<NaiveDate>,
}

#[derive(Tabled)]
struct AdequacyRow {
    #[tabled(rename = "Nutrient")]
    nutrient: String,
    #[tabled(rename = "Daily avg")]
    daily_average: String,
    #[tabled(rename = "Requirement")]
    requirement: String,
    #[tabled(rename = "%")]
    percent: String,
    #[tabled(rename = "Status")]
    adequacy: String,
}

#[derive(Tabled)]
struct RecipeRow {
    #[tabled(rename = "Recipe")]
    name: String,
    #[tabled(rename = "For")]
    primary: String,
    #[tabled(rename = "Score")]
    score: String,
}

pub fn nutrition_summary(session: &Session, profile: &ProfileInput, start: Option<NaiveDate>) -> NutritionSummary {
    let ctx = profile.context(session.as_of);
    session
        .engine()
        .weekly_summary(&ctx, &profile.records.meal_logs, start)
}

pub fn nutrition(session: &Session, config: NutritionConfig) -> Result<()> {
    let profile = ProfileInput::from_file(&config.profile)?;
    let summary = nutrition_summary(session, &profile, config.start);
    output::print_report(&summary, session.format, session.output_path(), render_table)
}

/// Adequacy table followed by the recommendations
pub fn render_table(summary: &NutritionSummary) -> String {
    if !summary.has_data {
        return summary.message.clone().unwrap_or_default();
    }
    let mut out = String::new();
    if let (Some(start), Some(end)) = (summary.window_start, summary.window_end) {
        out.push_str(&format!("Window: {start} to {end}\n"));
    }
    out.push_str(&rows_table(summary.adequacy.iter().map(|(nutrient, a)| AdequacyRow {
        nutrient: nutrient.label().to_string(),
        daily_average: format!("{:.1}", a.daily_average),
        requirement: format!("{:.1}", a.requirement),
        percent: format!("{:.0}", a.percent_of_requirement),
        adequacy: a.adequacy.to_string(),
    })));

    if summary.needed_nutrients.is_empty() {
        out.push_str("\nNo nutrient deficits this week.");
        return out;
    }
    let needed: Vec<&str> = summary.needed_nutrients.iter().map(|n| n.label()).collect();
    out.push_str(&format!("\nNeeded: {}", needed.join(", ")));
    let foods: Vec<&str> = summary.recommended_foods.iter().map(|f| f.name.as_str()).collect();
    if !foods.is_empty() {
        out.push_str(&format!("\nFoods: {}", foods.join(", ")));
    }
    if !summary.recommended_recipes.is_empty() {
        out.push('\n');
        out.push_str(&rows_table(summary.recommended_recipes.iter().map(|r| RecipeRow {
            name: r.recipe.name.clone(),
            primary: r.recipe.primary_nutrient.label().to_string(),
            score: format!("{:.1}", r.score),
        })));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::session::SessionConfig;

    #[test]
    fn test_no_meal_logs_renders_message() {
        let session = Session::load(SessionConfig::default()).unwrap();
        let profile =
            ProfileInput::from_json(r#"{"subject": {"sex": "female", "date_of_birth": "2023-01-01"}}"#).unwrap();
        let summary = nutrition_summary(&session, &profile, None);
        assert!(!summary.has_data);
        insta::assert_snapshot!(render_table(&summary), @"No meal logs found for this child.");
    }
}
