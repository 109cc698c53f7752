//! Profile summary fusing every analytic into one view

use crate::age::AgeDisplay;
use crate::analytics::growth::{classify_height_for_age, classify_weight_for_age, trend_direction};
use crate::analytics::risk::RiskInputs;
use crate::context::{EvaluationContext, SubjectRecords};
use crate::engine::HealthEngine;
use crate::report::{IllnessFlag, illness_flags, nutrition_flag_label, vaccination_status_label};
use chrono::{NaiveDate, NaiveDateTime};
use child_health_types::{
    AgeGroup, HeightForAgeClass, Nutrient, PredictionSnapshot, RiskResult, Sex, TrendDirection,
    WeightForAgeClass,
};
use indexmap::IndexMap;
use serde::Serialize;

/// Where the summary's z-scores came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthSource {
    Prediction,
    Measurement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthSummary {
    pub source: Option<GrowthSource>,
    pub weight_zscore: Option<f64>,
    pub height_zscore: Option<f64>,
    pub weight_for_age: Option<WeightForAgeClass>,
    pub height_for_age: Option<HeightForAgeClass>,
    /// kg per 30 days
    pub avg_weight_gain: Option<f64>,
    pub trend: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaccinationOverview {
    /// Stored prediction label when available, otherwise the schedule standing
    pub status: String,
    pub next_due_name: Option<String>,
    pub next_due_recommended_age: Option<String>,
    pub next_due_date: Option<NaiveDate>,
    pub missed_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneOverview {
    pub age_appropriate: bool,
    pub delays: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    pub last_vaccination: Option<NaiveDate>,
    pub last_illness: Option<NaiveDate>,
    pub last_prediction: Option<NaiveDateTime>,
}

/// Everything shown on a subject's profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub subject_id: Option<String>,
    pub sex: Sex,
    pub as_of: NaiveDate,
    pub age: AgeDisplay,
    pub age_group: AgeGroup,
    pub risk: RiskResult,
    pub growth: GrowthSummary,
    pub major_deficiency: Option<Nutrient>,
    pub vaccination: VaccinationOverview,
    pub milestones: MilestoneOverview,
    pub ai_percentile: Option<f64>,
    pub nutrition_status: Option<&'static str>,
    pub illness_flags: IndexMap<&'static str, IllnessFlag>,
    pub timeline: Timeline,
}

impl HealthEngine<'_> {
    /// z-scores from the stored prediction, or else from the latest measurement
    pub fn growth_summary(
        &self,
        ctx: &EvaluationContext,
        records: &SubjectRecords,
        last: Option<&PredictionSnapshot>,
    ) -> GrowthSummary {
        let scores = match (last, records.latest_measurement(ctx.as_of)) {
            (Some(snapshot), _) => Some((
                GrowthSource::Prediction,
                snapshot.features.weight_zscore,
                snapshot.features.height_zscore,
            )),
            (None, Some(m)) => {
                let a = self.assess_growth(ctx, m);
                Some((GrowthSource::Measurement, a.weight_zscore, a.height_zscore))
            }
            (None, None) => None,
        };
        let avg_gain = match last {
            Some(snapshot) => Some(snapshot.features.avg_weight_gain),
            None => self.weight_trend(&records.measurements, ctx.as_of).avg_gain,
        };
        GrowthSummary {
            source: scores.map(|(s, _, _)| s),
            weight_zscore: scores.map(|(_, w, _)| w),
            height_zscore: scores.map(|(_, _, h)| h),
            weight_for_age: scores.map(|(_, w, _)| classify_weight_for_age(w)),
            height_for_age: scores.map(|(_, _, h)| classify_height_for_age(h)),
            avg_weight_gain: avg_gain,
            trend: trend_direction(avg_gain),
        }
    }

    /// Fuse growth, nutrition, vaccination and the last prediction into a profile
    pub fn profile_summary(
        &self,
        ctx: &EvaluationContext,
        records: &SubjectRecords,
        last: Option<&PredictionSnapshot>,
    ) -> ProfileSummary {
        let group = ctx.age_group();
        let growth = self.growth_summary(ctx, records, last);

        let nutrition = self.weekly_summary(ctx, &records.meal_logs, None);
        let major_deficiency = nutrition.major_deficiency();

        let vaccination = self.vaccination_summary(ctx, &records.vaccine_records);
        let status = last
            .and_then(|s| vaccination_status_label(s.features.vaccination_status))
            .map_or_else(|| vaccination.status.to_string(), str::to_string);

        let risk = self.classify_risk(&RiskInputs {
            weight_z: growth.weight_zscore.unwrap_or(0.0),
            height_z: growth.height_zscore.unwrap_or(0.0),
            avg_weight_gain: growth.avg_weight_gain,
            missed_vaccine_count: vaccination.missed_count,
            nutrient_deficiency: major_deficiency,
            energy_intake_pct: nutrition.percent_of(Nutrient::Energy),
            next_due_in_days: vaccination.next_due_date.map(|d| ctx.days_until(d)),
        });

        let delays = last.map_or_else(Vec::new, |s| self.milestone_delays(group, &s.outputs));

        ProfileSummary {
            subject_id: ctx.subject.id.clone(),
            sex: ctx.subject.sex,
            as_of: ctx.as_of,
            age: ctx.age().display(),
            age_group: group,
            risk,
            growth,
            major_deficiency,
            vaccination: VaccinationOverview {
                status,
                next_due_name: vaccination.next_due_name,
                next_due_recommended_age: vaccination.next_due_recommended_age,
                next_due_date: vaccination.next_due_date,
                missed_count: vaccination.missed_count,
            },
            milestones: MilestoneOverview {
                age_appropriate: delays.is_empty(),
                delays,
            },
            ai_percentile: last.and_then(|s| s.outputs.growth_percentile),
            nutrition_status: last
                .and_then(|s| s.outputs.nutrition_flag)
                .and_then(nutrition_flag_label),
            illness_flags: last.map_or_else(IndexMap::new, |s| illness_flags(&s.outputs)),
            timeline: Timeline {
                last_vaccination: records
                    .vaccine_records
                    .iter()
                    .filter(|r| r.is_completed())
                    .filter_map(|r| r.actual_date)
                    .max(),
                last_illness: records.illness_logs.iter().map(|l| l.log_date).max(),
                last_prediction: last.map(|s| s.created_at),
            },
        }
    }
}
