//! Prediction feature extraction
//!
//! Builds the typed [`FeatureVector`] consumed by the external predictors from a
//! subject's records, together with the list of inputs whose absence blocks a
//! prediction.

use crate::age::AgeSpan;
use crate::analytics::growth::{MUAC_FALLBACK_CM, bmi, estimate_muac, round_to};
use crate::context::{EvaluationContext, SubjectRecords};
use crate::engine::HealthEngine;
use child_health_types::{
    AgeGroup, FeatureVector, FoodRef, GroupFeatures, GrowthMetric, IllnessLog, MealItem, MealLog,
    MilestoneCode, MilestoneDefinition, normalize_identifier,
};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Input that must be present before a prediction is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredInput {
    HeightCm,
    WeightKg,
    RecentMealLogs,
    RecentIllnessLogs,
    VaccinationRecords,
    MilestoneRecords,
    SleepHours,
}

impl RequiredInput {
    pub const fn key(&self) -> &'static str {
        match self {
            Self::HeightCm => "anthropometry.height_cm",
            Self::WeightKg => "anthropometry.weight_kg",
            Self::RecentMealLogs => "meal_logs_last_7_days",
            Self::RecentIllnessLogs => "illness_logs_last_90_days",
            Self::VaccinationRecords => "vaccination.core_status",
            Self::MilestoneRecords => "milestones.current_group_status",
            Self::SleepHours => "anthropometry.avg_sleep_hours_per_day",
        }
    }
}

impl fmt::Display for RequiredInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for RequiredInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// Feeding class and frequency over the recent meal logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedingFeatures {
    pub feeding_type: u8,
    pub feeding_frequency: u32,
    pub has_recent_logs: bool,
}

/// Symptom counts over the illness window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IllnessFeatures {
    pub fever: u32,
    pub cold: u32,
    pub diarrhea: u32,
    /// Logs per 30 days
    pub freq_trend: f64,
    pub has_recent_logs: bool,
}

/// A feature vector and the inputs still missing for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureBuild {
    pub features: FeatureVector,
    pub required_missing: Vec<RequiredInput>,
}

impl FeatureBuild {
    /// Nothing blocks a prediction
    pub fn is_ready(&self) -> bool {
        self.required_missing.is_empty()
    }
}

/// Item counts per feeding bucket, weighted by frequency
#[derive(Debug, Default)]
struct FeedingCounts {
    breastmilk: u32,
    formula: u32,
    milk: u32,
    family: u32,
    mixed: u32,
}

impl FeedingCounts {
    fn infant_type(&self) -> u8 {
        let (b, f, m) = (self.breastmilk, self.formula, self.mixed);
        if b > f.max(m) {
            0
        } else if f > b.max(m) {
            1
        } else {
            2
        }
    }

    fn toddler_type(&self) -> u8 {
        let (fam, milk) = (self.family, self.milk);
        if fam > 0 && milk > 0 {
            let ratio = f64::from(milk) / f64::from(fam + milk);
            if ratio > 0.3 && ratio < 0.7 {
                1
            } else if ratio >= 0.7 {
                2
            } else {
                0
            }
        } else if fam >= milk {
            0
        } else {
            2
        }
    }
}

/// Catalog code an entry maps to among `expected`.
///
/// The stable code wins; then an exact match of the normalized name, a
/// sub-feature or the code; then every keyword of a code appearing in the name.
pub fn match_milestone(definition: &MilestoneDefinition, expected: &[MilestoneCode]) -> Option<MilestoneCode> {
    let code = definition.code.as_deref().unwrap_or("").trim();
    if let Ok(parsed) = code.parse::<MilestoneCode>() {
        if expected.contains(&parsed) {
            return Some(parsed);
        }
    }

    let name = normalize_identifier(&definition.name);
    let code = code.to_lowercase();
    let subs: HashSet<String> = definition
        .sub_features
        .iter()
        .map(|s| normalize_identifier(s))
        .collect();
    let exact = expected.iter().copied().find(|feat| {
        let feat = feat.as_str();
        feat == name || subs.contains(feat) || feat == code
    });
    if exact.is_some() {
        return exact;
    }

    expected
        .iter()
        .copied()
        .find(|feat| feat.name_keywords().iter().all(|k| name.contains(k)))
}

impl HealthEngine<'_> {
    /// Feeding type and frequency from meal logs of the trailing week
    pub fn feeding_features(&self, ctx: &EvaluationContext, group: AgeGroup, meal_logs: &[MealLog]) -> FeedingFeatures {
        let start = ctx.window_start(self.config().nutrition_window_days);
        let logs: Vec<&MealLog> = meal_logs
            .iter()
            .filter(|log| log.log_date >= start && log.log_date <= ctx.as_of)
            .collect();

        let mut items = 0u32;
        let mut counts = FeedingCounts::default();
        for item in logs.iter().flat_map(|log| &log.items) {
            let freq = item.effective_frequency();
            items += freq;
            self.count_item(group, item, freq, &mut counts);
        }

        let feeding_frequency = if logs.is_empty() {
            1
        } else {
            (items / logs.len() as u32).clamp(1, 10)
        };
        let feeding_type = match group {
            AgeGroup::Infant => counts.infant_type(),
            AgeGroup::Toddler => counts.toddler_type(),
            AgeGroup::Preschool | AgeGroup::SchoolAge => 0,
        };
        FeedingFeatures {
            feeding_type,
            feeding_frequency,
            has_recent_logs: !logs.is_empty(),
        }
    }

    fn count_item(&self, group: AgeGroup, item: &MealItem, freq: u32, counts: &mut FeedingCounts) {
        let (name, is_milk_group) = match &item.food {
            FoodRef::Catalog(id) => match self.reference().food(*id) {
                Some(food) => (food.name.to_lowercase(), food.is_milk_group()),
                None => (String::new(), false),
            },
            FoodRef::Custom(name) => (name.to_lowercase(), false),
        };
        match group {
            AgeGroup::Infant => {
                if name.contains("breast") {
                    counts.breastmilk += freq;
                } else if name.contains("formula") || is_milk_group {
                    counts.formula += freq;
                } else {
                    counts.mixed += freq;
                }
            }
            AgeGroup::Toddler if is_milk_group => counts.milk += freq,
            _ => counts.family += freq,
        }
    }

    /// Symptom counts and log frequency over the illness window
    pub fn illness_features(&self, ctx: &EvaluationContext, records: &SubjectRecords) -> IllnessFeatures {
        let window = self.config().illness_window_days;
        let logs: Vec<_> = records
            .illness_logs_between(ctx.window_start(window), ctx.as_of)
            .collect();
        let count = |f: fn(&IllnessLog) -> bool| logs.iter().filter(|l| f(l)).count() as u32;
        let freq_trend = if logs.is_empty() {
            0.0
        } else {
            round_to(logs.len() as f64 / (window as f64 / 30.0).max(1.0), 3)
        };
        IllnessFeatures {
            fever: count(|l| l.fever),
            cold: count(|l| l.cold),
            diarrhea: count(|l| l.diarrhea),
            freq_trend,
            has_recent_logs: !logs.is_empty(),
        }
    }

    /// Presence flags of the group's tracked milestones.
    ///
    /// A milestone counts as present when any status record exists for a
    /// catalog entry matched to it.
    pub fn milestone_flags(&self, group: AgeGroup, records: &SubjectRecords) -> HashSet<MilestoneCode> {
        let expected = MilestoneCode::for_group(group);
        let recorded: HashSet<u32> = records.milestone_records.iter().map(|r| r.milestone_id).collect();
        self.reference()
            .milestones_for_group(group)
            .filter(|m| recorded.contains(&m.id))
            .filter_map(|m| match_milestone(m, expected))
            .collect()
    }

    /// Feature vector for the subject at `ctx.as_of`
    pub fn build_features(&self, ctx: &EvaluationContext, records: &SubjectRecords) -> FeatureBuild {
        let age = ctx.age();
        let group = age.age_group();
        let sex = ctx.subject.sex;
        let age_months = age.months() as f64;

        let mut missing = Vec::new();
        let latest = records.latest_measurement(ctx.as_of);
        let weight_kg = latest.and_then(|m| m.weight_kg);
        let height_cm = latest.and_then(|m| m.height_cm);
        let sleep_hours = latest.and_then(|m| m.sleep_hours);
        if height_cm.is_none() {
            missing.push(RequiredInput::HeightCm);
        }
        if weight_kg.is_none() {
            missing.push(RequiredInput::WeightKg);
        }

        let trend = self.weight_trend(&records.measurements, ctx.as_of);
        let feeding = self.feeding_features(ctx, group, &records.meal_logs);
        let illness = self.illness_features(ctx, records);

        let measured_muac = latest.and_then(|m| m.muac_cm);
        let muac_cm = if (group == AgeGroup::Infant && age.months() < 6) || measured_muac.is_none() {
            estimate_muac(sex, weight_kg, height_cm).map_or(MUAC_FALLBACK_CM, |m| round_to(m, 3))
        } else {
            measured_muac.unwrap_or(MUAC_FALLBACK_CM)
        };

        let flags = self.milestone_flags(group, records);
        let features = FeatureVector {
            is_existing: trend.is_existing(),
            sex: sex.feature_code(),
            weight_kg,
            height_cm,
            muac_cm,
            bmi: bmi(weight_kg, height_cm).map_or(0.0, |b| round_to(b, 3)),
            weight_zscore: round_to(
                self.measurement_zscore(sex, age_months, weight_kg, GrowthMetric::WeightForAge),
                3,
            ),
            height_zscore: round_to(
                self.measurement_zscore(sex, age_months, height_cm, GrowthMetric::HeightForAge),
                3,
            ),
            feeding_type: feeding.feeding_type,
            feeding_frequency: feeding.feeding_frequency,
            vaccination_status: self.vaccination_status_code(ctx, &records.vaccine_records).as_u8(),
            sleep_hours,
            illness_fever: illness.fever,
            illness_cold: illness.cold,
            illness_diarrhea: illness.diarrhea,
            illness_freq_trend: illness.freq_trend,
            avg_weight_gain: trend.avg_gain.map_or(0.0, |g| round_to(g, 3)),
            weight_velocity: trend.velocity.map_or(0.0, |v| round_to(v, 3)),
            group: group_features(group, age, &flags),
        };

        if !feeding.has_recent_logs {
            missing.push(RequiredInput::RecentMealLogs);
        }
        if !illness.has_recent_logs {
            missing.push(RequiredInput::RecentIllnessLogs);
        }
        if records.vaccine_records.is_empty() {
            missing.push(RequiredInput::VaccinationRecords);
        }
        if records.milestone_records.is_empty() {
            missing.push(RequiredInput::MilestoneRecords);
        }
        if sleep_hours.is_none() {
            missing.push(RequiredInput::SleepHours);
        }
        if !missing.is_empty() {
            log::debug!("features for {group} missing {} inputs", missing.len());
        }

        FeatureBuild {
            features,
            required_missing: missing,
        }
    }
}

fn group_features(group: AgeGroup, age: AgeSpan, flags: &HashSet<MilestoneCode>) -> GroupFeatures {
    let has = |code| flags.contains(&code);
    match group {
        AgeGroup::Infant => GroupFeatures::Infant {
            age_days: age.days,
            milestone_smile: has(MilestoneCode::Smile),
            milestone_roll: has(MilestoneCode::Roll),
            milestone_sit: has(MilestoneCode::Sit),
        },
        AgeGroup::Toddler => GroupFeatures::Toddler {
            age_months: age.months(),
            milestones_language: has(MilestoneCode::Language),
            milestones_walking: has(MilestoneCode::Walking),
        },
        AgeGroup::Preschool => GroupFeatures::Preschool {
            age_months: age.months(),
            milestone_speech_clarity: has(MilestoneCode::SpeechClarity),
            milestone_social_play: has(MilestoneCode::SocialPlay),
        },
        AgeGroup::SchoolAge => GroupFeatures::SchoolAge {
            age_years: age.years().floor() as i64,
            milestone_learning_skill: has(MilestoneCode::LearningSkill),
            milestone_social_skill: has(MilestoneCode::SocialSkill),
        },
    }
}
