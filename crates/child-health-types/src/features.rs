//! Typed prediction feature vectors and stored prediction snapshots

use crate::milestone::MilestoneCode;
use crate::subject::AgeGroup;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Fields that differ per age group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "age_group")]
pub enum GroupFeatures {
    Infant {
        age_days: i64,
        milestone_smile: bool,
        milestone_roll: bool,
        milestone_sit: bool,
    },
    Toddler {
        age_months: i64,
        milestones_language: bool,
        milestones_walking: bool,
    },
    Preschool {
        age_months: i64,
        milestone_speech_clarity: bool,
        milestone_social_play: bool,
    },
    SchoolAge {
        age_years: i64,
        milestone_learning_skill: bool,
        milestone_social_skill: bool,
    },
}

impl GroupFeatures {
    pub fn age_group(&self) -> AgeGroup {
        match self {
            Self::Infant { .. } => AgeGroup::Infant,
            Self::Toddler { .. } => AgeGroup::Toddler,
            Self::Preschool { .. } => AgeGroup::Preschool,
            Self::SchoolAge { .. } => AgeGroup::SchoolAge,
        }
    }

    /// Presence flag of a milestone; `None` when the group does not track it
    pub fn milestone_flag(&self, code: MilestoneCode) -> Option<bool> {
        use MilestoneCode as C;
        match (self, code) {
            (Self::Infant { milestone_smile, .. }, C::Smile) => Some(*milestone_smile),
            (Self::Infant { milestone_roll, .. }, C::Roll) => Some(*milestone_roll),
            (Self::Infant { milestone_sit, .. }, C::Sit) => Some(*milestone_sit),
            (Self::Toddler { milestones_language, .. }, C::Language) => Some(*milestones_language),
            (Self::Toddler { milestones_walking, .. }, C::Walking) => Some(*milestones_walking),
            (Self::Preschool { milestone_speech_clarity, .. }, C::SpeechClarity) => {
                Some(*milestone_speech_clarity)
            }
            (Self::Preschool { milestone_social_play, .. }, C::SocialPlay) => {
                Some(*milestone_social_play)
            }
            (Self::SchoolAge { milestone_learning_skill, .. }, C::LearningSkill) => {
                Some(*milestone_learning_skill)
            }
            (Self::SchoolAge { milestone_social_skill, .. }, C::SocialSkill) => {
                Some(*milestone_social_skill)
            }
            _ => None,
        }
    }

    /// Tracked milestones with their flags
    pub fn milestone_flags(&self) -> SmallVec<[(MilestoneCode, bool); 3]> {
        MilestoneCode::for_group(self.age_group())
            .iter()
            .filter_map(|code| self.milestone_flag(*code).map(|flag| (*code, flag)))
            .collect()
    }
}

/// Model input for one subject at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// At least two measurements in the trend window
    pub is_existing: bool,
    /// 0 male, 1 otherwise
    pub sex: u8,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub muac_cm: f64,
    pub bmi: f64,
    pub weight_zscore: f64,
    pub height_zscore: f64,
    /// Group-specific feeding class code
    pub feeding_type: u8,
    pub feeding_frequency: u32,
    /// 0 up-to-date, 1 partial, 2 delayed
    pub vaccination_status: u8,
    pub sleep_hours: Option<f64>,
    pub illness_fever: u32,
    pub illness_cold: u32,
    pub illness_diarrhea: u32,
    pub illness_freq_trend: f64,
    pub avg_weight_gain: f64,
    pub weight_velocity: f64,
    #[serde(flatten)]
    pub group: GroupFeatures,
}

impl FeatureVector {
    pub fn age_group(&self) -> AgeGroup {
        self.group.age_group()
    }
}

/// Feature whose change invalidates a cached prediction.
///
/// Age fields are absent: they advance on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSensitiveField {
    IsExisting,
    Sex,
    WeightKg,
    HeightCm,
    MuacCm,
    Bmi,
    WeightZscore,
    HeightZscore,
    FeedingType,
    FeedingFrequency,
    VaccinationStatus,
    SleepHours,
    IllnessFever,
    IllnessCold,
    IllnessDiarrhea,
    Milestone(MilestoneCode),
    AvgWeightGain,
    WeightVelocity,
    IllnessFreqTrend,
}

impl ChangeSensitiveField {
    /// The full comparison set, in a stable order
    pub fn all() -> impl Iterator<Item = ChangeSensitiveField> {
        use ChangeSensitiveField as F;
        [
            F::IsExisting,
            F::Sex,
            F::WeightKg,
            F::HeightCm,
            F::MuacCm,
            F::Bmi,
            F::WeightZscore,
            F::HeightZscore,
            F::FeedingType,
            F::FeedingFrequency,
            F::VaccinationStatus,
            F::SleepHours,
            F::IllnessFever,
            F::IllnessCold,
            F::IllnessDiarrhea,
        ]
        .into_iter()
        .chain(MilestoneCode::ALL.into_iter().map(F::Milestone))
        .chain([F::AvgWeightGain, F::WeightVelocity, F::IllnessFreqTrend])
    }

    /// Numeric projection used for comparison; `None` for absent values
    pub fn value(&self, f: &FeatureVector) -> Option<f64> {
        use ChangeSensitiveField as F;
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match self {
            F::IsExisting => Some(flag(f.is_existing)),
            F::Sex => Some(f64::from(f.sex)),
            F::WeightKg => f.weight_kg,
            F::HeightCm => f.height_cm,
            F::MuacCm => Some(f.muac_cm),
            F::Bmi => Some(f.bmi),
            F::WeightZscore => Some(f.weight_zscore),
            F::HeightZscore => Some(f.height_zscore),
            F::FeedingType => Some(f64::from(f.feeding_type)),
            F::FeedingFrequency => Some(f64::from(f.feeding_frequency)),
            F::VaccinationStatus => Some(f64::from(f.vaccination_status)),
            F::SleepHours => f.sleep_hours,
            F::IllnessFever => Some(f64::from(f.illness_fever)),
            F::IllnessCold => Some(f64::from(f.illness_cold)),
            F::IllnessDiarrhea => Some(f64::from(f.illness_diarrhea)),
            F::Milestone(code) => f.group.milestone_flag(*code).map(flag),
            F::AvgWeightGain => Some(f.avg_weight_gain),
            F::WeightVelocity => Some(f.weight_velocity),
            F::IllnessFreqTrend => Some(f.illness_freq_trend),
        }
    }
}

/// Outputs of the external predictors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutputs {
    #[serde(default)]
    pub growth_percentile: Option<f64>,
    /// 0 normal, 1 nutrition risk
    #[serde(default)]
    pub nutrition_flag: Option<u8>,
    #[serde(default)]
    pub prob_fever: Option<f64>,
    #[serde(default)]
    pub prob_cold: Option<f64>,
    #[serde(default)]
    pub prob_diarrhea: Option<f64>,
    /// Delay probability per milestone
    #[serde(default)]
    pub milestone_delay: IndexMap<MilestoneCode, Option<f64>>,
}

/// The most recently persisted feature and output bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSnapshot {
    pub created_at: NaiveDateTime,
    pub features: FeatureVector,
    pub outputs: PredictionOutputs,
}

impl PredictionSnapshot {
    pub fn age_group(&self) -> AgeGroup {
        self.features.age_group()
    }
}
