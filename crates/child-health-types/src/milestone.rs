//! Developmental milestones

use crate::subject::AgeGroup;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a milestone tracked by the prediction features
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MilestoneCode {
    #[serde(rename = "milestone_smile")]
    Smile,
    #[serde(rename = "milestone_roll")]
    Roll,
    #[serde(rename = "milestone_sit")]
    Sit,
    #[serde(rename = "milestones_language")]
    Language,
    #[serde(rename = "milestones_walking")]
    Walking,
    #[serde(rename = "milestone_speech_clarity")]
    SpeechClarity,
    #[serde(rename = "milestone_social_play")]
    SocialPlay,
    #[serde(rename = "milestone_learning_skill")]
    LearningSkill,
    #[serde(rename = "milestone_social_skill")]
    SocialSkill,
}

impl MilestoneCode {
    pub const ALL: [MilestoneCode; 9] = [
        MilestoneCode::Smile,
        MilestoneCode::Roll,
        MilestoneCode::Sit,
        MilestoneCode::Language,
        MilestoneCode::Walking,
        MilestoneCode::SpeechClarity,
        MilestoneCode::SocialPlay,
        MilestoneCode::LearningSkill,
        MilestoneCode::SocialSkill,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Smile => "milestone_smile",
            Self::Roll => "milestone_roll",
            Self::Sit => "milestone_sit",
            Self::Language => "milestones_language",
            Self::Walking => "milestones_walking",
            Self::SpeechClarity => "milestone_speech_clarity",
            Self::SocialPlay => "milestone_social_play",
            Self::LearningSkill => "milestone_learning_skill",
            Self::SocialSkill => "milestone_social_skill",
        }
    }

    pub const fn age_group(&self) -> AgeGroup {
        match self {
            Self::Smile | Self::Roll | Self::Sit => AgeGroup::Infant,
            Self::Language | Self::Walking => AgeGroup::Toddler,
            Self::SpeechClarity | Self::SocialPlay => AgeGroup::Preschool,
            Self::LearningSkill | Self::SocialSkill => AgeGroup::SchoolAge,
        }
    }

    /// Codes tracked for an age group
    pub const fn for_group(group: AgeGroup) -> &'static [MilestoneCode] {
        match group {
            AgeGroup::Infant => &[Self::Smile, Self::Roll, Self::Sit],
            AgeGroup::Toddler => &[Self::Language, Self::Walking],
            AgeGroup::Preschool => &[Self::SpeechClarity, Self::SocialPlay],
            AgeGroup::SchoolAge => &[Self::LearningSkill, Self::SocialSkill],
        }
    }

    /// Keywords that must all appear in a catalog name for the fallback match
    pub const fn name_keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Smile => &["smile"],
            Self::Roll => &["roll"],
            Self::Sit => &["sit"],
            Self::Language => &["language"],
            Self::Walking => &["walk"],
            Self::SpeechClarity => &["speech", "clarity"],
            Self::SocialPlay => &["social", "play"],
            Self::LearningSkill => &["learning"],
            Self::SocialSkill => &["social", "skill"],
        }
    }

    /// Display name
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Smile => "Social Smile",
            Self::Roll => "Rolling Over",
            Self::Sit => "Sitting",
            Self::Language => "Language Development",
            Self::Walking => "Walking",
            Self::SpeechClarity => "Speech Clarity",
            Self::SocialPlay => "Social Play",
            Self::LearningSkill => "Learning Skill",
            Self::SocialSkill => "Social Skill",
        }
    }
}

impl fmt::Display for MilestoneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MilestoneCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL.into_iter().find(|c| c.as_str() == s).ok_or(())
    }
}

/// Milestone catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneDefinition {
    pub id: u32,
    /// Catalog code, ideally one of the stable `MilestoneCode` values
    #[serde(default)]
    pub code: Option<String>,
    pub name: String,
    #[serde(default)]
    pub sub_features: Vec<String>,
    pub age_group: AgeGroup,
}

/// A subject's recorded status for a milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneStatusRecord {
    pub milestone_id: u32,
    #[serde(default)]
    pub achieved_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_str() {
        for code in MilestoneCode::ALL {
            assert_eq!(code.as_str().parse::<MilestoneCode>(), Ok(code));
            assert!(MilestoneCode::for_group(code.age_group()).contains(&code));
        }
    }

    #[test]
    fn test_serde_uses_stable_codes() {
        let json = serde_json::to_string(&MilestoneCode::Walking).unwrap();
        assert_eq!(json, r#""milestones_walking""#);
    }
}
