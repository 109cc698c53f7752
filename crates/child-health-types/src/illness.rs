//! Illness logs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Caregiver-reported symptoms for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IllnessLog {
    pub log_date: NaiveDate,
    #[serde(default)]
    pub fever: bool,
    #[serde(default)]
    pub cold: bool,
    #[serde(default)]
    pub diarrhea: bool,
    #[serde(default)]
    pub cough: bool,
    #[serde(default)]
    pub vomiting: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

impl IllnessLog {
    pub fn new(log_date: NaiveDate) -> Self {
        Self {
            log_date,
            fever: false,
            cold: false,
            diarrhea: false,
            cough: false,
            vomiting: false,
            notes: None,
        }
    }

    pub fn with_fever(mut self) -> Self {
        self.fever = true;
        self
    }

    pub fn with_cold(mut self) -> Self {
        self.cold = true;
        self
    }

    pub fn with_diarrhea(mut self) -> Self {
        self.diarrhea = true;
        self
    }
}
