//! Assess command implementation

use super::input::ProfileInput;
use super::output::{self, format_number, key_value_table};
use super::session::Session;
use anyhow::Result;
use child_health_engine::{FeatureBuild, PredictionReport, ProfileSummary, RequiredInput, reuse_veto};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for assess command
pub struct AssessConfig {
    pub profile: PathBuf,
}

/// Whether the stored prediction can be served or the model must run again
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionDecision {
    pub reuse_last_prediction: bool,
    /// Why the stored prediction is stale
    pub recompute_reason: Option<String>,
    /// Inputs to collect before the model can run
    pub required_missing: Vec<RequiredInput>,
}

/// Profile summary plus the prediction cache decision
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    #[serde(flatten)]
    pub summary: ProfileSummary,
    pub prediction: Option<PredictionReport>,
    pub decision: PredictionDecision,
}

/// Run every analytic over one profile
pub fn assess_profile(session: &Session, profile: &ProfileInput) -> Assessment {
    let engine = session.engine();
    let ctx = profile.context(session.as_of);
    let last = profile.last_prediction.as_ref();

    let summary = engine.profile_summary(&ctx, &profile.records, last);
    let FeatureBuild {
        features,
        required_missing,
    } = engine.build_features(&ctx, &profile.records);
    let veto = reuse_veto(&features, last, &profile.records.meal_logs);
    log::debug!("prediction reuse veto: {veto:?}");

    Assessment {
        summary,
        prediction: last.map(|snapshot| engine.prediction_report(snapshot)),
        decision: PredictionDecision {
            reuse_last_prediction: veto.is_none(),
            recompute_reason: veto.map(|v| v.to_string()),
            required_missing,
        },
    }
}

pub fn assess(session: &Session, config: AssessConfig) -> Result<()> {
    let profile = ProfileInput::from_file(&config.profile)?;
    let assessment = assess_profile(session, &profile);
    output::print_report(&assessment, session.format, session.output_path(), render_table)
}

fn list(items: impl IntoIterator<Item = impl ToString>) -> String {
    let items: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    if items.is_empty() { "-".to_string() } else { items.join(", ") }
}

fn opt(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Key/value view of an assessment
pub fn render_table(assessment: &Assessment) -> String {
    let s = &assessment.summary;
    let g = &s.growth;
    let v = &s.vaccination;
    let next_due = match (&v.next_due_name, v.next_due_date) {
        (Some(name), Some(date)) => format!("{name} on {date}"),
        (Some(name), None) => format!("{name} ({})", opt(v.next_due_recommended_age.as_deref())),
        _ => "-".to_string(),
    };
    let decision = &assessment.decision;

    key_value_table([
        ("Subject", opt(s.subject_id.as_deref())),
        ("Sex", s.sex.to_string()),
        ("As of", s.as_of.to_string()),
        ("Age", format!("{} ({})", s.age, s.age_group)),
        ("Risk", s.risk.level.to_string()),
        ("Risk reasons", list(s.risk.codes())),
        ("Weight z-score", format_number(g.weight_zscore, 2)),
        ("Height z-score", format_number(g.height_zscore, 2)),
        ("Weight for age", opt(g.weight_for_age)),
        ("Height for age", opt(g.height_for_age)),
        ("Weight trend", g.trend.to_string()),
        ("Major deficiency", opt(s.major_deficiency)),
        ("Vaccination", v.status.clone()),
        ("Next due", next_due),
        ("Missed doses", v.missed_count.to_string()),
        ("Milestone delays", list(&s.milestones.delays)),
        ("Illness flags", list(s.illness_flags.iter().map(|(name, f)| format!("{name}: {}", f.severity)))),
        ("Last vaccination", opt(s.timeline.last_vaccination)),
        ("Last illness", opt(s.timeline.last_illness)),
        ("Last prediction", opt(s.timeline.last_prediction)),
        (
            "Prediction",
            match &decision.recompute_reason {
                None => "reuse stored".to_string(),
                Some(reason) => format!("recompute ({reason})"),
            },
        ),
        ("Missing inputs", list(&decision.required_missing)),
    ])
}
