//! Zscore command implementation

use super::output::{self, format_number, key_value_table};
use super::session::Session;
use anyhow::Result;
use child_health_engine::{classify_height_for_age, classify_weight_for_age};
use child_health_engine::report::zscore_flag;
use child_health_types::{GrowthMetric, ReferenceFamily, Sex};
use serde::Serialize;

/// Configuration for zscore command
pub struct ZScoreConfig {
    pub sex: Sex,
    pub age_months: f64,
    pub value: f64,
    pub metric: GrowthMetric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZScoreReport {
    pub sex: Sex,
    pub age_months: f64,
    pub metric: GrowthMetric,
    pub value: f64,
    pub reference: ReferenceFamily,
    pub zscore: f64,
    pub classification: String,
    pub flag: &'static str,
}

/// Parse `--sex`; anything not male or female uses the female tables
pub fn parse_sex(s: &str) -> Result<Sex, String> {
    if s.trim().is_empty() {
        return Err("sex must not be empty".to_string());
    }
    Ok(Sex::from_label(s))
}

/// Parse `--metric`: `weight`, `height`, or the full metric names
pub fn parse_metric(s: &str) -> Result<GrowthMetric, String> {
    match s.trim().to_lowercase().replace('-', "_").as_str() {
        "weight" | "wfa" | "weight_for_age" => Ok(GrowthMetric::WeightForAge),
        "height" | "length" | "hfa" | "height_for_age" => Ok(GrowthMetric::HeightForAge),
        other => Err(format!("unknown metric '{other}', expected weight or height")),
    }
}

pub fn zscore_report(session: &Session, config: &ZScoreConfig) -> ZScoreReport {
    let zscore = session
        .engine()
        .zscore(config.sex, config.age_months, config.value, config.metric);
    let classification = match config.metric {
        GrowthMetric::WeightForAge => classify_weight_for_age(zscore).to_string(),
        GrowthMetric::HeightForAge => classify_height_for_age(zscore).to_string(),
    };
    ZScoreReport {
        sex: config.sex,
        age_months: config.age_months,
        metric: config.metric,
        value: config.value,
        reference: ReferenceFamily::for_age(config.age_months),
        zscore,
        classification,
        flag: zscore_flag(zscore),
    }
}

pub fn zscore(session: &Session, config: ZScoreConfig) -> Result<()> {
    let report = zscore_report(session, &config);
    output::print_report(&report, session.format, session.output_path(), |r| {
        key_value_table([
            ("Metric", r.metric.to_string()),
            ("Sex", r.sex.to_string()),
            ("Age (months)", format_number(Some(r.age_months), 1)),
            ("Value", format_number(Some(r.value), 2)),
            ("Reference", format!("{:?}", r.reference).to_uppercase()),
            ("Z-score", format_number(Some(r.zscore), 2)),
            ("Class", r.classification.clone()),
            ("Flag", r.flag.to_string()),
        ])
    })
}
