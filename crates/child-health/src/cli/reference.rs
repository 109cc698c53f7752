//! Reference command implementation

use super::output::{self, key_value_table};
use super::session::Session;
use anyhow::{Context, Result};
use child_health_diagnostics::Diagnostic;
use child_health_reference::ReferenceData;
use child_health_reference::store::ReferenceCounts;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Configuration for reference validate command
pub struct ValidateConfig {
    /// Directory to validate instead of the session's reference data
    pub dir: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub source: String,
    pub counts: ReferenceCounts,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn validation_report(source: String, data: &ReferenceData) -> ValidationReport {
    ValidationReport {
        source,
        counts: data.counts(),
        diagnostics: data.validate(),
    }
}

pub fn validate(session: &Session, config: ValidateConfig) -> Result<()> {
    let report = match &config.dir {
        Some(dir) => {
            if config.verbose {
                eprintln!("Validating: {}", dir.display());
            }
            let data = ReferenceData::from_dir(dir)
                .with_context(|| format!("Failed to load reference data from {}", dir.display()))?;
            validation_report(dir.display().to_string(), &data)
        }
        None => validation_report("active reference data".to_string(), session.reference()),
    };

    output::print_report(&report, session.format, session.output_path(), render_table)?;

    if report.diagnostics.is_empty() {
        eprintln!("{}", output::format_success(&format!("{} is consistent", report.source)));
    } else {
        for diagnostic in &report.diagnostics {
            eprintln!("{}", diagnostic.render_colored());
        }
        eprintln!(
            "{} {}",
            "Validation found".yellow().bold(),
            format!("{} warning(s)", report.diagnostics.len()).yellow()
        );
    }
    Ok(())
}

pub fn render_table(report: &ValidationReport) -> String {
    let c = &report.counts;
    key_value_table([
        ("Source", report.source.clone()),
        ("LMS rows", c.lms_rows.to_string()),
        ("Requirement bands", c.requirement_bands.to_string()),
        ("Foods", c.foods.to_string()),
        ("Recipes", c.recipes.to_string()),
        ("Vaccines", c.vaccines.to_string()),
        ("Milestones", c.milestones.to_string()),
        ("Warnings", report.diagnostics.len().to_string()),
    ])
}
