//! Reference data, engine configuration and evaluation date shared by every command

use super::output::OutputFormat;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use child_health_engine::{EngineConfig, HealthEngine};
use child_health_reference::ReferenceData;
use crate::{load_config, load_reference};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Global options parsed from the command line
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub reference_dir: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
    pub as_of: Option<NaiveDate>,
    pub format: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Loaded state a command runs against
#[derive(Debug)]
pub struct Session {
    reference: Cow<'static, ReferenceData>,
    config: EngineConfig,
    pub as_of: NaiveDate,
    pub format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

impl Session {
    pub fn load(options: SessionConfig) -> Result<Self> {
        let reference = load_reference(options.reference_dir.as_deref()).with_context(|| {
            match &options.reference_dir {
                Some(dir) => format!("Failed to load reference data from {}", dir.display()),
                None => "Failed to load embedded reference data".to_string(),
            }
        })?;

        let config = match &options.config_file {
            Some(path) => load_config(Some(path))
                .with_context(|| format!("Failed to load engine config: {}", path.display()))?,
            None => EngineConfig::default(),
        };

        let as_of = options.as_of.unwrap_or_else(|| Local::now().date_naive());
        log::debug!("Evaluating as of {as_of}");

        Ok(Self {
            reference,
            config,
            as_of,
            format: OutputFormat::from_name(options.format.as_deref().unwrap_or("pretty")),
            output_file: options.output_file,
        })
    }

    pub fn engine(&self) -> HealthEngine<'_> {
        HealthEngine::with_config(&self.reference, self.config.clone())
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }
}

/// Parse a `YYYY-MM-DD` argument
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
