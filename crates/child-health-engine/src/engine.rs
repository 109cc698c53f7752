//! The analytics engine
//!
//! `HealthEngine` borrows the immutable reference data and carries the engine
//! configuration. Operations live in `analytics`, `report` and `summary` as
//! further `impl HealthEngine` blocks.

use crate::config::EngineConfig;
use crate::error::EngineResult;
use child_health_reference::{ReferenceData, embedded_reference};

/// Child health analytics over shared reference data
#[derive(Debug, Clone)]
pub struct HealthEngine<'r> {
    reference: &'r ReferenceData,
    config: EngineConfig,
}

impl<'r> HealthEngine<'r> {
    /// Create an engine with the default configuration
    pub fn new(reference: &'r ReferenceData) -> Self {
        Self::with_config(reference, EngineConfig::default())
    }

    pub fn with_config(reference: &'r ReferenceData, config: EngineConfig) -> Self {
        Self { reference, config }
    }

    pub fn reference(&self) -> &'r ReferenceData {
        self.reference
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl HealthEngine<'static> {
    /// Engine over the embedded reference data
    pub fn embedded() -> EngineResult<Self> {
        Ok(Self::new(embedded_reference()?))
    }
}
