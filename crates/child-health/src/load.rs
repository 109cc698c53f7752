//! Loading reference data and engine configuration
//!
//! Both loaders report failures as [`HealthError`](crate::HealthError) so callers see one error type
//! with a stable code, whichever crate the failure came from.

use crate::Result;
use child_health_engine::EngineConfig;
use child_health_reference::{ReferenceData, embedded_reference};
use std::borrow::Cow;
use std::path::Path;

/// Reference data from `dir`, or the embedded defaults when no directory is given
pub fn load_reference(dir: Option<&Path>) -> Result<Cow<'static, ReferenceData>> {
    match dir {
        Some(dir) => {
            log::info!("Loading reference data from {}", dir.display());
            Ok(Cow::Owned(ReferenceData::from_dir(dir)?))
        }
        None => Ok(Cow::Borrowed(embedded_reference()?)),
    }
}

/// Engine configuration from a JSON file, or the defaults when no file is given
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::from_json_file(path)?),
        None => Ok(EngineConfig::default()),
    }
}
