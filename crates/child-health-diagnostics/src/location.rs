//! Locations inside reference documents
//!
//! Reference data is loaded from JSON documents holding arrays of records, so a
//! location is a document name plus an optional record index and field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a record within a reference document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordLocation {
    /// Document name (file name or embedded resource name)
    pub source: String,
    /// Zero-based record index within the document
    pub index: Option<usize>,
    /// Field name within the record
    pub field: Option<String>,
}

impl RecordLocation {
    /// Location of a whole document
    pub fn document(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            index: None,
            field: None,
        }
    }

    /// Location of a single record
    pub fn record(source: impl Into<String>, index: usize) -> Self {
        Self {
            source: source.into(),
            index: Some(index),
            field: None,
        }
    }

    /// Narrow the location to a field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        if let Some(index) = self.index {
            write!(f, "[{}]", index)?;
        }
        if let Some(field) = &self.field {
            write!(f, ".{}", field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_document() {
        assert_eq!(RecordLocation::document("recipes.json").to_string(), "recipes.json");
    }

    #[test]
    fn test_display_record_field() {
        let loc = RecordLocation::record("growth_lms.json", 3).with_field("m");
        assert_eq!(loc.to_string(), "growth_lms.json[3].m");
    }
}
