//! Reference documents compiled into the binary

use crate::documents::ReferenceDocument;
use crate::error::ReferenceError;
use crate::store::ReferenceData;
use once_cell::sync::Lazy;

const GROWTH_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/growth_lms.json"));
const REQUIREMENTS_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/resources/nutrition_requirements.json"
));
const FOODS_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/foods.json"));
const RECIPES_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/recipes.json"));
const VACCINES_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/resources/vaccination_schedule.json"
));
const MILESTONES_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/milestones.json"));

/// Embedded JSON text of a document
pub fn document_text(doc: ReferenceDocument) -> &'static str {
    match doc {
        ReferenceDocument::Growth => GROWTH_JSON,
        ReferenceDocument::Requirements => REQUIREMENTS_JSON,
        ReferenceDocument::Foods => FOODS_JSON,
        ReferenceDocument::Recipes => RECIPES_JSON,
        ReferenceDocument::Vaccines => VACCINES_JSON,
        ReferenceDocument::Milestones => MILESTONES_JSON,
    }
}

/// Embedded reference data, parsed on first use
pub static EMBEDDED_REFERENCE: Lazy<Result<ReferenceData, ReferenceError>> = Lazy::new(|| {
    ReferenceData::from_json_documents(
        GROWTH_JSON,
        REQUIREMENTS_JSON,
        FOODS_JSON,
        RECIPES_JSON,
        VACCINES_JSON,
        MILESTONES_JSON,
    )
});

/// Shared embedded reference data
pub fn embedded_reference() -> Result<&'static ReferenceData, ReferenceError> {
    EMBEDDED_REFERENCE.as_ref().map_err(Clone::clone)
}

impl ReferenceData {
    /// Owned copy of the embedded reference data
    pub fn embedded() -> Result<Self, ReferenceError> {
        embedded_reference().cloned()
    }
}
