//! Loading reference documents from JSON

use crate::documents::{RecipeCatalogDocument, ReferenceDocument, VaccineScheduleDocument};
use crate::embedded;
use crate::error::ReferenceError;
use crate::growth::GrowthReference;
use crate::store::ReferenceData;
use child_health_diagnostics::{CH0104, CH0105, RecordLocation};
use child_health_types::{Food, MilestoneDefinition, NutritionRequirement};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;

fn parse<T: DeserializeOwned>(doc: ReferenceDocument, json: &str) -> Result<T, ReferenceError> {
    serde_json::from_str(json).map_err(|e| ReferenceError::Parse {
        document: doc.file_name().to_string(),
        message: e.to_string(),
    })
}

fn ensure_unique<T, K: Eq + Hash>(
    doc: ReferenceDocument,
    records: &[T],
    key: impl Fn(&T) -> K,
    describe: impl Fn(&T) -> String,
) -> Result<(), ReferenceError> {
    let mut seen = HashSet::new();
    for (index, record) in records.iter().enumerate() {
        if !seen.insert(key(record)) {
            return Err(ReferenceError::invalid(
                CH0105,
                RecordLocation::record(doc.file_name(), index),
                format!("duplicate identifier {}", describe(record)),
            ));
        }
    }
    Ok(())
}

impl ReferenceData {
    /// Build from the six JSON documents
    pub fn from_json_documents(
        growth: &str,
        requirements: &str,
        foods: &str,
        recipes: &str,
        vaccines: &str,
        milestones: &str,
    ) -> Result<Self, ReferenceError> {
        let mut data = ReferenceData::empty();
        data.load_document(ReferenceDocument::Growth, growth)?;
        data.load_document(ReferenceDocument::Requirements, requirements)?;
        data.load_document(ReferenceDocument::Foods, foods)?;
        data.load_document(ReferenceDocument::Recipes, recipes)?;
        data.load_document(ReferenceDocument::Vaccines, vaccines)?;
        data.load_document(ReferenceDocument::Milestones, milestones)?;
        Ok(data)
    }

    /// Replace one document from its JSON text
    pub fn load_document(&mut self, doc: ReferenceDocument, json: &str) -> Result<(), ReferenceError> {
        match doc {
            ReferenceDocument::Growth => {
                self.growth = parse::<GrowthReference>(doc, json)?;
            }
            ReferenceDocument::Requirements => {
                let bands: Vec<NutritionRequirement> = parse(doc, json)?;
                for (index, band) in bands.iter().enumerate() {
                    if band.age_min_months > band.age_max_months {
                        return Err(ReferenceError::invalid(
                            CH0104,
                            RecordLocation::record(doc.file_name(), index),
                            format!(
                                "age_min_months {} exceeds age_max_months {}",
                                band.age_min_months, band.age_max_months
                            ),
                        ));
                    }
                }
                self.requirements = bands;
            }
            ReferenceDocument::Foods => {
                let foods: Vec<Food> = parse(doc, json)?;
                ensure_unique(doc, &foods, |f| f.id, |f| format!("food {}", f.id))?;
                self.foods = foods;
            }
            ReferenceDocument::Recipes => {
                let recipes = parse::<RecipeCatalogDocument>(doc, json)?.into_recipes();
                ensure_unique(doc, &recipes, |r| r.code.clone(), |r| format!("recipe {}", r.code))?;
                self.recipes = recipes;
            }
            ReferenceDocument::Vaccines => {
                let vaccines = parse::<VaccineScheduleDocument>(doc, json)?.into_entries();
                ensure_unique(doc, &vaccines, |v| v.id, |v| format!("schedule {}", v.id))?;
                self.vaccines = vaccines;
            }
            ReferenceDocument::Milestones => {
                let milestones: Vec<MilestoneDefinition> = parse(doc, json)?;
                ensure_unique(doc, &milestones, |m| m.id, |m| format!("milestone {}", m.id))?;
                self.milestones = milestones;
            }
        }
        log::debug!("loaded reference document {}", doc);
        Ok(())
    }

    /// Replace one document from a file; the document is chosen by file name
    pub fn load_document_file(&mut self, path: impl AsRef<Path>) -> Result<ReferenceDocument, ReferenceError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {}
            Some(ext) => {
                return Err(ReferenceError::UnsupportedFile(format!(
                    "{} (unsupported extension .{}, expected .json)",
                    path.display(),
                    ext
                )));
            }
            None => {
                return Err(ReferenceError::UnsupportedFile(format!(
                    "{} (no extension, expected .json)",
                    path.display()
                )));
            }
        }
        let doc = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(ReferenceDocument::from_file_name)
            .ok_or_else(|| ReferenceError::UnsupportedFile(path.display().to_string()))?;
        let json = std::fs::read_to_string(path).map_err(|e| ReferenceError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.load_document(doc, &json)?;
        Ok(doc)
    }

    /// Load from a directory; documents absent from it fall back to the embedded ones
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ReferenceError::Missing(dir.display().to_string()));
        }
        let mut data = ReferenceData::empty();
        for doc in ReferenceDocument::ALL {
            let path = dir.join(doc.file_name());
            if path.is_file() {
                data.load_document_file(&path)?;
            } else {
                log::info!("{} not found in {}, using embedded default", doc, dir.display());
                data.load_document(doc, embedded::document_text(doc))?;
            }
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use child_health_diagnostics::{CH0101, CH0104, CH0105};

    #[test]
    fn test_inverted_band_is_rejected() {
        let mut data = ReferenceData::empty();
        let err = data
            .load_document(
                ReferenceDocument::Requirements,
                r#"[{"age_min_months": 30, "age_max_months": 24, "energy_kcal": 1000}]"#,
            )
            .unwrap_err();
        assert_eq!(err.code(), CH0104);
        assert!(err.to_string().contains("nutrition_requirements.json[0]"));
    }

    #[test]
    fn test_duplicate_food_ids_are_rejected() {
        let mut data = ReferenceData::empty();
        let err = data
            .load_document(
                ReferenceDocument::Foods,
                r#"[{"id": 1, "name": "Milk", "age_group": "all"},
                    {"id": 1, "name": "Curd", "age_group": "all"}]"#,
            )
            .unwrap_err();
        assert_eq!(err.code(), CH0105);
    }

    #[test]
    fn test_malformed_json() {
        let mut data = ReferenceData::empty();
        let err = data.load_document(ReferenceDocument::Milestones, "{not json").unwrap_err();
        assert_eq!(err.code(), CH0101);
    }

    #[test]
    fn test_unsupported_extension() {
        let mut data = ReferenceData::empty();
        let err = data.load_document_file("foods.csv").unwrap_err();
        assert!(matches!(err, ReferenceError::UnsupportedFile(_)));
    }
}
