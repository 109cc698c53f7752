//! Loading reference data from directories

use child_health_reference::{ReferenceData, ReferenceDocument, ReferenceError, embedded_reference};
use child_health_types::{AgeGroup, Nutrient};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Test Helpers
// ============================================================================

fn write(dir: &TempDir, doc: ReferenceDocument, json: &str) {
    fs::write(dir.path().join(doc.file_name()), json).unwrap();
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_empty_dir_falls_back_to_embedded() {
    let dir = TempDir::new().unwrap();
    let data = ReferenceData::from_dir(dir.path()).unwrap();
    assert_eq!(&data, embedded_reference().unwrap());
}

#[test]
fn test_dir_overrides_single_document() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        ReferenceDocument::Requirements,
        r#"[{"age_min_months": 0, "age_max_months": 240, "energy_kcal": 1234, "protein_g": 20}]"#,
    );
    let data = ReferenceData::from_dir(dir.path()).unwrap();

    assert_eq!(data.requirements().len(), 1);
    let band = data.requirement_for(100).unwrap();
    assert_eq!(band.targets.get(Nutrient::Energy), 1234.0);
    // untouched documents still come from the embedded set
    assert_eq!(data.foods(), embedded_reference().unwrap().foods());
}

#[test]
fn test_dir_with_broken_document_fails() {
    let dir = TempDir::new().unwrap();
    write(&dir, ReferenceDocument::Foods, "[{\"id\": 1}");
    let err = ReferenceData::from_dir(dir.path()).unwrap_err();
    match err {
        ReferenceError::Parse { document, .. } => assert_eq!(document, "foods.json"),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_missing_dir() {
    let err = ReferenceData::from_dir("/definitely/not/here").unwrap_err();
    assert!(matches!(err, ReferenceError::Missing(_)));
}

#[test]
fn test_load_single_file_by_name() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        ReferenceDocument::Milestones,
        r#"[{"id": 1, "code": "milestone_sit", "name": "Sitting", "age_group": "Infant"}]"#,
    );
    let mut data = ReferenceData::empty();
    let doc = data
        .load_document_file(dir.path().join("milestones.json"))
        .unwrap();
    assert_eq!(doc, ReferenceDocument::Milestones);
    assert_eq!(data.milestones_for_group(AgeGroup::Infant).count(), 1);
}

#[test]
fn test_embedded_catalog_lookups() {
    let data = embedded_reference().unwrap();
    assert!(data.food(1).is_some());
    assert!(data.vaccine(1).is_some());
    assert!(data.schedules_for_group(AgeGroup::Infant).count() > 0);
    assert!(data.recipes_for_age(8).all(|r| r.suits_age(8)));
}
