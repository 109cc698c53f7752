//! Consistency checks over loaded reference data
//!
//! Loading rejects documents that cannot be used at all. The checks here report
//! records that load fine but will silently degrade results, such as LMS rows
//! with a non-positive median (those z-scores evaluate to 0).

use crate::documents::ReferenceDocument;
use crate::store::ReferenceData;
use child_health_diagnostics::{CH0102, CH0103, CH0104, CH0105, Diagnostic, RecordLocation};
use child_health_types::{AgeGroup, MilestoneCode, Sex};
use std::collections::HashSet;

impl ReferenceData {
    /// Warnings for records that load but cannot contribute to results
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        self.validate_growth(&mut out);
        self.validate_requirements(&mut out);
        self.validate_catalogs(&mut out);
        out
    }

    fn validate_growth(&self, out: &mut Vec<Diagnostic>) {
        let file = ReferenceDocument::Growth.file_name();
        for (family, metric, table) in self.growth.tables() {
            for sex in [Sex::Male, Sex::Female] {
                let rows = table.rows(sex);
                let source = format!("{file}:{family:?}.{metric}.{sex}").to_lowercase();
                if rows.is_empty() {
                    out.push(
                        Diagnostic::warning(CH0103, format!("no LMS rows for {source}"))
                            .with_location(RecordLocation::document(&source)),
                    );
                    continue;
                }
                for (index, row) in rows.iter().enumerate() {
                    let usable = row.l.is_finite() && row.m.is_finite() && row.s.is_finite();
                    if !usable || row.m <= 0.0 || row.s <= 0.0 {
                        out.push(
                            Diagnostic::warning(
                                CH0102,
                                format!(
                                    "row at {} months has L={} M={} S={}",
                                    row.age_months, row.l, row.m, row.s
                                ),
                            )
                            .with_location(RecordLocation::record(&source, index)),
                        );
                    }
                }
            }
        }
    }

    fn validate_requirements(&self, out: &mut Vec<Diagnostic>) {
        let file = ReferenceDocument::Requirements.file_name();
        if self.requirements.is_empty() {
            out.push(
                Diagnostic::warning(CH0104, "no requirement bands; every nutrient will be not_applicable")
                    .with_location(RecordLocation::document(file)),
            );
        }
        for (index, band) in self.requirements.iter().enumerate() {
            if band.targets.is_zero() {
                out.push(
                    Diagnostic::warning(
                        CH0104,
                        format!(
                            "band {}-{} months has no positive targets",
                            band.age_min_months, band.age_max_months
                        ),
                    )
                    .with_location(RecordLocation::record(file, index)),
                );
            }
        }
    }

    fn validate_catalogs(&self, out: &mut Vec<Diagnostic>) {
        let file = ReferenceDocument::Vaccines.file_name();
        for (index, entry) in self.vaccines.iter().enumerate() {
            if entry.doses_required == 0 {
                out.push(
                    Diagnostic::warning(CH0104, format!("{} requires zero doses", entry.vaccine_name))
                        .with_location(RecordLocation::record(file, index).with_field("doses_required")),
                );
            }
        }

        let file = ReferenceDocument::Milestones.file_name();
        let mut codes = HashSet::new();
        for (index, def) in self.milestones.iter().enumerate() {
            let Some(code) = def.code.as_deref() else {
                continue;
            };
            match code.parse::<MilestoneCode>() {
                Ok(parsed) if !codes.insert(parsed) => out.push(
                    Diagnostic::warning(CH0105, format!("milestone code {code} appears more than once"))
                        .with_location(RecordLocation::record(file, index).with_field("code")),
                ),
                Ok(parsed) if parsed.age_group() != def.age_group => out.push(
                    Diagnostic::warning(
                        CH0104,
                        format!("milestone code {code} belongs to {}, not {}", parsed.age_group(), def.age_group),
                    )
                    .with_location(RecordLocation::record(file, index).with_field("age_group")),
                ),
                _ => {}
            }
        }

        let file = ReferenceDocument::Foods.file_name();
        for group in AgeGroup::ALL {
            if self.foods_for_group(group).next().is_none() && !self.foods.is_empty() {
                out.push(
                    Diagnostic::warning(CH0103, format!("no foods offered to {group}"))
                        .with_location(RecordLocation::document(file)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedded_reference;
    use crate::growth::GrowthReference;
    use child_health_types::{GrowthMetric, LmsPoint, ReferenceFamily};

    #[test]
    fn test_embedded_reference_is_clean() {
        let diagnostics = embedded_reference().unwrap().validate();
        assert!(diagnostics.is_empty(), "{diagnostics:#?}");
    }

    #[test]
    fn test_non_positive_median_is_reported() {
        let data = ReferenceData::empty().with_growth(GrowthReference::default().with_rows(
            ReferenceFamily::Who,
            GrowthMetric::WeightForAge,
            Sex::Male,
            vec![LmsPoint::new(0.0, 0.3, 3.3, 0.14), LmsPoint::new(1.0, 0.2, 0.0, 0.13)],
        ));
        let diagnostics = data.validate();
        let bad_rows: Vec<_> = diagnostics.iter().filter(|d| d.code == CH0102).collect();
        assert_eq!(bad_rows.len(), 1);
        assert!(bad_rows[0].location.as_ref().is_some_and(|l| l.index == Some(1)));
        // seven other tables are empty
        assert_eq!(diagnostics.iter().filter(|d| d.code == CH0103).count(), 7);
    }
}
