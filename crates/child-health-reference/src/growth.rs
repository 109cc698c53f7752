//! Growth standard LMS tables

use child_health_types::{GrowthMetric, LmsPoint, ReferenceFamily, Sex};
use serde::{Deserialize, Serialize};

/// Serialized form: rows per sex in any order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LmsTableRecord {
    #[serde(default)]
    male: Vec<LmsPoint>,
    #[serde(default)]
    female: Vec<LmsPoint>,
}

/// LMS rows for one metric, sorted by age for each sex
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "LmsTableRecord", into = "LmsTableRecord")]
pub struct LmsTable {
    male: Vec<LmsPoint>,
    female: Vec<LmsPoint>,
}

fn sorted(mut rows: Vec<LmsPoint>) -> Vec<LmsPoint> {
    rows.retain(|r| r.age_months.is_finite());
    rows.sort_by(|a, b| a.age_months.total_cmp(&b.age_months));
    rows
}

impl LmsTable {
    pub fn new(male: Vec<LmsPoint>, female: Vec<LmsPoint>) -> Self {
        Self {
            male: sorted(male),
            female: sorted(female),
        }
    }

    /// Rows applicable to `sex`, ascending by age
    pub fn rows(&self, sex: Sex) -> &[LmsPoint] {
        match sex.reference_sex() {
            Sex::Male => &self.male,
            _ => &self.female,
        }
    }

    pub fn len(&self) -> usize {
        self.male.len() + self.female.len()
    }

    pub fn is_empty(&self) -> bool {
        self.male.is_empty() && self.female.is_empty()
    }
}

impl From<LmsTableRecord> for LmsTable {
    fn from(record: LmsTableRecord) -> Self {
        Self::new(record.male, record.female)
    }
}

impl From<LmsTable> for LmsTableRecord {
    fn from(table: LmsTable) -> Self {
        Self {
            male: table.male,
            female: table.female,
        }
    }
}

/// Weight and height tables of one reference family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyTables {
    #[serde(default)]
    pub weight_for_age: LmsTable,
    #[serde(default)]
    pub height_for_age: LmsTable,
}

impl FamilyTables {
    pub fn table(&self, metric: GrowthMetric) -> &LmsTable {
        match metric {
            GrowthMetric::WeightForAge => &self.weight_for_age,
            GrowthMetric::HeightForAge => &self.height_for_age,
        }
    }

    fn table_mut(&mut self, metric: GrowthMetric) -> &mut LmsTable {
        match metric {
            GrowthMetric::WeightForAge => &mut self.weight_for_age,
            GrowthMetric::HeightForAge => &mut self.height_for_age,
        }
    }
}

/// Both growth reference families
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthReference {
    #[serde(default)]
    pub who: FamilyTables,
    #[serde(default)]
    pub cdc: FamilyTables,
}

impl GrowthReference {
    pub fn family(&self, family: ReferenceFamily) -> &FamilyTables {
        match family {
            ReferenceFamily::Who => &self.who,
            ReferenceFamily::Cdc => &self.cdc,
        }
    }

    /// Rows for a family, metric and sex
    pub fn rows(&self, family: ReferenceFamily, metric: GrowthMetric, sex: Sex) -> &[LmsPoint] {
        self.family(family).table(metric).rows(sex)
    }

    /// Replace the rows for one family, metric and sex
    pub fn with_rows(
        mut self,
        family: ReferenceFamily,
        metric: GrowthMetric,
        sex: Sex,
        rows: Vec<LmsPoint>,
    ) -> Self {
        let tables = match family {
            ReferenceFamily::Who => &mut self.who,
            ReferenceFamily::Cdc => &mut self.cdc,
        };
        let table = tables.table_mut(metric);
        match sex.reference_sex() {
            Sex::Male => table.male = sorted(rows),
            _ => table.female = sorted(rows),
        }
        self
    }

    /// Every table with its labels, for validation and reporting
    pub fn tables(&self) -> impl Iterator<Item = (ReferenceFamily, GrowthMetric, &LmsTable)> {
        [ReferenceFamily::Who, ReferenceFamily::Cdc]
            .into_iter()
            .flat_map(move |family| {
                [GrowthMetric::WeightForAge, GrowthMetric::HeightForAge]
                    .into_iter()
                    .map(move |metric| (family, metric, self.family(family).table(metric)))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rows_are_sorted_on_load() {
        let table: LmsTable = serde_json::from_str(
            r#"{"male": [[2, 1, 58.4, 0.034], [0, 1, 49.9, 0.038], [1, 1, 54.7, 0.036]]}"#,
        )
        .unwrap();
        let ages: Vec<f64> = table.rows(Sex::Male).iter().map(|r| r.age_months).collect();
        assert_eq!(ages, vec![0.0, 1.0, 2.0]);
        assert!(table.rows(Sex::Female).is_empty());
    }

    #[test]
    fn test_with_rows_replaces_one_sex() {
        let growth = GrowthReference::default().with_rows(
            ReferenceFamily::Who,
            GrowthMetric::WeightForAge,
            Sex::Female,
            vec![LmsPoint::new(20.0, 0.1, 11.5, 0.12)],
        );
        assert_eq!(
            growth.rows(ReferenceFamily::Who, GrowthMetric::WeightForAge, Sex::Other).len(),
            1
        );
        assert!(growth
            .rows(ReferenceFamily::Who, GrowthMetric::WeightForAge, Sex::Male)
            .is_empty());
        assert_eq!(growth.tables().count(), 4);
    }
}
