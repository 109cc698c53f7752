//! Vaccination status per schedule entry and per age group

use crate::analytics::due_date::due_date;
use crate::context::EvaluationContext;
use crate::engine::HealthEngine;
use crate::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use child_health_types::{AgeGroup, VaccineScheduleEntry, VaccineStatusRecord};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Status shown for one schedule entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Completed,
    Missed,
    Pending,
}

/// One schedule entry with the subject's progress
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleStatus {
    pub schedule: VaccineScheduleEntry,
    pub doses_completed: u32,
    pub doses_remaining: u32,
    /// Due date of the next unfilled dose
    pub next_due_date: Option<NaiveDate>,
    pub status: DisplayStatus,
}

/// Overall vaccination standing of the current age group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VaccinationStanding {
    Missed,
    Upcoming,
    #[serde(rename = "Up-to-date")]
    UpToDate,
}

impl fmt::Display for VaccinationStanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Missed => "Missed",
            Self::Upcoming => "Upcoming",
            Self::UpToDate => "Up-to-date",
        })
    }
}

/// Missed doses and the nearest upcoming core dose
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaccinationSummary {
    pub status: VaccinationStanding,
    pub next_due_name: Option<String>,
    pub next_due_recommended_age: Option<String>,
    pub next_due_date: Option<NaiveDate>,
    pub missed_count: u32,
}

/// Subject feature code: 0 up-to-date, 1 partial, 2 delayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VaccinationCode {
    UpToDate = 0,
    Partial = 1,
    Delayed = 2,
}

impl VaccinationCode {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Completed records keyed by (schedule, dose)
struct DoseIndex<'a> {
    by_dose: HashMap<(u32, u32), &'a VaccineStatusRecord>,
}

impl<'a> DoseIndex<'a> {
    fn new(records: &'a [VaccineStatusRecord]) -> Self {
        // later records win, like a keyed store
        let by_dose = records
            .iter()
            .map(|r| ((r.schedule_id, r.dose_number), r))
            .collect();
        Self { by_dose }
    }

    fn get(&self, schedule_id: u32, dose: u32) -> Option<&'a VaccineStatusRecord> {
        self.by_dose.get(&(schedule_id, dose)).copied()
    }

    fn is_completed(&self, schedule_id: u32, dose: u32) -> bool {
        self.get(schedule_id, dose).is_some_and(VaccineStatusRecord::is_completed)
    }
}

fn doses_of(entry: &VaccineScheduleEntry) -> u32 {
    entry.doses_required.max(1)
}

/// Next dose number for a new record: one past the highest recorded dose
pub fn next_dose_to_record(schedule: &VaccineScheduleEntry, records: &[VaccineStatusRecord]) -> EngineResult<u32> {
    let max_recorded = records
        .iter()
        .filter(|r| r.schedule_id == schedule.id)
        .map(|r| r.dose_number)
        .max()
        .unwrap_or(0);
    let next = max_recorded + 1;
    if next > schedule.doses_required {
        return Err(EngineError::DoseExceedsSchedule {
            vaccine: schedule.vaccine_name.clone(),
            dose: next,
            doses_required: schedule.doses_required,
        });
    }
    Ok(next)
}

impl HealthEngine<'_> {
    /// Progress on every schedule entry of an age group
    pub fn status_for_group(
        &self,
        ctx: &EvaluationContext,
        group: AgeGroup,
        records: &[VaccineStatusRecord],
    ) -> Vec<ScheduleStatus> {
        let index = DoseIndex::new(records);
        let dob = ctx.subject.date_of_birth;
        self.reference()
            .schedules_for_group(group)
            .map(|entry| {
                let total = doses_of(entry);
                let doses_completed = (1..=total)
                    .filter(|dose| index.is_completed(entry.id, *dose))
                    .count() as u32;
                let doses_remaining = total - doses_completed;
                let (next_due_date, status) = if doses_remaining == 0 {
                    (None, DisplayStatus::Completed)
                } else {
                    let due = due_date(&entry.recommended_age, doses_completed + 1, dob);
                    match due {
                        Some(d) if d < ctx.as_of => (due, DisplayStatus::Missed),
                        _ => (due, DisplayStatus::Pending),
                    }
                };
                ScheduleStatus {
                    schedule: entry.clone(),
                    doses_completed,
                    doses_remaining,
                    next_due_date,
                    status,
                }
            })
            .collect()
    }

    /// Missed core doses of the current group and the nearest upcoming core dose.
    ///
    /// When the current group has nothing upcoming, the next group's core doses
    /// are searched for the next vaccine; they never count as missed.
    pub fn vaccination_summary(&self, ctx: &EvaluationContext, records: &[VaccineStatusRecord]) -> VaccinationSummary {
        let index = DoseIndex::new(records);
        let group = ctx.age_group();
        let (missed_count, mut next) = self.scan_core_doses(ctx, &index, group);
        if next.is_none() {
            if let Some(following) = group.next() {
                log::debug!("nothing upcoming in {group}, looking ahead to {following}");
                next = self.scan_core_doses(ctx, &index, following).1;
            }
        }

        let status = if missed_count > 0 {
            VaccinationStanding::Missed
        } else if next.is_some() {
            VaccinationStanding::Upcoming
        } else {
            VaccinationStanding::UpToDate
        };
        VaccinationSummary {
            status,
            next_due_name: next.map(|(_, e)| e.vaccine_name.clone()),
            next_due_recommended_age: next.map(|(_, e)| e.recommended_age.clone()),
            next_due_date: next.map(|(d, _)| d),
            missed_count,
        }
    }

    /// Overdue dose count and earliest upcoming dose over a group's core entries.
    /// An explicit scheduled date on a record overrides the parsed one.
    fn scan_core_doses(
        &self,
        ctx: &EvaluationContext,
        index: &DoseIndex<'_>,
        group: AgeGroup,
    ) -> (u32, Option<(NaiveDate, &VaccineScheduleEntry)>) {
        let mut missed = 0;
        let mut next: Option<(NaiveDate, &VaccineScheduleEntry)> = None;
        for entry in self.reference().schedules_for_group(group).filter(|e| e.is_core()) {
            for dose in 1..=doses_of(entry) {
                let record = index.get(entry.id, dose);
                if record.is_some_and(VaccineStatusRecord::is_completed) {
                    continue;
                }
                let due = record
                    .and_then(|r| r.scheduled_date)
                    .or_else(|| due_date(&entry.recommended_age, dose, ctx.subject.date_of_birth));
                let Some(due) = due else {
                    continue;
                };
                if due < ctx.as_of {
                    missed += 1;
                } else if next.is_none_or(|(best, _)| due < best) {
                    next = Some((due, entry));
                }
            }
        }
        (missed, next)
    }

    /// Feature code over the subject's core dose records
    pub fn vaccination_status_code(&self, ctx: &EvaluationContext, records: &[VaccineStatusRecord]) -> VaccinationCode {
        let dob = ctx.subject.date_of_birth;
        let core: Vec<(&VaccineStatusRecord, &VaccineScheduleEntry)> = records
            .iter()
            .filter_map(|r| self.reference().vaccine(r.schedule_id).map(|s| (r, s)))
            .filter(|(_, s)| s.is_core())
            .collect();
        if core.is_empty() {
            return VaccinationCode::UpToDate;
        }

        let (mut completed, mut delayed, mut pending) = (0usize, 0usize, 0usize);
        for (record, schedule) in &core {
            let due = record
                .scheduled_date
                .or_else(|| due_date(&schedule.recommended_age, record.dose_number, dob));
            if record.is_completed() {
                completed += 1;
                if let (Some(given), Some(due)) = (record.actual_date, due) {
                    if given > due {
                        delayed += 1;
                    }
                }
                continue;
            }
            match due {
                Some(due) if due < ctx.as_of => delayed += 1,
                _ => pending += 1,
            }
        }

        if delayed > 1 {
            VaccinationCode::Delayed
        } else if pending > 0 || (completed > 0 && completed < core.len()) {
            VaccinationCode::Partial
        } else {
            VaccinationCode::UpToDate
        }
    }

    /// Build the record for a dose given on `given`
    pub fn record_dose(
        &self,
        schedule_id: u32,
        records: &[VaccineStatusRecord],
        given: NaiveDate,
    ) -> EngineResult<VaccineStatusRecord> {
        let schedule = self
            .reference()
            .vaccine(schedule_id)
            .ok_or(EngineError::UnknownSchedule { id: schedule_id })?;
        let dose = next_dose_to_record(schedule, records)?;
        Ok(VaccineStatusRecord::given(schedule_id, dose, given))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use child_health_reference::ReferenceData;
    use child_health_types::{Sex, Subject, VaccineCategory};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(id: u32, name: &str, age: &str, doses: u32, category: VaccineCategory, group: AgeGroup) -> VaccineScheduleEntry {
        VaccineScheduleEntry {
            id,
            vaccine_name: name.into(),
            disease_prevented: String::new(),
            recommended_age: age.into(),
            doses_required: doses,
            category,
            age_group: group,
        }
    }

    fn reference() -> ReferenceData {
        use AgeGroup::*;
        use VaccineCategory::*;
        ReferenceData::empty().with_vaccines(vec![
            entry(4, "Pentavalent", "6, 10, 14 weeks", 3, Core, Infant),
            entry(7, "IPV", "14 weeks", 1, Core, Infant),
            entry(8, "Rotavirus", "6, 10, 14 weeks", 3, Optional, Infant),
            entry(20, "MR - 1st dose", "9 months", 1, Core, Toddler),
            entry(21, "DTP booster", "16-24 months", 1, Core, Toddler),
        ])
    }

    fn ctx(as_of: NaiveDate) -> EvaluationContext {
        EvaluationContext::new(Subject::new(Sex::Female, date(2024, 1, 1)), as_of)
    }

    fn given_all_infant_core(dob: NaiveDate) -> Vec<VaccineStatusRecord> {
        let on = dob + Duration::days(100);
        vec![
            VaccineStatusRecord::given(4, 1, on),
            VaccineStatusRecord::given(4, 2, on),
            VaccineStatusRecord::given(4, 3, on),
            VaccineStatusRecord::given(7, 1, on),
        ]
    }

    #[test]
    fn test_group_status_completed_and_missed() {
        let reference = reference();
        let engine = HealthEngine::new(&reference);
        let ctx = ctx(date(2024, 3, 1));
        let records = vec![
            VaccineStatusRecord::given(8, 1, date(2024, 2, 12)),
            VaccineStatusRecord::given(8, 2, date(2024, 3, 1)),
            VaccineStatusRecord::given(8, 3, date(2024, 3, 1)),
        ];
        let statuses = engine.status_for_group(&ctx, AgeGroup::Infant, &records);
        assert_eq!(statuses.len(), 3);

        let penta = &statuses[0];
        assert_eq!(penta.doses_completed, 0);
        assert_eq!(penta.next_due_date, Some(date(2024, 2, 12)));
        assert_eq!(penta.status, DisplayStatus::Missed);

        let ipv = &statuses[1];
        assert_eq!(ipv.next_due_date, Some(date(2024, 4, 8)));
        assert_eq!(ipv.status, DisplayStatus::Pending);

        let rota = &statuses[2];
        assert_eq!(rota.doses_remaining, 0);
        assert_eq!(rota.next_due_date, None);
        assert_eq!(rota.status, DisplayStatus::Completed);
    }

    #[test]
    fn test_summary_counts_missed_and_finds_next() {
        let reference = reference();
        let engine = HealthEngine::new(&reference);
        let summary = engine.vaccination_summary(&ctx(date(2024, 3, 1)), &[]);
        assert_eq!(summary.missed_count, 1);
        assert_eq!(summary.status, VaccinationStanding::Missed);
        assert_eq!(summary.next_due_date, Some(date(2024, 3, 11)));
        assert_eq!(summary.next_due_name.as_deref(), Some("Pentavalent"));
    }

    #[test]
    fn test_scheduled_date_overrides_parsed_due_date() {
        let reference = reference();
        let engine = HealthEngine::new(&reference);
        let records = vec![VaccineStatusRecord::pending(4, 1).with_scheduled_date(date(2024, 3, 5))];
        let summary = engine.vaccination_summary(&ctx(date(2024, 3, 1)), &records);
        assert_eq!(summary.missed_count, 0);
        assert_eq!(summary.status, VaccinationStanding::Upcoming);
        assert_eq!(summary.next_due_date, Some(date(2024, 3, 5)));
    }

    #[test]
    fn test_next_group_is_searched_but_never_counted_missed() {
        let reference = reference();
        let engine = HealthEngine::new(&reference);
        let dob = date(2024, 1, 1);
        // 300 days old: still an infant, "9 months" of the next group is overdue
        let summary = engine.vaccination_summary(&ctx(dob + Duration::days(300)), &given_all_infant_core(dob));
        assert_eq!(summary.missed_count, 0);
        assert_eq!(summary.status, VaccinationStanding::Upcoming);
        assert_eq!(summary.next_due_name.as_deref(), Some("DTP booster"));
        assert_eq!(summary.next_due_date, Some(dob + Duration::days(720)));
        assert_eq!(summary.next_due_recommended_age.as_deref(), Some("16-24 months"));
    }

    #[test]
    fn test_status_code() {
        let reference = reference();
        let engine = HealthEngine::new(&reference);
        let dob = date(2024, 1, 1);
        let ctx = ctx(date(2024, 6, 1));

        assert_eq!(engine.vaccination_status_code(&ctx, &[]), VaccinationCode::UpToDate);
        // optional entries are ignored
        let optional = vec![VaccineStatusRecord::pending(8, 1)];
        assert_eq!(engine.vaccination_status_code(&ctx, &optional), VaccinationCode::UpToDate);

        let on_time = vec![
            VaccineStatusRecord::given(4, 1, dob + Duration::days(42)),
            VaccineStatusRecord::given(7, 1, dob + Duration::days(98)),
        ];
        assert_eq!(engine.vaccination_status_code(&ctx, &on_time), VaccinationCode::UpToDate);

        let upcoming = vec![
            VaccineStatusRecord::given(4, 1, dob + Duration::days(42)),
            VaccineStatusRecord::pending(20, 1),
        ];
        assert_eq!(engine.vaccination_status_code(&ctx, &upcoming), VaccinationCode::Partial);

        let overdue = vec![VaccineStatusRecord::pending(4, 2), VaccineStatusRecord::pending(4, 3)];
        assert_eq!(engine.vaccination_status_code(&ctx, &overdue), VaccinationCode::Delayed);
    }

    #[test]
    fn test_dose_recording() {
        let reference = reference();
        let engine = HealthEngine::new(&reference);
        let on = date(2024, 2, 12);

        let first = engine.record_dose(4, &[], on).unwrap();
        assert_eq!(first, VaccineStatusRecord::given(4, 1, on));

        let full = given_all_infant_core(date(2024, 1, 1));
        let err = engine.record_dose(4, &full, on).unwrap_err();
        assert!(matches!(err, EngineError::DoseExceedsSchedule { dose: 4, doses_required: 3, .. }));

        let err = engine.record_dose(99, &[], on).unwrap_err();
        assert!(matches!(err, EngineError::UnknownSchedule { id: 99 }));
    }
}
