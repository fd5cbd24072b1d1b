use crate::cohort::Cohort;
use chrono::{Duration, NaiveDate};
use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An instructor assigned by more than one cohort on the same date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorConflict {
    pub date: NaiveDate,
    pub instructor: String,
    pub cohort_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConflictScan {
    pub has_conflicts: bool,
    pub conflicts: Vec<InstructorConflict>,
}

/// Tally, for one date, how many cohorts assign each instructor. Instructor
/// names compare by exact string match.
pub fn instructor_counts(
    cohorts: &[Cohort],
    date: NaiveDate,
) -> Result<HashMap<String, usize>, PolarsError> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for cohort in cohorts {
        if let Some(entry) = cohort
            .flat_schedule()?
            .into_iter()
            .find(|entry| entry.date == date)
        {
            *counts.entry(entry.instructor).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

/// Scan every calendar date from the earliest cohort start to the latest
/// cohort end, not just dates with assignments, so gap days are observed
/// too. The global flag is the logical OR of per-date conflict presence.
pub fn scan_conflicts(cohorts: &[Cohort]) -> Result<ConflictScan, PolarsError> {
    // One date-keyed lookup per cohort; dates are unique within a cohort.
    let mut lookups: Vec<(String, HashMap<NaiveDate, String>)> = Vec::with_capacity(cohorts.len());
    let mut min_date: Option<NaiveDate> = None;
    let mut max_date: Option<NaiveDate> = None;

    for cohort in cohorts {
        let schedule = cohort.flat_schedule()?;
        if let (Some(first), Some(last)) = (schedule.first(), schedule.last()) {
            min_date = Some(match min_date {
                Some(current) if current <= first.date => current,
                _ => first.date,
            });
            max_date = Some(match max_date {
                Some(current) if current >= last.date => current,
                _ => last.date,
            });
        }
        let by_date = schedule
            .into_iter()
            .map(|entry| (entry.date, entry.instructor))
            .collect();
        lookups.push((cohort.id().to_string(), by_date));
    }

    let (Some(start), Some(end)) = (min_date, max_date) else {
        return Ok(ConflictScan::default());
    };

    let mut scan = ConflictScan::default();
    let mut current = start;
    while current <= end {
        let mut assignments: HashMap<&str, Vec<&str>> = HashMap::new();
        for (cohort_id, by_date) in &lookups {
            if let Some(instructor) = by_date.get(&current) {
                assignments
                    .entry(instructor.as_str())
                    .or_default()
                    .push(cohort_id.as_str());
            }
        }

        let mut conflicted: Vec<InstructorConflict> = assignments
            .into_iter()
            .filter(|(_, cohort_ids)| cohort_ids.len() > 1)
            .map(|(instructor, cohort_ids)| InstructorConflict {
                date: current,
                instructor: instructor.to_string(),
                cohort_ids: cohort_ids.into_iter().map(str::to_string).collect(),
            })
            .collect();
        conflicted.sort_by(|a, b| a.instructor.cmp(&b.instructor));

        if !conflicted.is_empty() {
            scan.has_conflicts = true;
            scan.conflicts.extend(conflicted);
        }

        current = current + Duration::days(1);
    }

    Ok(scan)
}
