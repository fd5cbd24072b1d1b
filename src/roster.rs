use crate::calculations::conflicts::{self, ConflictScan};
use crate::calendar::{Holiday, ScheduleError, TrainingCalendar};
use crate::cohort::{Cohort, CohortSummary, ScheduleEntry};
use crate::cohort_validation;
use crate::curriculum::CurriculumItem;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rayon::prelude::*;
use std::collections::HashMap;

/// A cohort whose recompute pass failed. The other cohorts' schedules are
/// unaffected.
#[derive(Debug, Clone)]
pub struct CohortFailure {
    pub cohort_id: String,
    pub error: ScheduleError,
}

#[derive(Debug, Clone, Default)]
pub struct RecomputeSummary {
    pub rescheduled: Vec<CohortSummary>,
    pub failures: Vec<CohortFailure>,
}

impl RecomputeSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("cohorts={}", self.rescheduled.len()));
        if !self.failures.is_empty() {
            parts.push(format!("failures={}", self.failures.len()));
        }
        parts.join(", ")
    }
}

/// One date row of the integrated calendar grid: one optional cell per
/// cohort, in roster order.
#[derive(Debug, Clone)]
pub struct GridRow {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub holiday: Option<String>,
    pub cells: Vec<Option<GridCell>>,
    pub conflicted: bool,
}

#[derive(Debug, Clone)]
pub struct GridCell {
    pub subject: String,
    pub instructor: String,
    pub conflicted: bool,
}

/// The whole application state: every cohort plus the shared holiday
/// calendar. Mutations recompute every cohort's derived schedule; the data
/// volumes are small enough that recompute-the-world beats incremental
/// invalidation.
#[derive(Debug)]
pub struct Roster {
    cohorts: Vec<Cohort>,
    calendar: TrainingCalendar,
}

impl Roster {
    pub fn new() -> Self {
        Self::with_calendar(TrainingCalendar::default())
    }

    pub fn with_calendar(calendar: TrainingCalendar) -> Self {
        Self {
            cohorts: Vec::new(),
            calendar,
        }
    }

    /// Rebuild a roster wholesale (the load path). Duplicate cohort ids
    /// reject the whole collection; individual scheduling failures are
    /// reported in the summary without discarding the other cohorts.
    pub(crate) fn from_parts(
        calendar: TrainingCalendar,
        cohorts: Vec<Cohort>,
    ) -> Result<(Self, RecomputeSummary), ScheduleError> {
        cohort_validation::validate_cohort_collection(&cohorts)?;
        let mut roster = Self { cohorts, calendar };
        let summary = roster.recompute_all();
        Ok((roster, summary))
    }

    pub fn calendar(&self) -> &TrainingCalendar {
        &self.calendar
    }

    pub fn cohorts(&self) -> &[Cohort] {
        &self.cohorts
    }

    pub fn find_cohort(&self, id: &str) -> Option<&Cohort> {
        self.cohorts.iter().find(|cohort| cohort.id() == id)
    }

    pub fn add_cohort(&mut self, cohort: Cohort) -> Result<RecomputeSummary, ScheduleError> {
        cohort_validation::validate_cohort_id(cohort.id())?;
        if self.find_cohort(cohort.id()).is_some() {
            return Err(ScheduleError::Computation(format!(
                "duplicate cohort id '{}'",
                cohort.id()
            )));
        }
        self.cohorts.push(cohort);
        Ok(self.recompute_all())
    }

    pub fn delete_cohort(&mut self, id: &str) -> bool {
        let before = self.cohorts.len();
        self.cohorts.retain(|cohort| cohort.id() != id);
        let deleted = self.cohorts.len() < before;
        if deleted {
            self.recompute_all();
        }
        deleted
    }

    /// Duplicate an existing cohort under a new id; the copy keeps the start
    /// date, weekend flag, and curriculum of the source.
    pub fn clone_cohort(
        &mut self,
        id: &str,
        new_id: impl Into<String>,
    ) -> Result<bool, ScheduleError> {
        let new_id = new_id.into();
        if self.find_cohort(&new_id).is_some() {
            return Err(ScheduleError::Computation(format!(
                "duplicate cohort id '{new_id}'"
            )));
        }
        let Some(source) = self.find_cohort(id) else {
            return Ok(false);
        };

        let mut metadata = source.metadata().clone();
        metadata.id = new_id;
        metadata.name = format!("{} (copy)", source.name());
        let items = source.curriculum()?;
        let copy = Cohort::with_curriculum(metadata, items)?;

        self.cohorts.push(copy);
        self.recompute_all();
        Ok(true)
    }

    pub fn set_cohort_start_date(
        &mut self,
        id: &str,
        date: NaiveDate,
    ) -> Result<bool, ScheduleError> {
        let Some(cohort) = self.cohorts.iter_mut().find(|cohort| cohort.id() == id) else {
            return Ok(false);
        };
        cohort.set_start_date(date);
        self.recompute_all();
        Ok(true)
    }

    pub fn set_cohort_include_weekends(
        &mut self,
        id: &str,
        include_weekends: bool,
    ) -> Result<bool, ScheduleError> {
        let Some(cohort) = self.cohorts.iter_mut().find(|cohort| cohort.id() == id) else {
            return Ok(false);
        };
        cohort.set_include_weekends(include_weekends);
        self.recompute_all();
        Ok(true)
    }

    pub fn set_cohort_curriculum(
        &mut self,
        id: &str,
        items: Vec<CurriculumItem>,
    ) -> Result<bool, ScheduleError> {
        let Some(cohort) = self.cohorts.iter_mut().find(|cohort| cohort.id() == id) else {
            return Ok(false);
        };
        cohort.set_curriculum(items)?;
        self.recompute_all();
        Ok(true)
    }

    pub fn push_cohort_item(
        &mut self,
        id: &str,
        item: CurriculumItem,
    ) -> Result<bool, ScheduleError> {
        let Some(cohort) = self.cohorts.iter_mut().find(|cohort| cohort.id() == id) else {
            return Ok(false);
        };
        cohort.push_item(item)?;
        self.recompute_all();
        Ok(true)
    }

    /// Add a holiday to the shared calendar and recompute every cohort.
    pub fn add_holiday(&mut self, holiday: Holiday) -> RecomputeSummary {
        self.calendar.add_holiday(holiday);
        self.recompute_all()
    }

    /// Recompute every cohort's derived schedule from scratch. Cohorts are
    /// independent of each other, so the passes fan out in parallel; a
    /// failing cohort is reported without blocking the rest.
    pub fn recompute_all(&mut self) -> RecomputeSummary {
        let calendar = &self.calendar;
        let outcomes: Vec<Result<CohortSummary, CohortFailure>> = self
            .cohorts
            .par_iter_mut()
            .map(|cohort| {
                let cohort_id = cohort.id().to_string();
                cohort
                    .reschedule(calendar)
                    .map_err(|error| CohortFailure { cohort_id, error })
            })
            .collect();

        let mut summary = RecomputeSummary::default();
        for outcome in outcomes {
            match outcome {
                Ok(cohort_summary) => summary.rescheduled.push(cohort_summary),
                Err(failure) => {
                    log::warn!(
                        "cohort '{}' failed to reschedule: {}",
                        failure.cohort_id,
                        failure.error
                    );
                    summary.failures.push(failure);
                }
            }
        }
        summary
    }

    /// Sorted distinct instructor names across every cohort's curriculum.
    pub fn instructors(&self) -> Result<Vec<String>, ScheduleError> {
        let mut names = Vec::new();
        for cohort in &self.cohorts {
            for item in cohort.curriculum()? {
                names.push(item.instructor);
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }

    pub fn instructor_counts(
        &self,
        date: NaiveDate,
    ) -> Result<HashMap<String, usize>, ScheduleError> {
        Ok(conflicts::instructor_counts(&self.cohorts, date)?)
    }

    pub fn conflicts(&self) -> Result<ConflictScan, ScheduleError> {
        Ok(conflicts::scan_conflicts(&self.cohorts)?)
    }

    /// Earliest assigned day and latest assigned day across all cohorts.
    pub fn date_range(&self) -> Result<Option<(NaiveDate, NaiveDate)>, ScheduleError> {
        let mut range: Option<(NaiveDate, NaiveDate)> = None;
        for cohort in &self.cohorts {
            let (Some(first), Some(last)) = (
                cohort.first_training_day()?,
                cohort.last_training_day()?,
            ) else {
                continue;
            };
            range = Some(match range {
                Some((start, end)) => (start.min(first), end.max(last)),
                None => (first, last),
            });
        }
        Ok(range)
    }

    /// Build the integrated date-by-cohort grid covering every calendar day
    /// between the earliest start and the latest end, including holiday and
    /// weekend rows with no assignments.
    pub fn schedule_grid(&self) -> Result<Vec<GridRow>, ScheduleError> {
        let Some((start, end)) = self.date_range()? else {
            return Ok(Vec::new());
        };

        let mut lookups: Vec<HashMap<NaiveDate, ScheduleEntry>> =
            Vec::with_capacity(self.cohorts.len());
        for cohort in &self.cohorts {
            let by_date = cohort
                .flat_schedule()?
                .into_iter()
                .map(|entry| (entry.date, entry))
                .collect();
            lookups.push(by_date);
        }

        let mut rows = Vec::new();
        let mut current = start;
        while current <= end {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for by_date in &lookups {
                if let Some(entry) = by_date.get(&current) {
                    *counts.entry(entry.instructor.as_str()).or_insert(0) += 1;
                }
            }

            let mut conflicted = false;
            let cells: Vec<Option<GridCell>> = lookups
                .iter()
                .map(|by_date| {
                    by_date.get(&current).map(|entry| {
                        let cell_conflicted =
                            counts.get(entry.instructor.as_str()).copied().unwrap_or(0) > 1;
                        conflicted |= cell_conflicted;
                        GridCell {
                            subject: entry.subject.clone(),
                            instructor: entry.instructor.clone(),
                            conflicted: cell_conflicted,
                        }
                    })
                })
                .collect();

            rows.push(GridRow {
                date: current,
                weekday: current.weekday(),
                holiday: self.calendar.holiday_name(current).map(str::to_string),
                cells,
                conflicted,
            });
            current = current + Duration::days(1);
        }

        Ok(rows)
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}
