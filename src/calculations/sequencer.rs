use crate::calendar::{ScheduleError, TrainingCalendar};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;

/// Computed placement for one curriculum row.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPlacement {
    pub row: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub assigned_dates: Vec<NaiveDate>,
}

/// Sequential placement engine: walks curriculum rows in declared order and
/// places each one with the calendar's day-skip walk. The next item always
/// starts the day after the previous item's last assigned day, even when that
/// day is itself a holiday or weekend (the walk skips it while placing the
/// first day).
pub struct SequentialPass<'a> {
    df: &'a DataFrame,
    calendar: &'a TrainingCalendar,
    include_weekends: bool,
}

impl<'a> SequentialPass<'a> {
    pub fn new(df: &'a DataFrame, calendar: &'a TrainingCalendar, include_weekends: bool) -> Self {
        Self {
            df,
            calendar,
            include_weekends,
        }
    }

    pub fn execute(&self, cohort_start: NaiveDate) -> Result<Vec<ItemPlacement>, ScheduleError> {
        let durations = self.df.column("duration_days")?.i64()?;
        let height = self.df.height();

        let mut placements = Vec::with_capacity(height);
        let mut current_start = cohort_start;

        for row in 0..height {
            let duration = durations.get(row).unwrap_or(0);
            let placed =
                self.calendar
                    .place_days(current_start, duration, self.include_weekends)?;

            current_start = placed.last_date + Duration::days(1);

            let start_date = placed.dates[0];
            placements.push(ItemPlacement {
                row,
                start_date,
                end_date: placed.last_date,
                assigned_dates: placed.dates,
            });
        }

        Ok(placements)
    }
}
