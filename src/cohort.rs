use crate::calculations::sequencer::SequentialPass;
use crate::calendar::{ScheduleError, TrainingCalendar};
use crate::cohort_validation;
use crate::curriculum::CurriculumItem;
use crate::metadata::CohortMetadata;
use chrono::NaiveDate;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One concrete training-day assignment in a cohort's flat schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub subject: String,
    pub instructor: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortSummary {
    pub cohort_id: String,
    pub item_count: usize,
    pub training_days: usize,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
}

impl CohortSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("cohort={}", self.cohort_id));
        parts.push(format!("items={}", self.item_count));
        parts.push(format!("days={}", self.training_days));
        if let Some(date) = self.first_day {
            parts.push(format!("start={}", date));
        }
        if let Some(date) = self.last_day {
            parts.push(format!("finish={}", date));
        }
        parts.join(", ")
    }
}

/// A cohort: metadata plus its curriculum table. Items live in a DataFrame,
/// one row per subject block, in declared order; rescheduling writes the
/// derived date columns back in place.
#[derive(Debug)]
pub struct Cohort {
    metadata: CohortMetadata,
    df: DataFrame,
}

impl Cohort {
    pub fn new(metadata: CohortMetadata) -> Self {
        let schema = Self::default_schema();
        Self {
            metadata,
            df: DataFrame::empty_with_schema(&schema),
        }
    }

    pub fn with_curriculum(
        metadata: CohortMetadata,
        items: Vec<CurriculumItem>,
    ) -> Result<Self, ScheduleError> {
        let mut cohort = Self::new(metadata);
        cohort.set_curriculum(items)?;
        Ok(cohort)
    }

    fn default_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("subject".into(), DataType::String),
            Field::new("instructor".into(), DataType::String),
            Field::new("duration_days".into(), DataType::Int64),
            Field::new("start_date".into(), DataType::Date),
            Field::new("end_date".into(), DataType::Date),
            Field::new(
                "assigned_dates".into(),
                DataType::List(Box::new(DataType::Date)),
            ),
        ])
    }

    pub fn metadata(&self) -> &CohortMetadata {
        &self.metadata
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn start_date(&self) -> NaiveDate {
        self.metadata.start_date
    }

    pub fn include_weekends(&self) -> bool {
        self.metadata.include_weekends
    }

    pub fn set_start_date(&mut self, date: NaiveDate) {
        self.metadata.start_date = date;
    }

    pub fn set_include_weekends(&mut self, include_weekends: bool) {
        self.metadata.include_weekends = include_weekends;
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn curriculum(&self) -> Result<Vec<CurriculumItem>, PolarsError> {
        let mut items = Vec::with_capacity(self.df.height());
        for idx in 0..self.df.height() {
            items.push(CurriculumItem::from_dataframe_row(&self.df, idx)?);
        }
        Ok(items)
    }

    /// Replace the whole curriculum. Derived fields on the incoming items are
    /// kept as-is; the next reschedule overwrites them.
    pub fn set_curriculum(&mut self, items: Vec<CurriculumItem>) -> Result<(), ScheduleError> {
        cohort_validation::validate_curriculum(&items)?;
        let mut df = DataFrame::empty_with_schema(&Self::default_schema());
        for item in &items {
            let row = item.to_dataframe_row()?;
            df = df.vstack(&row)?;
        }
        self.df = df;
        Ok(())
    }

    /// Append a single curriculum item at the end of the declared order.
    pub fn push_item(&mut self, item: CurriculumItem) -> Result<(), ScheduleError> {
        cohort_validation::validate_item(&item)?;
        let row = item.to_dataframe_row()?;
        self.df = self.df.vstack(&row)?;
        Ok(())
    }

    /// Run the sequential placement pass and persist the derived date
    /// columns. Recomputes every item from scratch; the result depends only
    /// on (start_date, include_weekends, curriculum, calendar).
    pub fn reschedule(&mut self, calendar: &TrainingCalendar) -> Result<CohortSummary, ScheduleError> {
        let height = self.df.height();
        if height == 0 {
            return Ok(CohortSummary {
                cohort_id: self.metadata.id.clone(),
                item_count: 0,
                training_days: 0,
                first_day: None,
                last_day: None,
            });
        }

        let pass = SequentialPass::new(&self.df, calendar, self.metadata.include_weekends);
        let placements = pass.execute(self.metadata.start_date)?;

        let mut start_vals: Vec<Option<i32>> = vec![None; height];
        let mut end_vals: Vec<Option<i32>> = vec![None; height];
        let mut assigned_rows: Vec<Series> = Vec::with_capacity(height);
        let mut training_days = 0usize;

        for placement in &placements {
            start_vals[placement.row] = Some(CurriculumItem::date_to_i32(placement.start_date));
            end_vals[placement.row] = Some(CurriculumItem::date_to_i32(placement.end_date));
            training_days += placement.assigned_dates.len();
            assigned_rows.push(CurriculumItem::inner_date_series(&placement.assigned_dates)?);
        }

        let start_series = Series::new(PlSmallStr::from_static("start_date"), start_vals)
            .cast(&DataType::Date)?;
        let end_series =
            Series::new(PlSmallStr::from_static("end_date"), end_vals).cast(&DataType::Date)?;
        self.df.replace("start_date", start_series)?;
        self.df.replace("end_date", end_series)?;

        let list_chunked: ListChunked = assigned_rows.into_iter().collect();
        self.df.replace("assigned_dates", list_chunked.into_series())?;

        let first_day = placements
            .first()
            .and_then(|placement| placement.assigned_dates.first())
            .copied();
        let last_day = placements.last().map(|placement| placement.end_date);

        log::debug!(
            "rescheduled cohort '{}': {} items over {} training days",
            self.metadata.id,
            height,
            training_days
        );

        Ok(CohortSummary {
            cohort_id: self.metadata.id.clone(),
            item_count: height,
            training_days,
            first_day,
            last_day,
        })
    }

    /// Flat chronological schedule across all items. Items are stored in
    /// declared order and dates increase monotonically, so row order is
    /// already chronological.
    pub fn flat_schedule(&self) -> Result<Vec<ScheduleEntry>, PolarsError> {
        let mut entries = Vec::new();
        for item in self.curriculum()? {
            for date in &item.assigned_dates {
                entries.push(ScheduleEntry {
                    date: *date,
                    subject: item.subject.clone(),
                    instructor: item.instructor.clone(),
                });
            }
        }
        Ok(entries)
    }

    /// First assigned training day, if the cohort has been scheduled.
    pub fn first_training_day(&self) -> Result<Option<NaiveDate>, PolarsError> {
        Ok(self
            .flat_schedule()?
            .first()
            .map(|entry| entry.date))
    }

    /// Last assigned training day, if the cohort has been scheduled.
    pub fn last_training_day(&self) -> Result<Option<NaiveDate>, PolarsError> {
        Ok(self.flat_schedule()?.last().map(|entry| entry.date))
    }
}
