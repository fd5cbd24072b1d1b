use crate::calendar::ScheduleError;
use chrono::{Duration, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One subject block within a cohort's curriculum. The derived fields are
/// populated by rescheduling and cleared/ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumItem {
    pub subject: String,
    pub instructor: String,
    pub duration_days: i64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_dates: Vec<NaiveDate>,
}

impl CurriculumItem {
    pub fn new(
        subject: impl Into<String>,
        instructor: impl Into<String>,
        duration_days: i64,
    ) -> Self {
        Self {
            subject: subject.into(),
            instructor: instructor.into(),
            duration_days,
            start_date: None,
            end_date: None,
            assigned_dates: Vec::new(),
        }
    }

    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(6);

        let subject_data: [&str; 1] = [self.subject.as_str()];
        columns.push(Series::new(PlSmallStr::from_static("subject"), subject_data).into_column());

        let instructor_data: [&str; 1] = [self.instructor.as_str()];
        columns.push(
            Series::new(PlSmallStr::from_static("instructor"), instructor_data).into_column(),
        );

        let duration_data: [i64; 1] = [self.duration_days];
        columns.push(
            Series::new(PlSmallStr::from_static("duration_days"), duration_data).into_column(),
        );

        columns.push(Self::series_from_date("start_date", self.start_date)?.into_column());
        columns.push(Self::series_from_date("end_date", self.end_date)?.into_column());
        columns.push(
            Self::series_from_date_list("assigned_dates", &self.assigned_dates)?.into_column(),
        );

        DataFrame::new(columns)
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let subject = df
            .column("subject")?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let instructor = df
            .column("instructor")?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let duration_days = df.column("duration_days")?.i64()?.get(row_idx).unwrap_or(0);

        let assigned_dates =
            Self::vec_from_date_list(df.column("assigned_dates")?.list()?, row_idx)?;

        Ok(Self {
            subject,
            instructor,
            duration_days,
            start_date: Self::date_from_series(df.column("start_date")?.date()?, row_idx),
            end_date: Self::date_from_series(df.column("end_date")?.date()?, row_idx),
            assigned_dates,
        })
    }

    fn series_from_date(name: &str, date: Option<NaiveDate>) -> PolarsResult<Series> {
        let data: [Option<i32>; 1] = [date.map(Self::date_to_i32)];
        Series::new(name.into(), data).cast(&DataType::Date)
    }

    pub(crate) fn series_from_date_list(name: &str, dates: &[NaiveDate]) -> PolarsResult<Series> {
        let inner = Self::inner_date_series(dates)?;
        Ok(Series::new(name.into(), &[inner]))
    }

    pub(crate) fn inner_date_series(dates: &[NaiveDate]) -> PolarsResult<Series> {
        let days: Vec<i32> = dates.iter().copied().map(Self::date_to_i32).collect();
        Series::new(PlSmallStr::from_static(""), days).cast(&DataType::Date)
    }

    fn date_from_series(chunked: &DateChunked, row_idx: usize) -> Option<NaiveDate> {
        chunked.get(row_idx).map(Self::date_from_i32)
    }

    pub(crate) fn vec_from_date_list(
        list: &ListChunked,
        row_idx: usize,
    ) -> PolarsResult<Vec<NaiveDate>> {
        if let Some(series) = list.get_as_series(row_idx) {
            let chunked = series.date()?;
            let mut dates = Vec::with_capacity(chunked.len());
            for idx in 0..chunked.len() {
                if let Some(days) = chunked.get(idx) {
                    dates.push(Self::date_from_i32(days));
                }
            }
            Ok(dates)
        } else {
            Ok(Vec::new())
        }
    }

    pub(crate) fn date_to_i32(date: NaiveDate) -> i32 {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        (date - epoch).num_days() as i32
    }

    pub(crate) fn date_from_i32(days: i32) -> NaiveDate {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        epoch + Duration::days(days as i64)
    }
}

/// Parse curriculum text: one `subject, instructor, days` line per item.
/// Lines with fewer than three fields are ignored; a non-numeric or
/// non-positive day count is rejected.
pub fn parse_curriculum(text: &str) -> Result<Vec<CurriculumItem>, ScheduleError> {
    let mut items = Vec::new();
    for line in text.lines() {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            continue;
        }
        let duration_days: i64 =
            parts[2]
                .parse()
                .map_err(|_| ScheduleError::InvalidDuration {
                    input: parts[2].to_string(),
                })?;
        if duration_days < 1 {
            return Err(ScheduleError::InvalidDuration {
                input: parts[2].to_string(),
            });
        }
        items.push(CurriculumItem::new(parts[0], parts[1], duration_days));
    }
    if items.is_empty() {
        return Err(ScheduleError::EmptyCurriculum);
    }
    Ok(items)
}
