use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Calendar days scanned before a placement is considered runaway (~10 years).
pub const MAX_SCAN_DAYS: i64 = 3_653;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleError {
    InvalidDuration { input: String },
    InvalidDate { input: String },
    UnboundedSchedule {
        start: NaiveDate,
        duration_days: i64,
        scanned_days: i64,
    },
    EmptyCurriculum,
    Computation(String),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::InvalidDuration { input } => write!(
                f,
                "invalid duration '{input}': curriculum durations must be positive whole days"
            ),
            ScheduleError::InvalidDate { input } => {
                write!(f, "invalid date '{input}': expected YYYY-MM-DD")
            }
            ScheduleError::UnboundedSchedule {
                start,
                duration_days,
                scanned_days,
            } => write!(
                f,
                "schedule starting {start} failed to place {duration_days} training days within {scanned_days} scanned calendar days"
            ),
            ScheduleError::EmptyCurriculum => {
                write!(f, "curriculum contained no schedulable items")
            }
            ScheduleError::Computation(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ScheduleError {}

impl From<polars::prelude::PolarsError> for ScheduleError {
    fn from(value: polars::prelude::PolarsError) -> Self {
        ScheduleError::Computation(value.to_string())
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| ScheduleError::InvalidDate {
        input: input.trim().to_string(),
    })
}

/// Result of one day-skip placement walk.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedDays {
    pub dates: Vec<NaiveDate>,
    pub last_date: NaiveDate,
}

/// Holiday calendar shared by every cohort. Weekend handling stays per-cohort
/// (the `include_weekends` flag), so only holidays live here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingCalendar {
    holidays: Vec<Holiday>,
    custom: Vec<Holiday>,
    dates: HashSet<NaiveDate>,
    has_defaults: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingCalendarConfig {
    include_defaults: bool,
    custom_holidays: Vec<Holiday>,
}

impl Default for TrainingCalendar {
    fn default() -> Self {
        Self::with_default_holidays()
    }
}

impl TrainingCalendar {
    /// Calendar seeded with the fixed default holiday list (Korean public
    /// holidays, 2025-2026).
    pub fn with_default_holidays() -> Self {
        let mut calendar = Self::empty();
        calendar.has_defaults = true;
        for holiday in default_holidays() {
            calendar.dates.insert(holiday.date);
            calendar.holidays.push(holiday);
        }
        calendar
    }

    /// Calendar with no default entries.
    pub fn empty() -> Self {
        Self {
            holidays: Vec::new(),
            custom: Vec::new(),
            dates: HashSet::new(),
            has_defaults: false,
        }
    }

    /// Calendar containing only the given holidays (no defaults).
    pub fn custom<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = Holiday>,
    {
        let mut calendar = Self::empty();
        for holiday in holidays {
            calendar.add_holiday(holiday);
        }
        calendar
    }

    pub fn from_config(config: &TrainingCalendarConfig) -> Self {
        let mut calendar = if config.include_defaults {
            Self::with_default_holidays()
        } else {
            Self::empty()
        };
        for holiday in &config.custom_holidays {
            calendar.add_holiday(holiday.clone());
        }
        calendar
    }

    pub fn to_config(&self) -> TrainingCalendarConfig {
        TrainingCalendarConfig {
            include_defaults: self.has_defaults,
            custom_holidays: self.custom.clone(),
        }
    }

    /// Append a user-added holiday. Duplicate dates are tolerated; name
    /// lookup keeps returning the earliest entry for the date.
    pub fn add_holiday(&mut self, holiday: Holiday) {
        self.dates.insert(holiday.date);
        self.custom.push(holiday.clone());
        self.holidays.push(holiday);
    }

    pub fn add_holidays<I>(&mut self, holidays: I)
    where
        I: IntoIterator<Item = Holiday>,
    {
        for holiday in holidays {
            self.add_holiday(holiday);
        }
    }

    /// All holidays in insertion order: defaults first, then user additions.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn custom_holidays(&self) -> &[Holiday] {
        &self.custom
    }

    pub fn has_default_holidays(&self) -> bool {
        self.has_defaults
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Name of the holiday on `date`. First entry wins when several share a
    /// date.
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.holidays
            .iter()
            .find(|holiday| holiday.date == date)
            .map(|holiday| holiday.name.as_str())
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Whether `date` counts toward a curriculum duration.
    pub fn is_training_day(&self, date: NaiveDate, include_weekends: bool) -> bool {
        if self.is_holiday(date) {
            return false;
        }
        if !include_weekends && Self::is_weekend(date) {
            return false;
        }
        true
    }

    /// Walk forward from `start` one calendar day at a time, assigning days
    /// that are neither holidays nor (when excluded) weekends, until exactly
    /// `duration_days` have been placed. `last_date` is the final assigned
    /// day. The walk aborts once `MAX_SCAN_DAYS` calendar days have been
    /// scanned without completing the placement.
    pub fn place_days(
        &self,
        start: NaiveDate,
        duration_days: i64,
        include_weekends: bool,
    ) -> Result<PlacedDays, ScheduleError> {
        if duration_days < 1 {
            return Err(ScheduleError::InvalidDuration {
                input: duration_days.to_string(),
            });
        }

        let mut dates = Vec::with_capacity(duration_days as usize);
        let mut current = start;
        let mut scanned: i64 = 0;

        while (dates.len() as i64) < duration_days {
            if scanned >= MAX_SCAN_DAYS {
                return Err(ScheduleError::UnboundedSchedule {
                    start,
                    duration_days,
                    scanned_days: scanned,
                });
            }

            if self.is_training_day(current, include_weekends) {
                dates.push(current);
            }
            scanned += 1;

            if (dates.len() as i64) < duration_days {
                current = current + Duration::days(1);
            }
        }

        // The cursor only advances while days remain, so it ends on the
        // final assigned date.
        Ok(PlacedDays {
            dates,
            last_date: current,
        })
    }
}

impl TrainingCalendarConfig {
    pub fn new(include_defaults: bool, custom_holidays: Vec<Holiday>) -> Self {
        Self {
            include_defaults,
            custom_holidays,
        }
    }

    pub fn include_defaults(&self) -> bool {
        self.include_defaults
    }

    pub fn custom_holidays(&self) -> &[Holiday] {
        &self.custom_holidays
    }
}

/// Korean public holidays for 2025-2026. Lunar holidays shift every year, so
/// the list is maintained by hand rather than derived.
fn default_holidays() -> Vec<Holiday> {
    let entries: [(i32, u32, u32, &str); 26] = [
        (2025, 1, 1, "New Year's Day"),
        (2025, 1, 28, "Seollal holiday"),
        (2025, 1, 29, "Seollal"),
        (2025, 1, 30, "Seollal holiday"),
        (2025, 3, 1, "Independence Movement Day"),
        (2025, 5, 5, "Children's Day"),
        (2025, 5, 6, "Buddha's Birthday"),
        (2025, 6, 6, "Memorial Day"),
        (2025, 8, 15, "Liberation Day"),
        (2025, 10, 3, "National Foundation Day"),
        (2025, 10, 9, "Hangul Day"),
        (2025, 12, 25, "Christmas Day"),
        (2026, 1, 1, "New Year's Day"),
        (2026, 2, 16, "Seollal holiday"),
        (2026, 2, 17, "Seollal"),
        (2026, 2, 18, "Seollal holiday"),
        (2026, 3, 1, "Independence Movement Day"),
        (2026, 5, 5, "Children's Day"),
        (2026, 5, 24, "Buddha's Birthday"),
        (2026, 6, 6, "Memorial Day"),
        (2026, 8, 15, "Liberation Day"),
        (2026, 9, 24, "Chuseok holiday"),
        (2026, 9, 25, "Chuseok"),
        (2026, 9, 26, "Chuseok holiday"),
        (2026, 10, 3, "National Foundation Day"),
        (2026, 10, 9, "Hangul Day"),
    ];

    entries
        .into_iter()
        .map(|(year, month, day, name)| {
            Holiday::new(
                NaiveDate::from_ymd_opt(year, month, day).expect("valid default holiday date"),
                name,
            )
        })
        .collect()
}
