use super::{PersistenceError, PersistenceResult};
use crate::{
    Cohort, CohortMetadata, Roster,
    calendar::{Holiday, TrainingCalendar, TrainingCalendarConfig},
    curriculum::CurriculumItem,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

fn default_include_defaults() -> bool {
    true
}

#[derive(Serialize, Deserialize)]
struct CohortRecord {
    id: String,
    name: String,
    start_date: chrono::NaiveDate,
    include_weekends: bool,
    #[serde(default)]
    curriculum: Vec<CurriculumItem>,
}

impl CohortRecord {
    fn from_cohort(cohort: &Cohort) -> PersistenceResult<Self> {
        Ok(Self {
            id: cohort.id().to_string(),
            name: cohort.name().to_string(),
            start_date: cohort.start_date(),
            include_weekends: cohort.include_weekends(),
            curriculum: cohort.curriculum()?,
        })
    }

    fn into_cohort(self) -> PersistenceResult<Cohort> {
        let metadata =
            CohortMetadata::new(self.id, self.name, self.start_date, self.include_weekends);
        Ok(Cohort::with_curriculum(metadata, self.curriculum)?)
    }
}

/// Wholesale roster state: cohorts plus user-added holidays. Default
/// holidays are re-seeded on load rather than stored.
#[derive(Serialize, Deserialize)]
pub(crate) struct RosterSnapshot {
    #[serde(default = "default_include_defaults")]
    include_default_holidays: bool,
    #[serde(default)]
    custom_holidays: Vec<Holiday>,
    cohorts: Vec<CohortRecord>,
}

impl RosterSnapshot {
    pub(crate) fn from_roster(roster: &Roster) -> PersistenceResult<Self> {
        super::validate_roster(roster)?;
        let mut cohorts = Vec::with_capacity(roster.cohorts().len());
        for cohort in roster.cohorts() {
            cohorts.push(CohortRecord::from_cohort(cohort)?);
        }
        Ok(Self {
            include_default_holidays: roster.calendar().has_default_holidays(),
            custom_holidays: roster.calendar().custom_holidays().to_vec(),
            cohorts,
        })
    }

    pub(crate) fn into_roster(self) -> PersistenceResult<Roster> {
        let config =
            TrainingCalendarConfig::new(self.include_default_holidays, self.custom_holidays);
        let calendar = TrainingCalendar::from_config(&config);

        let mut cohorts = Vec::with_capacity(self.cohorts.len());
        for record in self.cohorts {
            cohorts.push(record.into_cohort()?);
        }

        let (roster, summary) = Roster::from_parts(calendar, cohorts)
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        if !summary.failures.is_empty() {
            log::warn!(
                "loaded roster with {} cohort(s) failing to schedule",
                summary.failures.len()
            );
        }
        Ok(roster)
    }
}

pub fn save_roster_to_json<P: AsRef<Path>>(roster: &Roster, path: P) -> PersistenceResult<()> {
    let snapshot = RosterSnapshot::from_roster(roster)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_roster_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Roster> {
    let file = File::open(path)?;
    let snapshot: RosterSnapshot = serde_json::from_reader(file)?;
    snapshot.into_roster()
}

/// Write the integrated calendar grid as CSV: one row per calendar day in
/// the covered range, one column per cohort, cells as `subject (instructor)`.
/// The layout matches the spreadsheet hand-off format.
pub fn export_grid_to_csv<P: AsRef<Path>>(roster: &Roster, path: P) -> PersistenceResult<()> {
    let grid = roster.schedule_grid()?;

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header = vec![
        "date".to_string(),
        "weekday".to_string(),
        "holiday".to_string(),
    ];
    header.extend(roster.cohorts().iter().map(|cohort| cohort.name().to_string()));
    writer.write_record(&header)?;

    for row in grid {
        let mut record = vec![
            row.date.format("%Y-%m-%d").to_string(),
            row.weekday.to_string(),
            row.holiday.clone().unwrap_or_default(),
        ];
        for cell in &row.cells {
            record.push(match cell {
                Some(cell) => format!("{} ({})", cell.subject, cell.instructor),
                None => String::new(),
            });
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
