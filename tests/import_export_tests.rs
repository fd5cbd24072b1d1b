use chrono::NaiveDate;
use cohort_scheduler::{
    Cohort, CohortMetadata, CurriculumItem, Holiday, Roster, TrainingCalendar,
    export_grid_to_csv, load_roster_from_json, save_roster_to_json,
};
use std::fs;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn build_sample_roster() -> Roster {
    let mut calendar = TrainingCalendar::with_default_holidays();
    calendar.add_holiday(Holiday::new(d(2025, 7, 14), "Workshop Day"));

    let mut roster = Roster::with_calendar(calendar);
    roster
        .add_cohort(
            Cohort::with_curriculum(
                CohortMetadata::new("kdt-7", "KDT 7th", d(2025, 1, 6), false),
                vec![
                    CurriculumItem::new("Rust Basics", "Kim", 5),
                    CurriculumItem::new("Databases", "Lee", 3),
                ],
            )
            .unwrap(),
        )
        .unwrap();
    roster
        .add_cohort(
            Cohort::with_curriculum(
                CohortMetadata::new("kdt-8", "KDT 8th", d(2025, 1, 8), true),
                vec![CurriculumItem::new("Web", "Park", 4)],
            )
            .unwrap(),
        )
        .unwrap();
    roster
}

#[test]
fn json_round_trip_preserves_roster() {
    let roster = build_sample_roster();
    let file = NamedTempFile::new().unwrap();

    save_roster_to_json(&roster, file.path()).unwrap();
    let loaded = load_roster_from_json(file.path()).unwrap();

    assert_eq!(loaded.cohorts().len(), roster.cohorts().len());
    for (original, reloaded) in roster.cohorts().iter().zip(loaded.cohorts()) {
        assert_eq!(original.metadata(), reloaded.metadata());
        // Derived fields are recomputed on load and must match exactly.
        assert_eq!(
            original.curriculum().unwrap(),
            reloaded.curriculum().unwrap()
        );
    }

    assert_eq!(
        loaded.calendar().to_config(),
        roster.calendar().to_config()
    );
    assert!(loaded.calendar().is_holiday(d(2025, 7, 14)));
}

#[test]
fn load_recomputes_schedules_against_the_stored_calendar() {
    let roster = build_sample_roster();
    let file = NamedTempFile::new().unwrap();
    save_roster_to_json(&roster, file.path()).unwrap();

    let loaded = load_roster_from_json(file.path()).unwrap();
    let cohort = loaded.find_cohort("kdt-7").unwrap();
    let items = cohort.curriculum().unwrap();
    assert_eq!(items[0].start_date, Some(d(2025, 1, 6)));
    assert_eq!(items[0].assigned_dates.len(), 5);
    // Second subject starts the day after the first ends.
    assert!(items[1].start_date.unwrap() > items[0].end_date.unwrap());
}

#[test]
fn json_load_rejects_duplicate_cohort_ids() {
    let file = NamedTempFile::new().unwrap();
    let payload = r#"{
        "cohorts": [
            {"id": "c1", "name": "A", "start_date": "2025-01-06", "include_weekends": false,
             "curriculum": [{"subject": "Rust", "instructor": "Kim", "duration_days": 2}]},
            {"id": "c1", "name": "B", "start_date": "2025-01-06", "include_weekends": false,
             "curriculum": [{"subject": "SQL", "instructor": "Lee", "duration_days": 2}]}
        ]
    }"#;
    fs::write(file.path(), payload).unwrap();

    let err = load_roster_from_json(file.path()).unwrap_err();
    assert!(err.to_string().contains("duplicate cohort id"));
}

#[test]
fn json_load_rejects_invalid_durations() {
    let file = NamedTempFile::new().unwrap();
    let payload = r#"{
        "cohorts": [
            {"id": "c1", "name": "A", "start_date": "2025-01-06", "include_weekends": false,
             "curriculum": [{"subject": "Rust", "instructor": "Kim", "duration_days": 0}]}
        ]
    }"#;
    fs::write(file.path(), payload).unwrap();

    let err = load_roster_from_json(file.path()).unwrap_err();
    assert!(err.to_string().contains("invalid duration"));
}

#[test]
fn csv_export_writes_grid_rows() {
    let roster = build_sample_roster();
    let file = NamedTempFile::new().unwrap();

    export_grid_to_csv(&roster, file.path()).unwrap();
    let contents = fs::read_to_string(file.path()).unwrap();
    let mut lines = contents.lines();

    let header = lines.next().unwrap();
    assert_eq!(header, "date,weekday,holiday,KDT 7th,KDT 8th");

    let first = lines.next().unwrap();
    assert!(first.starts_with("2025-01-06,Mon,"));
    assert!(first.contains("Rust Basics (Kim)"));

    // 2025-01-01 style defaults are outside the covered range, but weekend
    // rows inside it appear with empty cohort cells for kdt-7.
    assert!(contents.contains("2025-01-11,Sat,"));
}

#[cfg(feature = "sqlite")]
mod sqlite_store {
    use super::*;
    use cohort_scheduler::{RosterStore, SqliteRosterStore};

    #[test]
    fn sqlite_round_trip_preserves_state() {
        let file = NamedTempFile::new().unwrap();
        let store = SqliteRosterStore::new(file.path()).unwrap();

        assert!(store.load_roster().unwrap().is_none());

        let roster = build_sample_roster();
        store.save_roster(&roster).unwrap();

        let loaded = store.load_roster().unwrap().expect("stored roster");
        assert_eq!(loaded.cohorts().len(), 2);
        assert_eq!(
            loaded.calendar().to_config(),
            roster.calendar().to_config()
        );
        let cohort = loaded.find_cohort("kdt-8").unwrap();
        assert_eq!(cohort.curriculum().unwrap().len(), 1);
    }

    #[test]
    fn sqlite_save_overwrites_previous_state() {
        let file = NamedTempFile::new().unwrap();
        let store = SqliteRosterStore::new(file.path()).unwrap();

        let mut roster = build_sample_roster();
        store.save_roster(&roster).unwrap();

        roster.delete_cohort("kdt-7");
        store.save_roster(&roster).unwrap();

        let loaded = store.load_roster().unwrap().expect("stored roster");
        assert_eq!(loaded.cohorts().len(), 1);
        assert!(loaded.find_cohort("kdt-7").is_none());
    }
}
