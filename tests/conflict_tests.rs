use chrono::NaiveDate;
use cohort_scheduler::{
    Cohort, CohortMetadata, CurriculumItem, Holiday, Roster, TrainingCalendar,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn cohort(id: &str, start: NaiveDate, items: Vec<CurriculumItem>) -> Cohort {
    let metadata = CohortMetadata::new(id, id.to_uppercase(), start, false);
    Cohort::with_curriculum(metadata, items).unwrap()
}

fn roster_with(cohorts: Vec<Cohort>) -> Roster {
    let mut roster = Roster::with_calendar(TrainingCalendar::empty());
    for cohort in cohorts {
        roster.add_cohort(cohort).unwrap();
    }
    roster
}

#[test]
fn shared_instructor_on_same_date_is_a_conflict_for_both_cohorts() {
    // Both cohorts assign Kim starting Tuesday 2025-06-10.
    let roster = roster_with(vec![
        cohort(
            "p",
            d(2025, 6, 10),
            vec![CurriculumItem::new("Rust", "Kim", 3)],
        ),
        cohort(
            "q",
            d(2025, 6, 10),
            vec![CurriculumItem::new("SQL", "Kim", 2)],
        ),
    ]);

    let counts = roster.instructor_counts(d(2025, 6, 10)).unwrap();
    assert_eq!(counts.get("Kim"), Some(&2));

    let scan = roster.conflicts().unwrap();
    assert!(scan.has_conflicts);
    let conflict = scan
        .conflicts
        .iter()
        .find(|c| c.date == d(2025, 6, 10))
        .expect("conflict reported for 2025-06-10");
    assert_eq!(conflict.instructor, "Kim");
    assert!(conflict.cohort_ids.contains(&"p".to_string()));
    assert!(conflict.cohort_ids.contains(&"q".to_string()));
}

#[test]
fn distinct_instructors_do_not_conflict() {
    let roster = roster_with(vec![
        cohort(
            "p",
            d(2025, 6, 10),
            vec![CurriculumItem::new("Rust", "Kim", 3)],
        ),
        cohort(
            "q",
            d(2025, 6, 10),
            vec![CurriculumItem::new("SQL", "Lee", 3)],
        ),
    ]);

    let scan = roster.conflicts().unwrap();
    assert!(!scan.has_conflicts);
    assert!(scan.conflicts.is_empty());
}

#[test]
fn same_instructor_on_disjoint_dates_does_not_conflict() {
    let roster = roster_with(vec![
        cohort(
            "p",
            d(2025, 6, 9),
            vec![CurriculumItem::new("Rust", "Kim", 2)],
        ),
        cohort(
            "q",
            d(2025, 6, 11),
            vec![CurriculumItem::new("SQL", "Kim", 2)],
        ),
    ]);

    let scan = roster.conflicts().unwrap();
    assert!(!scan.has_conflicts);
}

#[test]
fn scan_covers_gap_dates_between_cohorts() {
    // Cohorts whose schedules straddle a holiday gap: the scan range spans
    // the full min-to-max window even though the gap day has no entries.
    let mut roster = Roster::with_calendar(TrainingCalendar::custom(vec![Holiday::new(
        d(2025, 6, 11),
        "Mid-week holiday",
    )]));
    roster
        .add_cohort(cohort(
            "p",
            d(2025, 6, 10),
            vec![CurriculumItem::new("Rust", "Kim", 2)],
        ))
        .unwrap();

    let grid = roster.schedule_grid().unwrap();
    // Tue 10, Wed 11 (holiday, no assignment), Thu 12.
    assert_eq!(grid.len(), 3);
    assert!(grid[1].cells.iter().all(|cell| cell.is_none()));
    assert_eq!(grid[1].holiday.as_deref(), Some("Mid-week holiday"));

    let counts = roster.instructor_counts(d(2025, 6, 11)).unwrap();
    assert!(counts.is_empty());
}

#[test]
fn conflict_spanning_multiple_days_reports_each_date() {
    let roster = roster_with(vec![
        cohort(
            "p",
            d(2025, 6, 9),
            vec![CurriculumItem::new("Rust", "Kim", 3)],
        ),
        cohort(
            "q",
            d(2025, 6, 10),
            vec![CurriculumItem::new("SQL", "Kim", 3)],
        ),
    ]);

    let scan = roster.conflicts().unwrap();
    assert!(scan.has_conflicts);
    // Overlap on Tue 10 and Wed 11.
    let dates: Vec<NaiveDate> = scan.conflicts.iter().map(|c| c.date).collect();
    assert_eq!(dates, vec![d(2025, 6, 10), d(2025, 6, 11)]);
}

#[test]
fn empty_roster_scans_clean() {
    let roster = Roster::with_calendar(TrainingCalendar::empty());
    let scan = roster.conflicts().unwrap();
    assert!(!scan.has_conflicts);
    assert!(scan.conflicts.is_empty());
    assert!(roster.schedule_grid().unwrap().is_empty());
}
