use chrono::NaiveDate;
use cohort_scheduler::calendar::{Holiday, ScheduleError, TrainingCalendar, parse_date};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn default_calendar_contains_fixed_holidays() {
    let cal = TrainingCalendar::default();
    assert!(cal.is_holiday(d(2025, 1, 1)));
    assert!(cal.is_holiday(d(2025, 5, 5)));
    assert!(cal.is_holiday(d(2026, 9, 25)));
    assert_eq!(cal.holiday_name(d(2025, 5, 5)), Some("Children's Day"));
    // 2025-01-02 is a plain Thursday
    assert!(!cal.is_holiday(d(2025, 1, 2)));
}

#[test]
fn weekends_skip_only_when_excluded() {
    let cal = TrainingCalendar::empty();
    let sat = d(2025, 1, 4);
    let sun = d(2025, 1, 5);
    assert!(!cal.is_training_day(sat, false));
    assert!(!cal.is_training_day(sun, false));
    assert!(cal.is_training_day(sat, true));
    assert!(cal.is_training_day(sun, true));
}

#[test]
fn holidays_skip_regardless_of_weekend_flag() {
    let cal = TrainingCalendar::custom(vec![Holiday::new(d(2025, 1, 6), "Founding Day")]);
    assert!(!cal.is_training_day(d(2025, 1, 6), true));
    assert!(!cal.is_training_day(d(2025, 1, 6), false));
}

#[test]
fn place_days_matches_worked_example() {
    // Thursday start, five training days, weekends excluded, one holiday on
    // the following Monday.
    let cal = TrainingCalendar::custom(vec![Holiday::new(d(2025, 5, 5), "Children's Day")]);
    let placed = cal.place_days(d(2025, 5, 1), 5, false).unwrap();

    assert_eq!(
        placed.dates,
        vec![
            d(2025, 5, 1),
            d(2025, 5, 2),
            d(2025, 5, 6),
            d(2025, 5, 7),
            d(2025, 5, 8),
        ]
    );
    assert_eq!(placed.last_date, d(2025, 5, 8));
}

#[test]
fn place_days_is_contiguous_without_skips() {
    let cal = TrainingCalendar::empty();
    let placed = cal.place_days(d(2025, 2, 1), 7, true).unwrap();

    let expected: Vec<NaiveDate> = (1..=7).map(|day| d(2025, 2, day)).collect();
    assert_eq!(placed.dates, expected);
    assert_eq!(placed.last_date, d(2025, 2, 7));
}

#[test]
fn place_days_always_assigns_exactly_duration_days() {
    let mut cal = TrainingCalendar::empty();
    cal.add_holidays(vec![
        Holiday::new(d(2025, 1, 8), "Midweek break"),
        Holiday::new(d(2025, 1, 9), "Midweek break"),
        Holiday::new(d(2025, 1, 15), "Another"),
    ]);

    for duration in 1..=12 {
        let placed = cal.place_days(d(2025, 1, 6), duration, false).unwrap();
        assert_eq!(placed.dates.len() as i64, duration);
        for date in &placed.dates {
            assert!(cal.is_training_day(*date, false));
        }
        assert_eq!(*placed.dates.last().unwrap(), placed.last_date);
    }
}

#[test]
fn place_days_rejects_zero_and_negative_durations() {
    let cal = TrainingCalendar::empty();
    for duration in [0, -1, -30] {
        let err = cal.place_days(d(2025, 1, 6), duration, true).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDuration { .. }));
    }
}

#[test]
fn duplicate_holiday_names_resolve_to_first_entry() {
    let mut cal = TrainingCalendar::custom(vec![Holiday::new(d(2025, 7, 1), "Founding Day")]);
    cal.add_holiday(Holiday::new(d(2025, 7, 1), "Summer Break"));

    assert_eq!(cal.holiday_name(d(2025, 7, 1)), Some("Founding Day"));
    assert_eq!(cal.holidays().len(), 2);
}

#[test]
fn parse_date_accepts_iso_and_rejects_everything_else() {
    assert_eq!(parse_date("2025-05-01").unwrap(), d(2025, 5, 1));
    assert_eq!(parse_date(" 2025-05-01 ").unwrap(), d(2025, 5, 1));

    for input in ["2025/05/01", "01-05-2025", "2025-13-01", "soon", ""] {
        let err = parse_date(input).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDate { .. }), "{input}");
    }
}

#[test]
fn config_round_trip_preserves_custom_holidays() {
    let mut cal = TrainingCalendar::with_default_holidays();
    cal.add_holiday(Holiday::new(d(2025, 7, 14), "Workshop Day"));

    let config = cal.to_config();
    assert!(config.include_defaults());
    assert_eq!(config.custom_holidays().len(), 1);

    let recreated = TrainingCalendar::from_config(&config);
    assert_eq!(recreated.to_config(), config);
    assert!(recreated.is_holiday(d(2025, 7, 14)));
    assert!(recreated.is_holiday(d(2025, 1, 1)));
}
