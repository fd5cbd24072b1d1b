pub mod calculations;
pub mod calendar;
pub mod cohort;
pub(crate) mod cohort_validation;
pub mod curriculum;
pub mod metadata;
pub mod persistence;
pub mod roster;

pub use calculations::conflicts::{
    ConflictScan, InstructorConflict, instructor_counts, scan_conflicts,
};
pub use calendar::{
    Holiday, MAX_SCAN_DAYS, PlacedDays, ScheduleError, TrainingCalendar, TrainingCalendarConfig,
    parse_date,
};
pub use cohort::{Cohort, CohortSummary, ScheduleEntry};
pub use curriculum::{CurriculumItem, parse_curriculum};
pub use metadata::CohortMetadata;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteRosterStore;
pub use persistence::{
    PersistenceError, RosterStore, export_grid_to_csv, load_roster_from_json, save_roster_to_json,
    validate_roster,
};
pub use roster::{CohortFailure, GridCell, GridRow, RecomputeSummary, Roster};
