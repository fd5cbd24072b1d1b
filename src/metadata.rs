use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortMetadata {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub include_weekends: bool,
}

impl CohortMetadata {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_date: NaiveDate,
        include_weekends: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date,
            include_weekends,
        }
    }
}

impl Default for CohortMetadata {
    fn default() -> Self {
        Self {
            id: "cohort-1".to_string(),
            name: "New Cohort".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            include_weekends: false,
        }
    }
}
