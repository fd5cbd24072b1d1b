use crate::calendar::ScheduleError;
use crate::cohort::Cohort;
use crate::curriculum::CurriculumItem;
use std::collections::HashSet;

pub fn validate_item(item: &CurriculumItem) -> Result<(), ScheduleError> {
    if item.duration_days < 1 {
        return Err(ScheduleError::InvalidDuration {
            input: item.duration_days.to_string(),
        });
    }
    if item.subject.trim().is_empty() {
        return Err(ScheduleError::Computation(
            "curriculum item requires a non-empty subject".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_curriculum(items: &[CurriculumItem]) -> Result<(), ScheduleError> {
    for item in items {
        validate_item(item)?;
    }
    Ok(())
}

pub fn validate_cohort_id(id: &str) -> Result<(), ScheduleError> {
    if id.trim().is_empty() {
        return Err(ScheduleError::Computation(
            "cohort requires a non-empty id".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_cohort_collection(cohorts: &[Cohort]) -> Result<(), ScheduleError> {
    let mut seen_ids = HashSet::with_capacity(cohorts.len());
    for cohort in cohorts {
        validate_cohort_id(cohort.id())?;
        if !seen_ids.insert(cohort.id().to_string()) {
            return Err(ScheduleError::Computation(format!(
                "duplicate cohort id '{}'",
                cohort.id()
            )));
        }
    }
    Ok(())
}
