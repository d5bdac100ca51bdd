pub mod course_service;
pub mod planning_service;

pub use course_service::CourseService;
pub use planning_service::PlanningService;

use crate::error::AppError;

/// Rejects values outside the 0-100 percentage scale.
pub fn ensure_percent(field: &str, value: f64) -> Result<(), AppError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("{} must be between 0 and 100", field)))
    }
}

pub fn ensure_present(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::BadRequest(format!("{} is required", field)))
    } else {
        Ok(())
    }
}
