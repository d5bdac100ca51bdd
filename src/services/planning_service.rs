use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::ensure_percent;
use crate::db::repository;
use crate::error::AppError;
use crate::models::EventFilter;
use crate::models::study_override::MAX_CUSTOM_HOURS;
use crate::planner::{
    GradeGoals, GradePlan, StudyPlan, WeeklyTodoList, plan_grade_targets, rank_study_priorities,
    weekly_todos,
};

/// Loads snapshots from the database and hands them to the planner.
pub struct PlanningService {
    db: SqlitePool,
}

impl PlanningService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn study_plan(&self, today: NaiveDate, horizon_days: u32) -> Result<StudyPlan, AppError> {
        let events = repository::fetch_events(&self.db, &EventFilter::All).await?;
        let courses = repository::fetch_courses(&self.db).await?;
        let overrides: HashMap<String, f64> = repository::fetch_study_overrides(&self.db)
            .await?
            .into_iter()
            .map(|o| (o.key, o.hours))
            .collect();

        let plan = rank_study_priorities(&events, &courses, today, horizon_days, &overrides);
        debug!(
            "Study plan for {} (+{} days): {} items, {} hours",
            today,
            horizon_days,
            plan.recommendations.len(),
            plan.total_hours
        );
        Ok(plan)
    }

    pub async fn weekly_todos(&self, today: NaiveDate) -> Result<WeeklyTodoList, AppError> {
        let events = repository::fetch_events(&self.db, &EventFilter::All).await?;
        let courses = repository::fetch_courses(&self.db).await?;
        Ok(weekly_todos(&events, &courses, today))
    }

    pub async fn grade_plan(&self, course_id: &str, goals: GradeGoals) -> Result<GradePlan, AppError> {
        ensure_percent("target", goals.desired)?;
        if let Some(passing) = goals.passing {
            ensure_percent("passing", passing)?;
        }

        repository::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let categories = repository::fetch_grade_categories(&self.db, course_id).await?;
        Ok(plan_grade_targets(&categories, goals))
    }

    pub async fn set_study_hours(&self, key: &str, hours: f64) -> Result<(), AppError> {
        if !hours.is_finite() || !(0.0..=MAX_CUSTOM_HOURS).contains(&hours) {
            return Err(AppError::BadRequest(format!(
                "hours must be between 0 and {}",
                MAX_CUSTOM_HOURS
            )));
        }
        repository::upsert_study_override(&self.db, key, hours).await?;
        info!("Custom study hours for {} set to {}", key, hours);
        Ok(())
    }

    pub async fn clear_study_hours(&self, key: &str) -> Result<(), AppError> {
        if repository::delete_study_override(&self.db, key).await? {
            Ok(())
        } else {
            Err(AppError::NotFound)
        }
    }
}
