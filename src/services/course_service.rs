use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::{ensure_percent, ensure_present};
use crate::config::AppConfig;
use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    CalendarEvent, Course, CourseDetail, CreatedCourse, GradeCategory, NewCourseRequest,
    NewEventRequest, NewGradeCategory, UpdateCourseRequest, UpdateEventRequest,
};
use crate::planner::generate_lecture_events;

/// Writes that need validation or more than one statement.
pub struct CourseService {
    db: SqlitePool,
    config: Arc<AppConfig>,
}

impl CourseService {
    pub fn new(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// Creates the course and, when lecture times parse, its lecture events.
    pub async fn create_course(
        &self,
        req: NewCourseRequest,
        today: NaiveDate,
    ) -> Result<CreatedCourse, AppError> {
        ensure_present("name", &req.name)?;
        ensure_present("code", &req.code)?;

        let start = req.semester_start.unwrap_or(today);
        let end = match req.semester_end {
            Some(end) if end < start => {
                return Err(AppError::BadRequest(
                    "semester_end must not be before semester_start".to_string(),
                ));
            }
            Some(end) => end,
            None => start
                .checked_add_days(Days::new(self.config.semester_days))
                .unwrap_or(NaiveDate::MAX),
        };

        let mut tx = self.db.begin().await?;
        let course = repository::insert_course(&mut *tx, &req).await?;

        let lectures = match req.lecture_times.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(times) => {
                let lectures =
                    generate_lecture_events(&course.id, &course.name, times, start, Some(end));
                if lectures.is_empty() {
                    warn!("Could not parse lecture times for {}: {:?}", course.name, times);
                }
                lectures
            }
            None => Vec::new(),
        };
        let created = repository::insert_events(&mut *tx, &lectures).await?;
        tx.commit().await?;

        info!(
            "Created course {} ({}) with {} lecture events",
            course.name,
            course.id,
            created.len()
        );
        Ok(CreatedCourse {
            course,
            lecture_events_created: created.len(),
        })
    }

    pub async fn course_detail(&self, id: &str) -> Result<CourseDetail, AppError> {
        let course = repository::find_course_by_id(&self.db, id)
            .await?
            .ok_or(AppError::NotFound)?;
        let grade_categories = repository::fetch_grade_categories(&self.db, id).await?;
        Ok(CourseDetail {
            course,
            grade_categories,
        })
    }

    /// Replaces the whole category set; there is no partial merge.
    pub async fn replace_grade_categories(
        &self,
        course_id: &str,
        categories: Vec<NewGradeCategory>,
    ) -> Result<Vec<GradeCategory>, AppError> {
        for category in &categories {
            ensure_present("category name", &category.name)?;
            ensure_percent("weight", category.weight)?;
            if let Some(score) = category.current_score {
                ensure_percent("current_score", score)?;
            }
        }

        repository::find_course_by_id(&self.db, course_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let total_weight: f64 = categories.iter().map(|c| c.weight).sum();
        if !categories.is_empty() && (total_weight - 100.0).abs() > 0.01 {
            warn!("Grade weights for course {} sum to {}", course_id, total_weight);
        }

        let created = repository::replace_grade_categories(&self.db, course_id, &categories).await?;
        info!("Replaced grade categories for course {}: {}", course_id, created.len());
        Ok(created)
    }

    pub async fn create_events(
        &self,
        events: Vec<NewEventRequest>,
    ) -> Result<Vec<CalendarEvent>, AppError> {
        if events.is_empty() {
            return Err(AppError::BadRequest("events array is required".to_string()));
        }
        for event in &events {
            ensure_present("title", &event.title)?;
            if let Some(weight) = event.weight_percent {
                ensure_percent("weight_percent", weight)?;
            }
        }

        let course_ids: BTreeSet<&str> = events
            .iter()
            .filter_map(|e| e.course_id.as_deref())
            .collect();
        for course_id in course_ids {
            if repository::find_course_by_id(&self.db, course_id).await?.is_none() {
                return Err(AppError::BadRequest(
                    "One or more courses not found".to_string(),
                ));
            }
        }

        let mut tx = self.db.begin().await?;
        let created = repository::insert_events(&mut *tx, &events).await?;
        tx.commit().await?;

        info!("Created {} events", created.len());
        Ok(created)
    }

    pub async fn update_course(
        &self,
        id: &str,
        req: UpdateCourseRequest,
    ) -> Result<Course, AppError> {
        if let Some(name) = req.name.as_deref() {
            ensure_present("name", name)?;
        }
        if let Some(code) = req.code.as_deref() {
            ensure_present("code", code)?;
        }

        repository::update_course(&self.db, id, req)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn update_event(
        &self,
        id: &str,
        req: UpdateEventRequest,
    ) -> Result<CalendarEvent, AppError> {
        if let Some(title) = req.title.as_deref() {
            ensure_present("title", title)?;
        }
        if let Some(weight) = req.weight_percent {
            ensure_percent("weight_percent", weight)?;
        }
        if let Some(course_id) = req.course_id.as_deref() {
            repository::find_course_by_id(&self.db, course_id)
                .await?
                .ok_or_else(|| AppError::BadRequest("Course not found".to_string()))?;
        }

        let event = repository::update_event(&self.db, id, req)
            .await?
            .ok_or(AppError::NotFound)?;
        info!("Updated event {}", event.id);
        Ok(event)
    }
}
