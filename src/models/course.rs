use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::GradeCategory;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub code: String,
    pub color: Option<String>,
    pub syllabus_text: Option<String>,
    pub lecture_times: Option<String>,
    pub created_at: String,
}

/// Course together with the grade categories it owns.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub grade_categories: Vec<GradeCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub name: String,
    pub code: String,
    pub color: Option<String>,
    pub syllabus_text: Option<String>,
    pub lecture_times: Option<String>,
    /// First day lecture events are generated for. Defaults to today.
    pub semester_start: Option<NaiveDate>,
    pub semester_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub color: Option<String>,
    pub syllabus_text: Option<String>,
    pub lecture_times: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedCourse {
    #[serde(flatten)]
    pub course: Course,
    pub lecture_events_created: usize,
}
