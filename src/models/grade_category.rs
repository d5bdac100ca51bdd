use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct GradeCategory {
    pub id: String,
    pub course_id: String,
    pub name: String,
    /// Percentage points this category contributes to the course grade.
    pub weight: f64,
    /// Percentage earned; only meaningful once `is_completed` is set.
    pub current_score: Option<f64>,
    pub is_completed: bool,
}

impl GradeCategory {
    /// Score used for grade math. A completed category without a score counts as zero.
    pub fn score(&self) -> f64 {
        self.current_score.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGradeCategory {
    pub name: String,
    pub weight: f64,
    pub current_score: Option<f64>,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceGradeCategoriesRequest {
    pub categories: Vec<NewGradeCategory>,
}
