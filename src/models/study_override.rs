use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Upper bound accepted for a custom study-hours value.
pub const MAX_CUSTOM_HOURS: f64 = 20.0;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudyHoursOverride {
    pub key: String,
    pub hours: f64,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStudyHoursRequest {
    pub hours: f64,
}
