use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_EVENT_TYPE: &str = "other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CalendarEvent {
    pub id: String,
    pub course_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub date: NaiveDate,
    /// Time of day, only set on generated lecture events.
    pub time: Option<NaiveTime>,
    pub weight_percent: Option<f64>,
}

impl CalendarEvent {
    /// Stable key used to attach custom study hours to a recommendation.
    pub fn recommendation_key(&self) -> String {
        format!("{}-{}", self.id, self.date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEventRequest {
    pub course_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub weight_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventsRequest {
    pub events: Vec<NewEventRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub date: Option<NaiveDate>,
    pub weight_percent: Option<f64>,
    pub course_id: Option<String>,
}

/// Which events a listing or bulk delete applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    All,
    /// Events without a course.
    Other,
    Course(String),
}

impl EventFilter {
    pub fn from_query(course_id: Option<&str>) -> Self {
        match course_id {
            None | Some("") | Some("all") => EventFilter::All,
            Some("other") => EventFilter::Other,
            Some(id) => EventFilter::Course(id.to_string()),
        }
    }
}
