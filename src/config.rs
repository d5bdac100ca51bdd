use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::AppError;
use crate::planner::DEFAULT_HORIZON_DAYS;
use crate::planner::lectures::DEFAULT_SEMESTER_DAYS;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Days ahead the study plan looks when the request does not say.
    pub horizon_days: u32,
    /// Length of the lecture schedule generated for a new course without an end date.
    pub semester_days: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://copilot.db".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            horizon_days: DEFAULT_HORIZON_DAYS,
            semester_days: DEFAULT_SEMESTER_DAYS,
        }
    }
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: parse_var("BIND_ADDR")?.unwrap_or(defaults.bind_addr),
            horizon_days: parse_var("STUDY_HORIZON_DAYS")?.unwrap_or(defaults.horizon_days),
            semester_days: parse_var("SEMESTER_LENGTH_DAYS")?.unwrap_or(defaults.semester_days),
        })
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(None),
    }
}
