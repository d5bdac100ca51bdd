//! Expands a free-text lecture schedule ("Mon Wed Fri, 9:00 AM - 10:30 AM")
//! into one calendar event per lecture.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use regex::Regex;
use serde::Serialize;

use crate::models::NewEventRequest;

pub const LECTURE_EVENT_TYPE: &str = "lecture";
pub const DEFAULT_SEMESTER_DAYS: u64 = 120;

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}):(\d{2})\s*([ap]m)?\s*[-–—]\s*(\d{1,2}):(\d{2})\s*([ap]m)?")
        .expect("invalid lecture time regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LectureSchedule {
    /// Sunday first, no duplicates.
    pub days: Vec<Weekday>,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn parse(text: Option<&str>) -> Option<Self> {
        match text?.to_ascii_lowercase().as_str() {
            "am" => Some(Meridiem::Am),
            "pm" => Some(Meridiem::Pm),
            _ => None,
        }
    }

    fn to_24h(self, hour: u32) -> u32 {
        match (self, hour) {
            (Meridiem::Am, 12) => 0,
            (Meridiem::Pm, h) if h != 12 => h + 12,
            (_, h) => h,
        }
    }
}

fn weekday_from_word(word: &str) -> Option<Weekday> {
    let word = word.to_lowercase();
    let lookup = |w: &str| match w {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    };
    lookup(&word).or_else(|| word.strip_suffix('s').and_then(lookup))
}

pub fn parse_lecture_times(text: &str) -> Option<LectureSchedule> {
    let caps = TIME_RANGE.captures(text.trim())?;
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    let (start_hour, start_min) = (number(1)?, number(2)?);
    let (end_hour, end_min) = (number(4)?, number(5)?);
    let start_period = Meridiem::parse(caps.get(3).map(|m| m.as_str()));
    let end_period = Meridiem::parse(caps.get(6).map(|m| m.as_str()));

    let (start_hour, end_hour) = match (start_period, end_period) {
        (Some(s), Some(e)) => (s.to_24h(start_hour), e.to_24h(end_hour)),
        // "1:00 - 3:30 PM": the start borrows the end's marker unless that puts it after the end
        (None, Some(e)) => {
            let end = e.to_24h(end_hour);
            let start = e.to_24h(start_hour);
            let start = if (start, start_min) > (end, end_min) {
                Meridiem::Am.to_24h(start_hour)
            } else {
                start
            };
            (start, end)
        }
        (Some(s), None) => (s.to_24h(start_hour), end_hour),
        // No markers at all: 1..=11 are afternoon hours
        (None, None) => {
            let afternoon = |h: u32| if (1..12).contains(&h) { h + 12 } else { h };
            (afternoon(start_hour), afternoon(end_hour))
        }
    };

    let start = NaiveTime::from_hms_opt(start_hour, start_min, 0)?;
    let end = NaiveTime::from_hms_opt(end_hour, end_min, 0)?;

    let days_part = &text.trim()[..caps.get(0)?.start()];
    let mut days: Vec<Weekday> = Vec::new();
    for word in days_part.split(|c: char| c == ',' || c.is_whitespace()) {
        if let Some(day) = weekday_from_word(word) {
            if !days.contains(&day) {
                days.push(day);
            }
        }
    }
    if days.is_empty() {
        return None;
    }
    days.sort_by_key(|d| d.num_days_from_sunday());

    Some(LectureSchedule { days, start, end })
}

/// One lecture event per scheduled weekday in `start..=end`.
pub fn generate_lecture_events(
    course_id: &str,
    course_name: &str,
    lecture_times: &str,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Vec<NewEventRequest> {
    let Some(schedule) = parse_lecture_times(lecture_times) else {
        return Vec::new();
    };
    let end = end.unwrap_or_else(|| {
        start
            .checked_add_days(Days::new(DEFAULT_SEMESTER_DAYS))
            .unwrap_or(NaiveDate::MAX)
    });
    let description = format!(
        "{} - {}",
        schedule.start.format("%-I:%M %p"),
        schedule.end.format("%-I:%M %p")
    );

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| schedule.days.contains(&date.weekday()))
        .map(|date| NewEventRequest {
            course_id: Some(course_id.to_string()),
            title: format!("Lecture - {}", course_name),
            description: Some(description.clone()),
            event_type: Some(LECTURE_EVENT_TYPE.to_string()),
            date,
            time: Some(schedule.start),
            weight_percent: None,
        })
        .collect()
}
