//! Flat to-do list for the current Sunday–Saturday week.
//!
//! Uses its own 1 (most urgent) to 6 scale and looks at the event type only,
//! unlike the study ranker which also reads the title.

use std::collections::HashMap;

use chrono::{Days, NaiveDate, NaiveTime};
use serde::Serialize;

use super::dates::{week_bounds, within};
use crate::models::{CalendarEvent, Course};

pub const STUDY_TASK_TYPE: &str = "study";
const STUDY_LEAD_DAYS: u64 = 2;
const DEFAULT_TODO_PRIORITY: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(rename = "type")]
    pub item_type: String,
    pub priority: u8,
    pub label: &'static str,
    pub course_name: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTodoList {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub items: Vec<TodoItem>,
}

pub fn todo_priority(event_type: &str) -> u8 {
    let kind = event_type.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| kind.contains(w));

    if kind.is_empty() {
        DEFAULT_TODO_PRIORITY
    } else if has(&["exam", "test", "final"]) {
        1
    } else if has(&["quiz", "midterm"]) {
        2
    } else if has(&["project", "assignment"]) {
        3
    } else if has(&["homework", "hw"]) {
        4
    } else if has(&["reading"]) {
        6
    } else {
        DEFAULT_TODO_PRIORITY
    }
}

pub fn priority_label(priority: u8) -> &'static str {
    match priority {
        0..=1 => "High",
        2 => "Medium-High",
        3 => "Medium",
        _ => "Low",
    }
}

fn needs_study_task(event_type: &str) -> bool {
    let kind = event_type.to_lowercase();
    ["exam", "test", "final", "midterm"]
        .iter()
        .any(|w| kind.contains(w))
}

pub fn weekly_todos(events: &[CalendarEvent], courses: &[Course], today: NaiveDate) -> WeeklyTodoList {
    let (week_start, week_end) = week_bounds(today);
    let courses: HashMap<&str, &Course> = courses.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut items = Vec::new();
    for event in events.iter().filter(|e| within(e.date, week_start, week_end)) {
        let course = event.course_id.as_deref().and_then(|id| courses.get(id));
        let course_name = course.map(|c| c.name.clone());
        let color = course.and_then(|c| c.color.clone());
        let priority = todo_priority(&event.event_type);

        items.push(TodoItem {
            id: event.id.clone(),
            title: event.title.clone(),
            date: event.date,
            time: event.time,
            item_type: event.event_type.clone(),
            priority,
            label: priority_label(priority),
            course_name: course_name.clone(),
            color: color.clone(),
        });

        if !needs_study_task(&event.event_type) {
            continue;
        }
        if let Some(study_date) = event.date.checked_sub_days(Days::new(STUDY_LEAD_DAYS)) {
            if study_date > today || within(study_date, week_start, week_end) {
                items.push(TodoItem {
                    id: format!("{}-study", event.id),
                    title: format!("Study for {}", event.title),
                    date: study_date,
                    time: None,
                    item_type: STUDY_TASK_TYPE.to_string(),
                    priority: 1,
                    label: priority_label(1),
                    course_name,
                    color,
                });
            }
        }
    }

    items.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(a.date.cmp(&b.date))
            .then(a.time.cmp(&b.time))
    });

    WeeklyTodoList {
        week_start,
        week_end,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    fn event(id: &str, title: &str, kind: &str, date: NaiveDate) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            course_id: Some("chem".to_string()),
            title: title.to_string(),
            description: None,
            event_type: kind.to_string(),
            date,
            time: None,
            weight_percent: None,
        }
    }

    fn chemistry() -> Course {
        Course {
            id: "chem".to_string(),
            name: "Chemistry".to_string(),
            code: "CHEM 101".to_string(),
            color: Some("#22c55e".to_string()),
            syllabus_text: None,
            lecture_times: None,
            created_at: "2026-09-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn type_priorities() {
        assert_eq!(todo_priority("Final Exam"), 1);
        assert_eq!(todo_priority("midterm"), 2);
        assert_eq!(todo_priority("assignment"), 3);
        assert_eq!(todo_priority("project"), 3);
        assert_eq!(todo_priority("homework"), 4);
        assert_eq!(todo_priority("reading"), 6);
        assert_eq!(todo_priority("lecture"), 5);
        assert_eq!(todo_priority(""), 5);
    }

    #[test]
    fn only_current_week_is_listed() {
        // Wednesday; week is Oct 11..=17
        let today = d(14);
        let events = vec![
            event("a", "Lab", "assignment", d(10)),
            event("b", "Reading", "reading", d(11)),
            event("c", "Problem set", "homework", d(17)),
            event("d", "Essay", "assignment", d(18)),
        ];
        let list = weekly_todos(&events, &[chemistry()], today);
        assert_eq!((list.week_start, list.week_end), (d(11), d(17)));
        let ids: Vec<&str> = list.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b"]);
        assert_eq!(list.items[0].course_name.as_deref(), Some("Chemistry"));
        assert_eq!(list.items[0].color.as_deref(), Some("#22c55e"));
    }

    #[test]
    fn exam_gets_study_task_two_days_before() {
        let today = d(12);
        let list = weekly_todos(&[event("x", "Exam 2", "exam", d(16))], &[chemistry()], today);

        let ids: Vec<&str> = list.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["x-study", "x"]);
        let study = &list.items[0];
        assert_eq!(study.title, "Study for Exam 2");
        assert_eq!(study.date, d(14));
        assert_eq!(study.item_type, STUDY_TASK_TYPE);
        assert_eq!(study.priority, 1);
        assert_eq!(study.label, "High");
        assert_eq!(study.course_name.as_deref(), Some("Chemistry"));
    }

    #[test]
    fn study_task_from_previous_week_is_skipped() {
        // Exam on Monday Oct 12, study date Saturday Oct 10 already passed
        let today = d(14);
        let list = weekly_todos(&[event("m", "Midterm", "midterm", d(12))], &[], today);
        let ids: Vec<&str> = list.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["m"]);
        assert_eq!(list.items[0].course_name, None);
    }

    #[test]
    fn past_study_task_inside_week_is_kept() {
        // Exam Saturday Oct 17, study Thursday Oct 15, today Friday Oct 16
        let list = weekly_todos(&[event("t", "Unit test", "test", d(17))], &[], d(16));
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].date, d(15));
    }

    #[test]
    fn ties_break_by_date() {
        let today = d(11);
        let events = vec![
            event("late", "Quiz 2", "quiz", d(16)),
            event("early", "Quiz 1", "quiz", d(13)),
        ];
        let list = weekly_todos(&events, &[], today);
        assert_eq!(list.items[0].id, "early");
        assert_eq!(list.items[0].label, "Medium-High");
    }

    #[test]
    fn empty_week() {
        let list = weekly_todos(&[], &[], d(14));
        assert!(list.items.is_empty());
    }

    #[test]
    fn calendar_edges_do_not_panic() {
        let list = weekly_todos(&[], &[], NaiveDate::MAX);
        assert_eq!(list.week_end, NaiveDate::MAX);
        assert!(list.items.is_empty());

        let exam = event("e1", "Final", "final exam", NaiveDate::MIN);
        let list = weekly_todos(&[exam], &[chemistry()], NaiveDate::MIN);
        assert_eq!(list.week_start, NaiveDate::MIN);
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].id, "e1");
    }
}
