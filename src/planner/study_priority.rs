//! Ranking of upcoming deadlines into a study-time allocation.
//!
//! Each event inside the horizon is classified (exam, quiz, project,
//! assignment, other), placed in a day bucket of the [`PriorityPolicy`] table
//! and given a priority score plus recommended hours:
//!
//! ```text
//! hours = round_half(max(floor, weight / divisor) + heavy_boost)
//! ```
//!
//! Caller-owned overrides replace the hours afterwards. The list is sorted by
//! priority (highest first) then by date (soonest first).

use std::collections::HashMap;

use chrono::{Days, NaiveDate, NaiveTime};
use serde::Serialize;

use super::classifier::{EventCategory, EventClassifier, KeywordClassifier};
use super::dates::{days_until, within};
use crate::models::{CalendarEvent, Course};

pub const DEFAULT_HORIZON_DAYS: u32 = 14;
pub const OTHER_COURSE: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PriorityTier {
    Low,
    Medium,
    High,
    Critical,
}

impl PriorityTier {
    pub fn from_score(priority: u8) -> Self {
        match priority {
            8.. => PriorityTier::Critical,
            6..=7 => PriorityTier::High,
            4..=5 => PriorityTier::Medium,
            _ => PriorityTier::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoursRule {
    Fixed(f64),
    /// `max(floor, weight / divisor)`; missing weights use the category default.
    Scaled { floor: f64, divisor: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    /// Inclusive upper bound on days until the deadline; `None` catches the rest.
    pub max_days: Option<i64>,
    pub priority: u8,
    pub hours: HoursRule,
    pub reason_suffix: Option<String>,
}

impl Bucket {
    fn new(max_days: Option<i64>, priority: u8, hours: HoursRule, suffix: Option<&str>) -> Self {
        Self {
            max_days,
            priority,
            hours,
            reason_suffix: suffix.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPolicy {
    /// Reason prefix, e.g. "Project due in".
    pub lead: String,
    pub default_weight: f64,
    /// Checked in order, closest deadline first.
    pub buckets: Vec<Bucket>,
}

impl CategoryPolicy {
    fn new(lead: &str, default_weight: f64, buckets: Vec<Bucket>) -> Self {
        Self {
            lead: lead.to_string(),
            default_weight,
            buckets,
        }
    }

    fn bucket(&self, days: i64) -> Option<&Bucket> {
        self.buckets
            .iter()
            .find(|b| b.max_days.is_none_or(|max| days <= max))
    }
}

/// Replaceable policy table behind the ranker.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityPolicy {
    pub exam: CategoryPolicy,
    pub quiz: CategoryPolicy,
    pub project: CategoryPolicy,
    pub assignment: CategoryPolicy,
    pub other: CategoryPolicy,
    /// Events weighing more than this get the boost below.
    pub heavy_weight_threshold: f64,
    pub heavy_priority_boost: u8,
    pub heavy_hours_boost: f64,
}

impl PriorityPolicy {
    pub fn category(&self, category: EventCategory) -> &CategoryPolicy {
        match category {
            EventCategory::Exam => &self.exam,
            EventCategory::Quiz => &self.quiz,
            EventCategory::Project => &self.project,
            EventCategory::Assignment => &self.assignment,
            EventCategory::Other => &self.other,
        }
    }
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        use HoursRule::{Fixed, Scaled};

        Self {
            exam: CategoryPolicy::new(
                "Exam in",
                20.0,
                vec![
                    Bucket::new(Some(3), 10, Scaled { floor: 3.0, divisor: 10.0 }, Some("Critical priority")),
                    Bucket::new(Some(7), 8, Scaled { floor: 2.0, divisor: 15.0 }, Some("High priority")),
                    Bucket::new(None, 6, Scaled { floor: 1.5, divisor: 20.0 }, Some("Plan ahead")),
                ],
            ),
            quiz: CategoryPolicy::new(
                "Quiz in",
                15.0,
                vec![
                    Bucket::new(Some(2), 8, Scaled { floor: 2.0, divisor: 12.0 }, Some("High priority")),
                    Bucket::new(Some(5), 6, Scaled { floor: 1.5, divisor: 18.0 }, Some("Medium-high priority")),
                    Bucket::new(None, 4, Scaled { floor: 1.0, divisor: 25.0 }, Some("Medium priority")),
                ],
            ),
            project: CategoryPolicy::new(
                "Project due in",
                15.0,
                vec![
                    Bucket::new(Some(3), 5, Scaled { floor: 2.0, divisor: 15.0 }, None),
                    Bucket::new(Some(7), 3, Scaled { floor: 1.5, divisor: 20.0 }, None),
                    Bucket::new(None, 2, Fixed(1.0), Some("Start planning")),
                ],
            ),
            assignment: CategoryPolicy::new(
                "Assignment due in",
                0.0,
                vec![
                    Bucket::new(Some(2), 4, Fixed(1.5), None),
                    Bucket::new(Some(5), 2, Fixed(1.0), None),
                    Bucket::new(None, 1, Fixed(0.5), None),
                ],
            ),
            other: CategoryPolicy::new(
                "Due in",
                0.0,
                vec![
                    Bucket::new(Some(2), 3, Fixed(1.0), None),
                    Bucket::new(None, 1, Fixed(0.5), None),
                ],
            ),
            heavy_weight_threshold: 25.0,
            heavy_priority_boost: 1,
            heavy_hours_boost: 0.5,
        }
    }
}

/// Priority, hours and reason for one deadline before overrides are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub priority: u8,
    pub hours: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyRecommendation {
    /// `<event id>-<event date>`, the key overrides are stored under.
    pub id: String,
    pub event_id: String,
    pub course_name: String,
    pub topic: String,
    pub category: EventCategory,
    pub priority: u8,
    pub tier: PriorityTier,
    pub recommended_hours: f64,
    pub customized: bool,
    pub reason: String,
    pub event_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_time: Option<NaiveTime>,
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseStudySummary {
    pub course_name: String,
    pub hours: f64,
    pub urgent_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyPlan {
    pub today: NaiveDate,
    pub horizon_days: u32,
    pub recommendations: Vec<StudyRecommendation>,
    pub total_hours: f64,
    /// Recommendations at tier High or above.
    pub high_priority_count: usize,
    /// Sorted by hours, largest first.
    pub courses: Vec<CourseStudySummary>,
}

impl StudyPlan {
    /// Nothing is due inside the horizon.
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

pub struct StudyRanker<C = KeywordClassifier> {
    classifier: C,
    policy: PriorityPolicy,
}

impl Default for StudyRanker<KeywordClassifier> {
    fn default() -> Self {
        Self::new(KeywordClassifier::default(), PriorityPolicy::default())
    }
}

impl<C: EventClassifier> StudyRanker<C> {
    pub fn new(classifier: C, policy: PriorityPolicy) -> Self {
        Self { classifier, policy }
    }

    pub fn classify(&self, event: &CalendarEvent) -> EventCategory {
        let text = format!("{} {}", event.event_type, event.title).to_lowercase();
        self.classifier.classify(&text)
    }

    pub fn assess(&self, category: EventCategory, days: i64, weight_percent: Option<f64>) -> Assessment {
        let policy = self.policy.category(category);
        let (mut priority, mut hours, suffix) = match policy.bucket(days) {
            Some(bucket) => {
                let hours = match bucket.hours {
                    HoursRule::Fixed(hours) => hours,
                    HoursRule::Scaled { floor, divisor } => {
                        floor.max(weight_percent.unwrap_or(policy.default_weight) / divisor)
                    }
                };
                (bucket.priority, hours, bucket.reason_suffix.as_deref())
            }
            None => (1, 0.5, None),
        };

        if weight_percent.is_some_and(|w| w > self.policy.heavy_weight_threshold) {
            priority = priority.saturating_add(self.policy.heavy_priority_boost);
            hours += self.policy.heavy_hours_boost;
        }

        let plural = if days == 1 { "" } else { "s" };
        let mut reason = format!("{} {} day{}", policy.lead, days, plural);
        if let Some(suffix) = suffix {
            reason.push_str(" - ");
            reason.push_str(suffix);
        }

        Assessment {
            priority,
            hours: round_half(hours),
            reason,
        }
    }

    pub fn rank(
        &self,
        events: &[CalendarEvent],
        courses: &[Course],
        today: NaiveDate,
        horizon_days: u32,
        overrides: &HashMap<String, f64>,
    ) -> StudyPlan {
        let horizon_end = today
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        let course_names: HashMap<&str, &str> = courses
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();

        let mut recommendations: Vec<StudyRecommendation> = events
            .iter()
            .filter(|e| within(e.date, today, horizon_end))
            .map(|event| {
                let category = self.classify(event);
                let days = days_until(today, event.date);
                let assessment = self.assess(category, days, event.weight_percent);
                let id = event.recommendation_key();
                let custom = overrides.get(&id).copied();

                StudyRecommendation {
                    event_id: event.id.clone(),
                    course_name: event
                        .course_id
                        .as_deref()
                        .and_then(|id| course_names.get(id))
                        .unwrap_or(&OTHER_COURSE)
                        .to_string(),
                    topic: event.title.clone(),
                    category,
                    priority: assessment.priority,
                    tier: PriorityTier::from_score(assessment.priority),
                    recommended_hours: custom.unwrap_or(assessment.hours),
                    customized: custom.is_some(),
                    reason: assessment.reason,
                    event_date: event.date,
                    event_time: event.time,
                    event_type: event.event_type.clone(),
                    weight_percent: event.weight_percent,
                    id,
                }
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(a.event_date.cmp(&b.event_date))
                .then(a.event_time.cmp(&b.event_time))
        });

        let total_hours = recommendations.iter().map(|r| r.recommended_hours).sum();
        let high_priority_count = recommendations
            .iter()
            .filter(|r| r.tier >= PriorityTier::High)
            .count();

        StudyPlan {
            today,
            horizon_days,
            courses: summarize_courses(&recommendations),
            recommendations,
            total_hours,
            high_priority_count,
        }
    }
}

pub fn rank_study_priorities(
    events: &[CalendarEvent],
    courses: &[Course],
    today: NaiveDate,
    horizon_days: u32,
    overrides: &HashMap<String, f64>,
) -> StudyPlan {
    StudyRanker::<KeywordClassifier>::default().rank(events, courses, today, horizon_days, overrides)
}

fn round_half(hours: f64) -> f64 {
    (hours * 2.0).round() / 2.0
}

fn summarize_courses(recommendations: &[StudyRecommendation]) -> Vec<CourseStudySummary> {
    let mut summaries: Vec<CourseStudySummary> = Vec::new();
    for rec in recommendations {
        let index = match summaries.iter().position(|s| s.course_name == rec.course_name) {
            Some(index) => index,
            None => {
                summaries.push(CourseStudySummary {
                    course_name: rec.course_name.clone(),
                    hours: 0.0,
                    urgent_count: 0,
                });
                summaries.len() - 1
            }
        };
        let summary = &mut summaries[index];
        summary.hours += rec.recommended_hours;
        if rec.tier >= PriorityTier::High {
            summary.urgent_count += 1;
        }
    }
    summaries.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    summaries
}
