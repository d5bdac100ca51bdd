//! Pure planning engine: grade targets, study priorities, weekly to-dos and
//! lecture expansion. Nothing here touches the database or HTTP.

pub mod classifier;
pub mod dates;
pub mod grade_target;
pub mod lectures;
pub mod study_priority;
pub mod weekly_todo;

pub use classifier::{EventCategory, EventClassifier, KeywordClassifier};
pub use grade_target::{
    GradeGoals, GradePlan, GradeTarget, Standing, TargetKind, TargetOutcome, current_standing,
    final_exam_categories, letter_grade, plan_final_exam, plan_grade_targets, solve_grade_target,
};
pub use lectures::{LectureSchedule, generate_lecture_events, parse_lecture_times};
pub use study_priority::{
    CourseStudySummary, DEFAULT_HORIZON_DAYS, PriorityPolicy, PriorityTier, StudyPlan,
    StudyRanker, StudyRecommendation, rank_study_priorities,
};
pub use weekly_todo::{TodoItem, WeeklyTodoList, weekly_todos};
