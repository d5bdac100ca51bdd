//! Score needed on the pending part of a course to reach a target grade.
//!
//! Percentages are plain 0-100 numbers and category weights are "percent of
//! the course grade". Nothing here rounds, clamps or validates: results are
//! reported raw and classified, so `Infeasible` still carries the over-100
//! value and `AlreadyAchieved` is reported instead of a negative score.

use serde::Serialize;

use crate::models::GradeCategory;

/// Outcome of solving for a target overall percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GradeTarget {
    /// Nothing is pending; the grade is fixed.
    AllCompleted { current_grade: f64 },
    /// The target is met whatever happens on the remaining work.
    AlreadyAchieved { current_grade: f64 },
    /// More than 100% would be needed on average.
    Infeasible { needed_average: f64 },
    SingleRemaining { needed_average: f64, category_name: String },
    /// Flat average needed across the whole remaining weight pool.
    MultipleRemaining { needed_average: f64 },
}

impl GradeTarget {
    pub fn needed_average(&self) -> Option<f64> {
        match self {
            GradeTarget::Infeasible { needed_average }
            | GradeTarget::SingleRemaining { needed_average, .. }
            | GradeTarget::MultipleRemaining { needed_average } => Some(*needed_average),
            GradeTarget::AllCompleted { .. } | GradeTarget::AlreadyAchieved { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Desired,
    Passing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeGoals {
    pub desired: f64,
    pub passing: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetOutcome {
    pub kind: TargetKind,
    pub target: f64,
    pub result: GradeTarget,
    pub needed_letter: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradePlan {
    pub standing: Standing,
    pub desired: TargetOutcome,
    pub passing: Option<TargetOutcome>,
}

/// What the completed categories add up to so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Standing {
    /// Points already locked into the overall grade.
    pub earned_points: f64,
    pub completed_weight: f64,
    pub remaining_weight: f64,
    /// Average score over the completed weight, if any weight is completed.
    pub completed_average: Option<f64>,
}

pub fn current_standing(categories: &[GradeCategory]) -> Standing {
    let (completed, remaining): (Vec<&GradeCategory>, Vec<&GradeCategory>) =
        categories.iter().partition(|c| c.is_completed);

    let earned_points = earned_points(&completed);
    let completed_weight: f64 = completed.iter().map(|c| c.weight).sum();
    let remaining_weight: f64 = remaining.iter().map(|c| c.weight).sum();

    Standing {
        earned_points,
        completed_weight,
        remaining_weight,
        completed_average: (completed_weight != 0.0)
            .then(|| earned_points / (completed_weight / 100.0)),
    }
}

pub fn solve_grade_target(categories: &[GradeCategory], target_overall_percent: f64) -> GradeTarget {
    let (completed, remaining): (Vec<&GradeCategory>, Vec<&GradeCategory>) =
        categories.iter().partition(|c| c.is_completed);

    let earned = earned_points(&completed);
    let remaining_weight: f64 = remaining.iter().map(|c| c.weight).sum();

    if remaining_weight == 0.0 {
        return GradeTarget::AllCompleted { current_grade: earned };
    }

    let needed_average = (target_overall_percent - earned) / (remaining_weight / 100.0);

    if needed_average <= 0.0 {
        GradeTarget::AlreadyAchieved { current_grade: earned }
    } else if needed_average > 100.0 {
        GradeTarget::Infeasible { needed_average }
    } else if let [only] = remaining.as_slice() {
        GradeTarget::SingleRemaining {
            needed_average,
            category_name: only.name.clone(),
        }
    } else {
        GradeTarget::MultipleRemaining { needed_average }
    }
}

/// Solves the desired target and, when given, the passing target with the same solver.
pub fn plan_grade_targets(categories: &[GradeCategory], goals: GradeGoals) -> GradePlan {
    GradePlan {
        standing: current_standing(categories),
        desired: outcome(categories, TargetKind::Desired, goals.desired),
        passing: goals
            .passing
            .map(|target| outcome(categories, TargetKind::Passing, target)),
    }
}

/// Two-category equivalent of "current grade, final exam worth `final_weight`%".
pub fn final_exam_categories(current_grade: f64, final_weight: f64) -> [GradeCategory; 2] {
    [
        GradeCategory {
            id: "coursework".to_string(),
            course_id: String::new(),
            name: "Coursework".to_string(),
            weight: 100.0 - final_weight,
            current_score: Some(current_grade),
            is_completed: true,
        },
        GradeCategory {
            id: "final".to_string(),
            course_id: String::new(),
            name: "Final Exam".to_string(),
            weight: final_weight,
            current_score: None,
            is_completed: false,
        },
    ]
}

pub fn plan_final_exam(current_grade: f64, final_weight: f64, goals: GradeGoals) -> GradePlan {
    plan_grade_targets(&final_exam_categories(current_grade, final_weight), goals)
}

pub fn letter_grade(percent: f64) -> &'static str {
    const SCALE: [(f64, &str); 11] = [
        (97.0, "A+"),
        (93.0, "A"),
        (90.0, "A-"),
        (87.0, "B+"),
        (83.0, "B"),
        (80.0, "B-"),
        (77.0, "C+"),
        (73.0, "C"),
        (70.0, "C-"),
        (67.0, "D+"),
        (65.0, "D"),
    ];

    SCALE
        .iter()
        .find(|(floor, _)| percent >= *floor)
        .map(|(_, letter)| *letter)
        .unwrap_or("F")
}

fn earned_points(completed: &[&GradeCategory]) -> f64 {
    completed.iter().map(|c| c.score() * c.weight / 100.0).sum()
}

fn outcome(categories: &[GradeCategory], kind: TargetKind, target: f64) -> TargetOutcome {
    let result = solve_grade_target(categories, target);
    TargetOutcome {
        kind,
        target,
        needed_letter: result.needed_average().map(letter_grade),
        result,
    }
}
