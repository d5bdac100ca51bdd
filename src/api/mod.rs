use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{patch, post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::planner::{GradeGoals, GradePlan, StudyPlan, WeeklyTodoList, plan_final_exam};
use crate::services::{CourseService, PlanningService, ensure_percent};
use crate::state::AppState;

/// Longest study-plan window a request may ask for.
const MAX_HORIZON_DAYS: u32 = 366;

#[derive(Deserialize)]
struct EventQueryParams {
    course_id: Option<String>,
}

#[derive(Deserialize)]
struct TodayQueryParams {
    today: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct StudyPlanQueryParams {
    today: Option<NaiveDate>,
    horizon_days: Option<u32>,
}

#[derive(Deserialize)]
struct GradeTargetRequest {
    target: f64,
    passing: Option<f64>,
}

#[derive(Deserialize)]
struct FinalExamRequest {
    current_grade: f64,
    final_weight: f64,
    target: f64,
    passing: Option<f64>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/{id}",
            get(get_course).patch(update_course).delete(delete_course),
        )
        .route(
            "/courses/{id}/grade-categories",
            get(list_grade_categories).put(replace_grade_categories),
        )
        .route("/courses/{id}/grade-target", post(course_grade_target))
        .route("/grade-target/final-exam", post(final_exam_target))
        .route(
            "/events",
            get(list_events).post(create_events).delete(delete_events),
        )
        .route("/events/{id}", patch(update_event).delete(delete_event))
        .route("/study-plan", get(study_plan))
        .route("/study-plan/overrides", get(list_study_overrides))
        .route(
            "/study-plan/overrides/{key}",
            put(set_study_hours).delete(clear_study_hours),
        )
        .route("/weekly-todos", get(list_weekly_todos))
        .with_state(state)
}

fn today_or_now(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = repository::fetch_courses(&state.db).await?;
    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<CreatedCourse>), AppError> {
    let service = CourseService::new(state.db.clone(), state.config.clone());
    let created = service.create_course(req, today_or_now(None)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CourseDetail>, AppError> {
    let service = CourseService::new(state.db.clone(), state.config.clone());
    Ok(Json(service.course_detail(&id).await?))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let service = CourseService::new(state.db.clone(), state.config.clone());
    Ok(Json(service.update_course(&id, req).await?))
}

async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_course(&state.db, &id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn list_grade_categories(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<GradeCategory>>, AppError> {
    let service = CourseService::new(state.db.clone(), state.config.clone());
    Ok(Json(service.course_detail(&id).await?.grade_categories))
}

async fn replace_grade_categories(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReplaceGradeCategoriesRequest>,
) -> Result<Json<Vec<GradeCategory>>, AppError> {
    let service = CourseService::new(state.db.clone(), state.config.clone());
    let categories = service.replace_grade_categories(&id, req.categories).await?;
    Ok(Json(categories))
}

async fn course_grade_target(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<GradeTargetRequest>,
) -> Result<Json<GradePlan>, AppError> {
    let service = PlanningService::new(state.db.clone());
    let goals = GradeGoals {
        desired: req.target,
        passing: req.passing,
    };
    Ok(Json(service.grade_plan(&id, goals).await?))
}

async fn final_exam_target(Json(req): Json<FinalExamRequest>) -> Result<Json<GradePlan>, AppError> {
    if !(req.final_weight > 0.0 && req.final_weight <= 100.0) {
        return Err(AppError::BadRequest(
            "final_weight must be greater than 0 and at most 100".to_string(),
        ));
    }
    ensure_percent("current_grade", req.current_grade)?;
    ensure_percent("target", req.target)?;
    if let Some(passing) = req.passing {
        ensure_percent("passing", passing)?;
    }

    let goals = GradeGoals {
        desired: req.target,
        passing: req.passing,
    };
    Ok(Json(plan_final_exam(req.current_grade, req.final_weight, goals)))
}

async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<EventQueryParams>,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    let filter = EventFilter::from_query(params.course_id.as_deref());
    let events = repository::fetch_events(&state.db, &filter).await?;
    Ok(Json(events))
}

async fn create_events(
    State(state): State<AppState>,
    Json(req): Json<CreateEventsRequest>,
) -> Result<(StatusCode, Json<Vec<CalendarEvent>>), AppError> {
    let service = CourseService::new(state.db.clone(), state.config.clone());
    let events = service.create_events(req.events).await?;
    Ok((StatusCode::CREATED, Json(events)))
}

async fn delete_events(
    State(state): State<AppState>,
    Query(params): Query<EventQueryParams>,
) -> Result<Json<Value>, AppError> {
    let course_id = params
        .course_id
        .ok_or_else(|| AppError::BadRequest("course_id is required".to_string()))?;
    let filter = EventFilter::from_query(Some(&course_id));
    let deleted = repository::delete_events(&state.db, &filter).await?;
    Ok(Json(json!({ "deleted": deleted })))
}

async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<CalendarEvent>, AppError> {
    let service = CourseService::new(state.db.clone(), state.config.clone());
    Ok(Json(service.update_event(&id, req).await?))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_event(&state.db, &id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn study_plan(
    State(state): State<AppState>,
    Query(params): Query<StudyPlanQueryParams>,
) -> Result<Json<StudyPlan>, AppError> {
    let horizon_days = params.horizon_days.unwrap_or(state.config.horizon_days);
    if horizon_days > MAX_HORIZON_DAYS {
        return Err(AppError::BadRequest(format!(
            "horizon_days must be at most {}",
            MAX_HORIZON_DAYS
        )));
    }
    let service = PlanningService::new(state.db.clone());
    let plan = service
        .study_plan(today_or_now(params.today), horizon_days)
        .await?;
    Ok(Json(plan))
}

async fn list_study_overrides(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudyHoursOverride>>, AppError> {
    let overrides = repository::fetch_study_overrides(&state.db).await?;
    Ok(Json(overrides))
}

async fn set_study_hours(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<SetStudyHoursRequest>,
) -> Result<StatusCode, AppError> {
    let service = PlanningService::new(state.db.clone());
    service.set_study_hours(&key, req.hours).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_study_hours(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    let service = PlanningService::new(state.db.clone());
    service.clear_study_hours(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_weekly_todos(
    State(state): State<AppState>,
    Query(params): Query<TodayQueryParams>,
) -> Result<Json<WeeklyTodoList>, AppError> {
    let service = PlanningService::new(state.db.clone());
    let list = service.weekly_todos(today_or_now(params.today)).await?;
    Ok(Json(list))
}
