use chrono::{NaiveDate, NaiveTime};
use copilot::db::repository;
use copilot::models::{
    EventFilter, NewCourseRequest, NewEventRequest, NewGradeCategory, UpdateEventRequest,
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create memory pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn create_course(pool: &SqlitePool, name: &str) -> String {
    let req = NewCourseRequest {
        name: name.to_string(),
        code: format!("{} 101", name.to_uppercase()),
        color: Some("#3b82f6".to_string()),
        syllabus_text: None,
        lecture_times: None,
        semester_start: None,
        semester_end: None,
    };
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    repository::insert_course(&mut conn, &req)
        .await
        .expect("Failed to insert course")
        .id
}

fn new_event(course_id: Option<&str>, title: &str, kind: &str, date: NaiveDate) -> NewEventRequest {
    NewEventRequest {
        course_id: course_id.map(str::to_string),
        title: title.to_string(),
        description: None,
        event_type: Some(kind.to_string()),
        date,
        time: None,
        weight_percent: None,
    }
}

fn category(name: &str, weight: f64, score: Option<f64>, done: bool) -> NewGradeCategory {
    NewGradeCategory {
        name: name.to_string(),
        weight,
        current_score: score,
        is_completed: done,
    }
}

#[tokio::test]
async fn test_replace_grade_categories_swaps_whole_set() {
    let pool = setup_test_db().await;
    let course_id = create_course(&pool, "Biology").await;

    repository::replace_grade_categories(
        &pool,
        &course_id,
        &[
            category("Labs", 30.0, Some(90.0), true),
            category("Midterm", 30.0, Some(75.0), true),
            category("Final", 40.0, None, false),
        ],
    )
    .await
    .expect("Failed to insert categories");

    let replaced = repository::replace_grade_categories(
        &pool,
        &course_id,
        &[
            category("Homework", 50.0, Some(88.0), true),
            category("Exam", 50.0, None, false),
        ],
    )
    .await
    .expect("Failed to replace categories");

    let stored = repository::fetch_grade_categories(&pool, &course_id)
        .await
        .expect("Failed to fetch categories");

    assert_eq!(stored, replaced);
    let names: Vec<&str> = stored.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Homework", "Exam"]);
    assert_eq!(stored[0].current_score, Some(88.0));
    assert!(stored[0].is_completed);
    assert!(!stored[1].is_completed);
}

#[tokio::test]
async fn test_fetch_events_by_filter_in_date_order() {
    let pool = setup_test_db().await;
    let bio = create_course(&pool, "Biology").await;
    let chem = create_course(&pool, "Chemistry").await;

    let mut lecture = new_event(Some(&bio), "Lecture - Biology", "lecture", date(2026, 3, 4));
    lecture.time = Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap());

    let mut conn = pool.acquire().await.unwrap();
    let created = repository::insert_events(
        &mut conn,
        &[
            new_event(Some(&bio), "Exam 1", "exam", date(2026, 3, 10)),
            lecture,
            new_event(Some(&bio), "Lab report", "assignment", date(2026, 3, 4)),
            new_event(Some(&chem), "Quiz 1", "quiz", date(2026, 3, 5)),
            new_event(None, "Career fair", "", date(2026, 3, 6)),
        ],
    )
    .await
    .expect("Failed to insert events");
    drop(conn);

    assert_eq!(created[4].event_type, "other");

    let bio_events = repository::fetch_events(&pool, &EventFilter::Course(bio.clone()))
        .await
        .unwrap();
    let titles: Vec<&str> = bio_events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Lab report", "Lecture - Biology", "Exam 1"]);
    assert_eq!(bio_events[1].time, Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap()));

    let other = repository::fetch_events(&pool, &EventFilter::Other).await.unwrap();
    assert_eq!(other.len(), 1);
    assert_eq!(other[0].course_id, None);

    let all = repository::fetch_events(&pool, &EventFilter::All).await.unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|w| w[0].date <= w[1].date));
}

#[tokio::test]
async fn test_update_and_delete_events() {
    let pool = setup_test_db().await;
    let bio = create_course(&pool, "Biology").await;

    let mut conn = pool.acquire().await.unwrap();
    let created = repository::insert_events(
        &mut conn,
        &[
            new_event(Some(&bio), "Quiz 1", "quiz", date(2026, 4, 1)),
            new_event(Some(&bio), "Quiz 2", "quiz", date(2026, 4, 8)),
            new_event(None, "Reading", "reading", date(2026, 4, 2)),
        ],
    )
    .await
    .unwrap();
    drop(conn);

    let updated = repository::update_event(
        &pool,
        &created[0].id,
        UpdateEventRequest {
            date: Some(date(2026, 4, 3)),
            weight_percent: Some(10.0),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("event should exist");
    assert_eq!(updated.title, "Quiz 1");
    assert_eq!(updated.date, date(2026, 4, 3));
    assert_eq!(updated.weight_percent, Some(10.0));

    let missing = repository::update_event(&pool, "nope", UpdateEventRequest::default())
        .await
        .unwrap();
    assert!(missing.is_none());

    assert!(repository::delete_event(&pool, &created[2].id).await.unwrap());
    assert!(!repository::delete_event(&pool, &created[2].id).await.unwrap());

    let deleted = repository::delete_events(&pool, &EventFilter::Course(bio.clone()))
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert!(repository::fetch_events(&pool, &EventFilter::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deleting_course_removes_owned_rows() {
    let pool = setup_test_db().await;
    let bio = create_course(&pool, "Biology").await;

    repository::replace_grade_categories(&pool, &bio, &[category("Final", 100.0, None, false)])
        .await
        .unwrap();
    let mut conn = pool.acquire().await.unwrap();
    repository::insert_events(
        &mut conn,
        &[
            new_event(Some(&bio), "Final", "exam", date(2026, 5, 1)),
            new_event(None, "Holiday", "other", date(2026, 5, 2)),
        ],
    )
    .await
    .unwrap();
    drop(conn);

    assert!(repository::delete_course(&pool, &bio).await.unwrap());

    assert!(repository::find_course_by_id(&pool, &bio).await.unwrap().is_none());
    assert!(repository::fetch_grade_categories(&pool, &bio).await.unwrap().is_empty());
    let remaining = repository::fetch_events(&pool, &EventFilter::All).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "Holiday");
}

#[tokio::test]
async fn test_study_override_last_write_wins() {
    let pool = setup_test_db().await;

    repository::upsert_study_override(&pool, "ev-2026-03-04", 2.0).await.unwrap();
    repository::upsert_study_override(&pool, "ev-2026-03-04", 4.5).await.unwrap();
    repository::upsert_study_override(&pool, "other-2026-03-05", 1.0).await.unwrap();

    let overrides = repository::fetch_study_overrides(&pool).await.unwrap();
    assert_eq!(overrides.len(), 2);
    let hours = overrides
        .iter()
        .find(|o| o.key == "ev-2026-03-04")
        .map(|o| o.hours);
    assert_eq!(hours, Some(4.5));

    assert!(repository::delete_study_override(&pool, "ev-2026-03-04").await.unwrap());
    assert!(!repository::delete_study_override(&pool, "ev-2026-03-04").await.unwrap());
}

async fn override_keys(pool: &SqlitePool) -> Vec<String> {
    let mut keys: Vec<String> = repository::fetch_study_overrides(pool)
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.key)
        .collect();
    keys.sort();
    keys
}

#[tokio::test]
async fn test_event_changes_drop_stale_study_overrides() {
    let pool = setup_test_db().await;
    let bio = create_course(&pool, "Biology").await;
    let chem = create_course(&pool, "Chemistry").await;

    let mut conn = pool.acquire().await.unwrap();
    let created = repository::insert_events(
        &mut conn,
        &[
            new_event(Some(&bio), "Quiz 1", "quiz", date(2026, 4, 1)),
            new_event(Some(&bio), "Quiz 2", "quiz", date(2026, 4, 8)),
            new_event(None, "Reading", "reading", date(2026, 4, 2)),
            new_event(Some(&chem), "Exam 1", "exam", date(2026, 4, 9)),
        ],
    )
    .await
    .unwrap();
    drop(conn);

    for event in &created {
        repository::upsert_study_override(&pool, &event.recommendation_key(), 3.0)
            .await
            .unwrap();
    }
    repository::upsert_study_override(&pool, "manual-2026-04-01", 1.0).await.unwrap();

    assert_eq!(override_keys(&pool).await.len(), 5);

    // same date keeps the override
    repository::update_event(
        &pool,
        &created[0].id,
        UpdateEventRequest {
            title: Some("Quiz 1 (retake)".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(override_keys(&pool).await.contains(&created[0].recommendation_key()));

    let moved = repository::update_event(
        &pool,
        &created[0].id,
        UpdateEventRequest {
            date: Some(date(2026, 4, 3)),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("event should exist");
    let remaining = override_keys(&pool).await;
    assert!(!remaining.contains(&created[0].recommendation_key()));
    assert!(!remaining.contains(&moved.recommendation_key()));

    assert!(repository::delete_event(&pool, &created[2].id).await.unwrap());
    assert!(!override_keys(&pool).await.contains(&created[2].recommendation_key()));

    repository::delete_events(&pool, &EventFilter::Course(bio.clone()))
        .await
        .unwrap();
    assert!(!override_keys(&pool).await.contains(&created[1].recommendation_key()));

    assert!(repository::delete_course(&pool, &chem).await.unwrap());
    assert_eq!(override_keys(&pool).await, vec!["manual-2026-04-01".to_string()]);
}
