use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::models::{
    CalendarEvent, Course, EventFilter, GradeCategory, NewCourseRequest, NewEventRequest,
    NewGradeCategory, StudyHoursOverride, UpdateCourseRequest, UpdateEventRequest,
};
use crate::models::event::DEFAULT_EVENT_TYPE;

const COURSE_COLUMNS: &str =
    "id, name, code, color, syllabus_text, lecture_times, created_at";
const CATEGORY_COLUMNS: &str = "id, course_id, name, weight, current_score, is_completed";
const EVENT_COLUMNS: &str =
    "id, course_id, title, description, event_type, date, time, weight_percent";

/// Overrides are keyed `<event id>-<date>`; callers close the subquery with
/// their own event predicate.
const DELETE_EVENT_OVERRIDES: &str = "DELETE FROM study_hour_overrides WHERE EXISTS \
    (SELECT 1 FROM events e WHERE instr(study_hour_overrides.key, e.id || '-') = 1";

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC"
    ))
    .fetch_all(db)
    .await
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_course(
    conn: &mut SqliteConnection,
    req: &NewCourseRequest,
) -> Result<Course, sqlx::Error> {
    let course = Course {
        id: Uuid::new_v4().to_string(),
        name: req.name.clone(),
        code: req.code.clone(),
        color: req.color.clone(),
        syllabus_text: req.syllabus_text.clone(),
        lecture_times: req.lecture_times.clone(),
        created_at: Utc::now().to_rfc3339(),
    };

    sqlx::query(
        r#"
        INSERT INTO courses
            (id, name, code, color, syllabus_text, lecture_times, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&course.id)
    .bind(&course.name)
    .bind(&course.code)
    .bind(&course.color)
    .bind(&course.syllabus_text)
    .bind(&course.lecture_times)
    .bind(&course.created_at)
    .execute(conn)
    .await?;

    Ok(course)
}

pub async fn update_course(
    db: &SqlitePool,
    id: &str,
    req: UpdateCourseRequest,
) -> Result<Option<Course>, sqlx::Error> {
    let mut current = match find_course_by_id(db, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    if let Some(name) = req.name {
        current.name = name;
    }
    if let Some(code) = req.code {
        current.code = code;
    }
    if let Some(color) = req.color {
        current.color = Some(color);
    }
    if let Some(text) = req.syllabus_text {
        current.syllabus_text = Some(text);
    }
    if let Some(times) = req.lecture_times {
        current.lecture_times = Some(times);
    }

    sqlx::query(
        r#"
        UPDATE courses
        SET name = ?1,
            code = ?2,
            color = ?3,
            syllabus_text = ?4,
            lecture_times = ?5
        WHERE id = ?6
        "#,
    )
    .bind(&current.name)
    .bind(&current.code)
    .bind(&current.color)
    .bind(&current.syllabus_text)
    .bind(&current.lecture_times)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

/// Deletes the course; its grade categories, events and their study-hour
/// overrides go with it.
pub async fn delete_course(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query(&format!("{DELETE_EVENT_OVERRIDES} AND e.course_id = ?)"))
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(result > 0)
}

pub async fn fetch_grade_categories(
    db: &SqlitePool,
    course_id: &str,
) -> Result<Vec<GradeCategory>, sqlx::Error> {
    sqlx::query_as::<_, GradeCategory>(&format!(
        "SELECT {CATEGORY_COLUMNS} FROM grade_categories WHERE course_id = ? ORDER BY position ASC"
    ))
    .bind(course_id)
    .fetch_all(db)
    .await
}

/// Swaps the whole category set of a course in one transaction.
pub async fn replace_grade_categories(
    db: &SqlitePool,
    course_id: &str,
    categories: &[NewGradeCategory],
) -> Result<Vec<GradeCategory>, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("DELETE FROM grade_categories WHERE course_id = ?")
        .bind(course_id)
        .execute(&mut *tx)
        .await?;

    let mut created = Vec::with_capacity(categories.len());
    for (position, category) in categories.iter().enumerate() {
        let row = GradeCategory {
            id: Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            name: category.name.clone(),
            weight: category.weight,
            current_score: category.current_score,
            is_completed: category.is_completed,
        };

        sqlx::query(
            r#"
            INSERT INTO grade_categories
                (id, course_id, name, weight, current_score, is_completed, position)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&row.id)
        .bind(&row.course_id)
        .bind(&row.name)
        .bind(row.weight)
        .bind(row.current_score)
        .bind(row.is_completed)
        .bind(position as i64)
        .execute(&mut *tx)
        .await?;

        created.push(row);
    }

    tx.commit().await?;
    Ok(created)
}

pub async fn fetch_events(
    db: &SqlitePool,
    filter: &EventFilter,
) -> Result<Vec<CalendarEvent>, sqlx::Error> {
    let order = "ORDER BY date ASC, time ASC";
    match filter {
        EventFilter::All => {
            sqlx::query_as::<_, CalendarEvent>(&format!("SELECT {EVENT_COLUMNS} FROM events {order}"))
                .fetch_all(db)
                .await
        }
        EventFilter::Other => {
            sqlx::query_as::<_, CalendarEvent>(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE course_id IS NULL {order}"
            ))
            .fetch_all(db)
            .await
        }
        EventFilter::Course(course_id) => {
            sqlx::query_as::<_, CalendarEvent>(&format!(
                "SELECT {EVENT_COLUMNS} FROM events WHERE course_id = ? {order}"
            ))
            .bind(course_id)
            .fetch_all(db)
            .await
        }
    }
}

pub async fn find_event_by_id(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<CalendarEvent>, sqlx::Error> {
    sqlx::query_as::<_, CalendarEvent>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Inserts every event on `conn`; callers wrap it in a transaction.
pub async fn insert_events(
    conn: &mut SqliteConnection,
    events: &[NewEventRequest],
) -> Result<Vec<CalendarEvent>, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let mut created = Vec::with_capacity(events.len());

    for req in events {
        let event = CalendarEvent {
            id: Uuid::new_v4().to_string(),
            course_id: req.course_id.clone(),
            title: req.title.clone(),
            description: req.description.clone(),
            event_type: req
                .event_type
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
            date: req.date,
            time: req.time,
            weight_percent: req.weight_percent,
        };

        sqlx::query(
            r#"
            INSERT INTO events
                (id, course_id, title, description, event_type, date, time, weight_percent, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&event.id)
        .bind(&event.course_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.event_type)
        .bind(event.date)
        .bind(event.time)
        .bind(event.weight_percent)
        .bind(&now)
        .execute(&mut *conn)
        .await?;

        created.push(event);
    }

    Ok(created)
}

pub async fn update_event(
    db: &SqlitePool,
    id: &str,
    req: UpdateEventRequest,
) -> Result<Option<CalendarEvent>, sqlx::Error> {
    let mut current = match find_event_by_id(db, id).await? {
        Some(e) => e,
        None => return Ok(None),
    };

    if let Some(title) = req.title {
        current.title = title;
    }
    if let Some(description) = req.description {
        current.description = Some(description);
    }
    if let Some(event_type) = req.event_type {
        current.event_type = event_type;
    }
    let old_date = current.date;
    if let Some(date) = req.date {
        current.date = date;
    }
    if let Some(weight) = req.weight_percent {
        current.weight_percent = Some(weight);
    }
    if let Some(course_id) = req.course_id {
        current.course_id = Some(course_id);
    }

    let mut tx = db.begin().await?;

    if current.date != old_date {
        delete_overrides_for_event(&mut *tx, id).await?;
    }

    sqlx::query(
        r#"
        UPDATE events
        SET title = ?1,
            description = ?2,
            event_type = ?3,
            date = ?4,
            weight_percent = ?5,
            course_id = ?6
        WHERE id = ?7
        "#,
    )
    .bind(&current.title)
    .bind(&current.description)
    .bind(&current.event_type)
    .bind(current.date)
    .bind(current.weight_percent)
    .bind(&current.course_id)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(current))
}

async fn delete_overrides_for_event(
    conn: &mut SqliteConnection,
    event_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM study_hour_overrides WHERE instr(key, ?) = 1")
        .bind(format!("{event_id}-"))
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

/// Deletes the event together with its study-hour overrides.
pub async fn delete_event(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let mut tx = db.begin().await?;

    delete_overrides_for_event(&mut *tx, id).await?;
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(result > 0)
}

pub async fn delete_events(db: &SqlitePool, filter: &EventFilter) -> Result<u64, sqlx::Error> {
    let mut tx = db.begin().await?;

    let result = match filter {
        EventFilter::All => {
            sqlx::query(&format!("{DELETE_EVENT_OVERRIDES})"))
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM events").execute(&mut *tx).await?
        }
        EventFilter::Other => {
            sqlx::query(&format!("{DELETE_EVENT_OVERRIDES} AND e.course_id IS NULL)"))
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM events WHERE course_id IS NULL")
                .execute(&mut *tx)
                .await?
        }
        EventFilter::Course(course_id) => {
            sqlx::query(&format!("{DELETE_EVENT_OVERRIDES} AND e.course_id = ?)"))
                .bind(course_id)
                .execute(&mut *tx)
                .await?;
            sqlx::query("DELETE FROM events WHERE course_id = ?")
                .bind(course_id)
                .execute(&mut *tx)
                .await?
        }
    };

    tx.commit().await?;
    Ok(result.rows_affected())
}

pub async fn fetch_study_overrides(db: &SqlitePool) -> Result<Vec<StudyHoursOverride>, sqlx::Error> {
    sqlx::query_as::<_, StudyHoursOverride>(
        "SELECT key, hours, updated_at FROM study_hour_overrides ORDER BY updated_at DESC",
    )
    .fetch_all(db)
    .await
}

/// Last write wins.
pub async fn upsert_study_override(db: &SqlitePool, key: &str, hours: f64) -> Result<(), sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    sqlx::query(
        r#"
        INSERT INTO study_hour_overrides (key, hours, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET hours = excluded.hours, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(hours)
    .bind(now)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn delete_study_override(db: &SqlitePool, key: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM study_hour_overrides WHERE key = ?")
        .bind(key)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
