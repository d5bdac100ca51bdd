pub mod course;
pub mod event;
pub mod grade_category;
pub mod study_override;

pub use course::{Course, CourseDetail, CreatedCourse, NewCourseRequest, UpdateCourseRequest};
pub use event::{CalendarEvent, CreateEventsRequest, EventFilter, NewEventRequest, UpdateEventRequest};
pub use grade_category::{GradeCategory, NewGradeCategory, ReplaceGradeCategoriesRequest};
pub use study_override::{SetStudyHoursRequest, StudyHoursOverride};
