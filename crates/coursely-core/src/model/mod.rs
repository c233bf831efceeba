// ── Domain model ──
//
// Canonical course types shared by the store and its consumers.

pub mod catalog;
pub mod course;
pub mod course_id;
pub mod cover;

pub use catalog::{Category, Level};
pub use course::{Course, CourseDraft, CoursePatch};
pub use course_id::CourseId;
