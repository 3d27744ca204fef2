//! Course catalog module.
//!
//! Entities owned by other parts of the platform that the comment and
//! purchase services read or update: courses, lectures, users, progress.

mod catalog;
mod progress;
mod user;

pub use catalog::{Course, CourseDetail, CourseLevel, Lecture};
pub use progress::{CourseProgress, LectureProgress};
pub use user::{AuthorSummary, UserProfile};
