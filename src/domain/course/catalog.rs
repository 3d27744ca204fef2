//! Course catalog entities.
//!
//! Courses and lectures are owned by the catalog; purchases only read them
//! and grow the `enrolled_students` set.

use crate::domain::foundation::{CourseId, LectureId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

use super::UserProfile;

/// Course difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseLevel {
    Beginner,
    Medium,
    Advance,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Medium => "Medium",
            CourseLevel::Advance => "Advance",
        }
    }

    /// Parses the stored representation, returning None for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Beginner" => Some(CourseLevel::Beginner),
            "Medium" => Some(CourseLevel::Medium),
            "Advance" => Some(CourseLevel::Advance),
            _ => None,
        }
    }
}

/// A course offered for sale.
///
/// `price` is in the smallest unit of the configured currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub level: Option<CourseLevel>,
    pub price: Option<i64>,
    pub thumbnail: Option<String>,
    pub creator: UserId,
    pub lectures: Vec<LectureId>,
    pub enrolled_students: Vec<UserId>,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Course {
    /// Price charged at checkout; unpriced courses are free.
    pub fn checkout_price(&self) -> i64 {
        self.price.unwrap_or(0)
    }

    /// Returns true if the user is in the enrolled set.
    pub fn has_student(&self, user_id: &UserId) -> bool {
        self.enrolled_students.contains(user_id)
    }

    /// Adds a student with set semantics.
    pub fn enroll(&mut self, user_id: UserId) {
        if !self.has_student(&user_id) {
            self.enrolled_students.push(user_id);
        }
    }
}

/// A lecture belonging to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: LectureId,
    pub title: String,
    pub video_url: Option<String>,
    pub public_id: Option<String>,
    pub is_preview_free: bool,
}

/// A course with its creator and lectures expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDetail {
    pub course: Course,
    pub creator: Option<UserProfile>,
    pub lectures: Vec<Lecture>,
}
