//! User profile and author projections.

use crate::domain::foundation::{CourseId, UserId};
use serde::{Deserialize, Serialize};

/// A platform user as seen by the course and comment services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub enrolled_courses: Vec<CourseId>,
}

impl UserProfile {
    /// The `{id, name, avatar}` projection shown next to comments.
    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            avatar: self.photo_url.clone(),
        }
    }

    /// Adds a course with set semantics.
    pub fn enroll(&mut self, course_id: CourseId) {
        if !self.enrolled_courses.contains(&course_id) {
            self.enrolled_courses.push(course_id);
        }
    }
}

/// Public author details attached to a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: UserId,
    pub name: String,
    pub avatar: Option<String>,
}
