//! Course progress records.

use crate::domain::foundation::{CourseId, LectureId, ProgressId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Viewing state of one lecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LectureProgress {
    pub lecture_id: LectureId,
    pub viewed: bool,
}

/// A learner's progress through a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseProgress {
    pub id: ProgressId,
    pub user_id: UserId,
    pub course_id: CourseId,
    pub completed: bool,
    pub lecture_progress: Vec<LectureProgress>,
    pub created_at: Timestamp,
}

impl CourseProgress {
    /// Fresh progress for a newly enrolled learner: nothing viewed.
    pub fn start(user_id: UserId, course_id: CourseId) -> Self {
        Self {
            id: ProgressId::new(),
            user_id,
            course_id,
            completed: false,
            lecture_progress: Vec::new(),
            created_at: Timestamp::now(),
        }
    }
}
