//! Catalog ports: courses, users, and progress records.
//!
//! These entities belong to other parts of the platform. The services here
//! only read them, grow the enrolled sets, and create progress records.

use crate::domain::course::{AuthorSummary, Course, CourseDetail, CourseProgress, UserProfile};
use crate::domain::foundation::{CourseId, DomainError, UserId};
use async_trait::async_trait;

/// Read and enrollment access to courses.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Find a course by its ID.
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;

    /// Find several courses at once. Missing ids are skipped.
    async fn find_many(&self, ids: &[CourseId]) -> Result<Vec<Course>, DomainError>;

    /// Find a course with its creator and lectures expanded.
    async fn find_detail(&self, id: &CourseId) -> Result<Option<CourseDetail>, DomainError>;

    /// Add a student to the course's enrolled set (no duplicates).
    async fn add_enrolled_student(
        &self,
        course_id: &CourseId,
        user_id: &UserId,
    ) -> Result<(), DomainError>;
}

/// Read and enrollment access to users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by its ID.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Author summaries for the given users. Unknown ids are skipped.
    async fn find_authors(&self, ids: &[UserId]) -> Result<Vec<AuthorSummary>, DomainError>;

    /// Add a course to the user's enrolled set (no duplicates).
    async fn add_enrolled_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<(), DomainError>;
}

/// Creation of course progress records.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Persist a new progress record.
    async fn create(&self, progress: &CourseProgress) -> Result<(), DomainError>;

    /// All progress records for a user/course pair.
    async fn find_by_user_and_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Vec<CourseProgress>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ports_are_object_safe() {
        fn _course(_repo: &dyn CourseRepository) {}
        fn _user(_repo: &dyn UserRepository) {}
        fn _progress(_repo: &dyn ProgressRepository) {}
    }
}
