//! Comment repository port.
//!
//! Persistence contract for the comment tree. Reply-list mutations are
//! separate single-row operations so adapters can apply them atomically
//! (`array_append` / `array_remove`) without read-modify-write races.

use crate::domain::comment::Comment;
use crate::domain::foundation::{CommentId, CourseId, DomainError};
use async_trait::async_trait;

/// Repository port for Comment persistence.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Save a new comment.
    async fn save(&self, comment: &Comment) -> Result<(), DomainError>;

    /// Persist content and `updated_at` of an existing comment.
    ///
    /// # Errors
    ///
    /// - `CommentNotFound` if the comment doesn't exist
    async fn update(&self, comment: &Comment) -> Result<(), DomainError>;

    /// Find a comment by its ID.
    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, DomainError>;

    /// Find several comments at once. Missing ids are skipped.
    async fn find_many(&self, ids: &[CommentId]) -> Result<Vec<Comment>, DomainError>;

    /// Top-level comments of a course, newest first.
    async fn find_top_level_by_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Comment>, DomainError>;

    /// Append `reply_id` to the parent's reply list.
    ///
    /// Returns false if the parent does not exist.
    async fn add_reply(
        &self,
        parent_id: &CommentId,
        reply_id: &CommentId,
    ) -> Result<bool, DomainError>;

    /// Remove `reply_id` from the parent's reply list. Missing parents are ignored.
    async fn remove_reply(
        &self,
        parent_id: &CommentId,
        reply_id: &CommentId,
    ) -> Result<(), DomainError>;

    /// Delete a single comment.
    async fn delete(&self, id: &CommentId) -> Result<(), DomainError>;

    /// Delete every listed comment. Returns the number deleted.
    async fn delete_many(&self, ids: &[CommentId]) -> Result<u64, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn CommentRepository) {}
    }
}
