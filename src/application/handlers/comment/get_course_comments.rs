//! GetCourseCommentsHandler - Query handler for a course's comment threads.

use std::sync::Arc;

use crate::domain::comment::{CommentError, CommentView};
use crate::domain::foundation::CourseId;
use crate::ports::{CommentRepository, UserRepository};

use super::CommentExpander;

/// Query for every top-level comment of a course.
#[derive(Debug, Clone)]
pub struct GetCourseCommentsQuery {
    pub course_id: CourseId,
}

/// Handler for listing course comments.
pub struct GetCourseCommentsHandler {
    repository: Arc<dyn CommentRepository>,
    expander: CommentExpander,
}

impl GetCourseCommentsHandler {
    pub fn new(repository: Arc<dyn CommentRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            expander: CommentExpander::new(repository.clone(), users),
            repository,
        }
    }

    /// Top-level comments, newest first, each with replies and authors expanded.
    pub async fn handle(&self, query: GetCourseCommentsQuery) -> Result<Vec<CommentView>, CommentError> {
        let comments = self
            .repository
            .find_top_level_by_course(&query.course_id)
            .await?;

        Ok(self.expander.expand_all(comments).await?)
    }
}
