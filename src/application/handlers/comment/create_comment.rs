//! CreateCommentHandler - Command handler for posting comments and replies.

use std::sync::Arc;

use crate::domain::comment::{Comment, CommentError, CommentView};
use crate::domain::foundation::{CommentId, CourseId, UserId};
use crate::ports::{CommentRepository, UserRepository};

use super::CommentExpander;

/// Command to post a comment on a course, optionally as a reply.
#[derive(Debug, Clone)]
pub struct CreateCommentCommand {
    pub course_id: CourseId,
    pub user_id: UserId,
    pub parent_id: Option<CommentId>,
    pub content: String,
}

/// Result of a successful post.
#[derive(Debug, Clone)]
pub struct CreateCommentResult {
    pub comment: CommentView,
}

/// Handler for posting comments.
pub struct CreateCommentHandler {
    repository: Arc<dyn CommentRepository>,
    expander: CommentExpander,
}

impl CreateCommentHandler {
    pub fn new(repository: Arc<dyn CommentRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            expander: CommentExpander::new(repository.clone(), users),
            repository,
        }
    }

    pub async fn handle(&self, cmd: CreateCommentCommand) -> Result<CreateCommentResult, CommentError> {
        // 1. Build and validate
        let comment = Comment::new(
            CommentId::new(),
            cmd.course_id,
            cmd.user_id,
            cmd.parent_id,
            cmd.content,
        )?;

        // 2. Parent must exist before anything is written
        if let Some(parent_id) = comment.parent_id {
            if self.repository.find_by_id(&parent_id).await?.is_none() {
                return Err(CommentError::parent_not_found(parent_id));
            }
        }

        // 3. Persist
        self.repository.save(&comment).await?;

        // 4. Link into the parent's reply list
        if let Some(parent_id) = comment.parent_id {
            if !self.repository.add_reply(&parent_id, &comment.id).await? {
                // Parent vanished between the check and the link
                self.repository.delete(&comment.id).await?;
                return Err(CommentError::parent_not_found(parent_id));
            }
        }

        tracing::info!(
            comment_id = %comment.id,
            course_id = %comment.course_id,
            parent_id = ?comment.parent_id,
            "Comment created"
        );

        // 5. Expand author
        let comment = self.expander.expand_one(comment).await?;

        Ok(CreateCommentResult { comment })
    }
}
