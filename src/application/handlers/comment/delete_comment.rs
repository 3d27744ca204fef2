//! DeleteCommentHandler - Command handler for removing a comment and its replies.

use std::sync::Arc;

use crate::domain::comment::{CommentAction, CommentError};
use crate::domain::foundation::{CommentId, OwnedByUser, UserId};
use crate::ports::CommentRepository;

/// Command to delete a comment.
#[derive(Debug, Clone)]
pub struct DeleteCommentCommand {
    pub comment_id: CommentId,
    pub user_id: UserId,
}

/// Result of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCommentResult {
    pub comment_id: CommentId,
    pub deleted_replies: u64,
}

/// Handler for deleting comments.
///
/// Only direct replies are removed with the comment.
pub struct DeleteCommentHandler {
    repository: Arc<dyn CommentRepository>,
}

impl DeleteCommentHandler {
    pub fn new(repository: Arc<dyn CommentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteCommentCommand) -> Result<DeleteCommentResult, CommentError> {
        // 1. Load comment
        let comment = self
            .repository
            .find_by_id(&cmd.comment_id)
            .await?
            .ok_or_else(|| CommentError::not_found(cmd.comment_id))?;

        // 2. Authorize - user must be owner
        if !comment.is_owner(&cmd.user_id) {
            tracing::warn!(
                comment_id = %cmd.comment_id,
                user_id = %cmd.user_id,
                "Rejected comment delete by non-owner"
            );
            return Err(CommentError::forbidden(CommentAction::Delete));
        }

        // 3. Unlink from parent
        if let Some(parent_id) = comment.parent_id {
            self.repository.remove_reply(&parent_id, &comment.id).await?;
        }

        // 4. Remove replies, then the comment itself
        let deleted_replies = if comment.replies.is_empty() {
            0
        } else {
            self.repository.delete_many(&comment.replies).await?
        };
        self.repository.delete(&comment.id).await?;

        tracing::info!(
            comment_id = %comment.id,
            deleted_replies,
            "Comment deleted"
        );

        Ok(DeleteCommentResult {
            comment_id: comment.id,
            deleted_replies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryStore;
    use crate::domain::comment::Comment;
    use crate::domain::foundation::CourseId;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    /// A parent owned by "owner" with two replies by "other".
    async fn thread(store: &InMemoryStore) -> (Comment, Comment, Comment) {
        let course = CourseId::new();
        let mut parent = Comment::new(CommentId::new(), course, user("owner"), None, "parent").unwrap();
        let a = Comment::new(CommentId::new(), course, user("other"), Some(parent.id), "a").unwrap();
        let b = Comment::new(CommentId::new(), course, user("other"), Some(parent.id), "b").unwrap();
        parent.add_reply(a.id);
        parent.add_reply(b.id);
        for c in [&parent, &a, &b] {
            CommentRepository::save(store, c).await.unwrap();
        }
        (parent, a, b)
    }

    #[tokio::test]
    async fn deleting_parent_removes_its_replies() {
        let store = InMemoryStore::new();
        let (parent, _, _) = thread(&store).await;
        let handler = DeleteCommentHandler::new(Arc::new(store.clone()));

        let result = handler
            .handle(DeleteCommentCommand {
                comment_id: parent.id,
                user_id: user("owner"),
            })
            .await
            .unwrap();

        assert_eq!(result.deleted_replies, 2);
        assert_eq!(store.comment_count().await, 0);
    }

    #[tokio::test]
    async fn deleting_reply_unlinks_it_from_parent() {
        let store = InMemoryStore::new();
        let (parent, a, b) = thread(&store).await;
        let handler = DeleteCommentHandler::new(Arc::new(store.clone()));

        handler
            .handle(DeleteCommentCommand {
                comment_id: a.id,
                user_id: user("other"),
            })
            .await
            .unwrap();

        assert!(store.comment(&a.id).await.is_none());
        assert_eq!(store.comment(&parent.id).await.unwrap().replies, vec![b.id]);
    }

    #[tokio::test]
    async fn non_owner_cannot_delete() {
        let store = InMemoryStore::new();
        let (parent, _, _) = thread(&store).await;
        let handler = DeleteCommentHandler::new(Arc::new(store.clone()));

        let err = handler
            .handle(DeleteCommentCommand {
                comment_id: parent.id,
                user_id: user("other"),
            })
            .await
            .unwrap_err();

        assert_eq!(err, CommentError::forbidden(CommentAction::Delete));
        assert_eq!(store.comment_count().await, 3);
    }

    #[tokio::test]
    async fn missing_comment_is_not_found() {
        let store = InMemoryStore::new();
        let handler = DeleteCommentHandler::new(Arc::new(store));
        let missing = CommentId::new();

        let err = handler
            .handle(DeleteCommentCommand {
                comment_id: missing,
                user_id: user("owner"),
            })
            .await
            .unwrap_err();

        assert_eq!(err, CommentError::not_found(missing));
    }
}
