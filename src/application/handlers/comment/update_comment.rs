//! UpdateCommentHandler - Command handler for editing a comment.

use std::sync::Arc;

use crate::domain::comment::{CommentAction, CommentError, CommentView};
use crate::domain::foundation::{CommentId, OwnedByUser, UserId};
use crate::ports::{CommentRepository, UserRepository};

use super::CommentExpander;

/// Command to replace a comment's content.
#[derive(Debug, Clone)]
pub struct UpdateCommentCommand {
    pub comment_id: CommentId,
    pub user_id: UserId,
    pub content: String,
}

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct UpdateCommentResult {
    pub comment: CommentView,
}

/// Handler for editing comments.
pub struct UpdateCommentHandler {
    repository: Arc<dyn CommentRepository>,
    expander: CommentExpander,
}

impl UpdateCommentHandler {
    pub fn new(repository: Arc<dyn CommentRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            expander: CommentExpander::new(repository.clone(), users),
            repository,
        }
    }

    pub async fn handle(&self, cmd: UpdateCommentCommand) -> Result<UpdateCommentResult, CommentError> {
        // 1. Load comment
        let mut comment = self
            .repository
            .find_by_id(&cmd.comment_id)
            .await?
            .ok_or_else(|| CommentError::not_found(cmd.comment_id))?;

        // 2. Authorize - user must be owner
        if !comment.is_owner(&cmd.user_id) {
            tracing::warn!(
                comment_id = %cmd.comment_id,
                user_id = %cmd.user_id,
                "Rejected comment edit by non-owner"
            );
            return Err(CommentError::forbidden(CommentAction::Edit));
        }

        // 3. Apply edit
        comment.edit(cmd.content)?;

        // 4. Persist
        self.repository.update(&comment).await?;

        tracing::info!(comment_id = %comment.id, "Comment updated");

        let comment = self.expander.expand_one(comment).await?;
        Ok(UpdateCommentResult { comment })
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

    async fn setup() -> (InMemoryStore, UpdateCommentHandler, Comment) {
        let store = InMemoryStore::new();
        let comment = Comment::new(CommentId::new(), CourseId::new(), user("owner"), None, "first").unwrap();
        CommentRepository::save(&store, &comment).await.unwrap();
        let handler = UpdateCommentHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));
        (store, handler, comment)
    }

    fn command(comment_id: CommentId, user_id: &str, content: &str) -> UpdateCommentCommand {
        UpdateCommentCommand {
            comment_id,
            user_id: user(user_id),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn owner_can_edit() {
        let (store, handler, comment) = setup().await;

        let result = handler
            .handle(command(comment.id, "owner", "second"))
            .await
            .unwrap();

        assert_eq!(result.comment.content, "second");
        let stored = store.comment(&comment.id).await.unwrap();
        assert_eq!(stored.content, "second");
        assert!(!stored.updated_at.is_before(&comment.updated_at));
    }

    #[tokio::test]
    async fn non_owner_is_forbidden_and_nothing_changes() {
        let (store, handler, comment) = setup().await;

        let err = handler
            .handle(command(comment.id, "intruder", "hijacked"))
            .await
            .unwrap_err();

        assert_eq!(err, CommentError::forbidden(CommentAction::Edit));
        assert_eq!(store.comment(&comment.id).await.unwrap().content, "first");
    }

    #[tokio::test]
    async fn missing_comment_is_not_found() {
        let (_store, handler, _) = setup().await;
        let missing = CommentId::new();

        let err = handler.handle(command(missing, "owner", "x")).await.unwrap_err();

        assert_eq!(err, CommentError::not_found(missing));
    }

    #[tokio::test]
    async fn blank_edit_is_rejected() {
        let (store, handler, comment) = setup().await;

        let err = handler.handle(command(comment.id, "owner", "")).await.unwrap_err();

        assert!(matches!(err, CommentError::ValidationFailed { .. }));
        assert_eq!(store.comment(&comment.id).await.unwrap().content, "first");
    }
}
