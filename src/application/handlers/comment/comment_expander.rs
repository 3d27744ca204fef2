//! Shared reply and author expansion for comment read paths.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::comment::{author_ids, Comment, CommentView};
use crate::domain::foundation::{CommentId, DomainError};
use crate::ports::{CommentRepository, UserRepository};

/// Expands comments into views with two batched lookups: one for replies and
/// one for every author involved.
#[derive(Clone)]
pub struct CommentExpander {
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentExpander {
    pub fn new(comments: Arc<dyn CommentRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { comments, users }
    }

    pub async fn expand_one(&self, comment: Comment) -> Result<CommentView, DomainError> {
        let mut views = self.expand_all(vec![comment]).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::database("Comment expansion produced no view"))
    }

    /// Expands every comment, preserving input order.
    pub async fn expand_all(&self, comments: Vec<Comment>) -> Result<Vec<CommentView>, DomainError> {
        let reply_ids: Vec<CommentId> = comments
            .iter()
            .flat_map(|c| c.replies.iter().copied())
            .collect();

        let replies: HashMap<CommentId, Comment> = if reply_ids.is_empty() {
            HashMap::new()
        } else {
            self.comments
                .find_many(&reply_ids)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect()
        };

        let user_ids = author_ids(comments.iter().chain(replies.values()));
        let authors = self
            .users
            .find_authors(&user_ids)
            .await?
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect();

        Ok(comments
            .into_iter()
            .map(|c| CommentView::assemble(c, &replies, &authors))
            .collect())
    }
}
