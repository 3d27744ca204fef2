//! Comment aggregate.
//!
//! Comments form a tree: a top-level comment is attached directly
//! to a course, and a reply carries a back-reference to its parent. The parent
//! keeps the ordered list of its reply ids.

use crate::domain::foundation::{
    CommentId, CourseId, OwnedByUser, Timestamp, UserId, ValidationError,
};
use serde::{Deserialize, Serialize};

use super::CommentError;

/// Maximum length of comment content, in characters.
pub const MAX_CONTENT_LENGTH: usize = 5000;

/// Comment aggregate.
///
/// # Invariants
///
/// - `content` is never blank and at most `MAX_CONTENT_LENGTH` characters
/// - `replies` holds no duplicates and never contains `id`
/// - A comment with a `parent_id` appears in its parent's `replies`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub parent_id: Option<CommentId>,
    pub content: String,
    pub replies: Vec<CommentId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Comment {
    /// Creates a new comment, optionally as a reply to `parent_id`.
    pub fn new(
        id: CommentId,
        course_id: CourseId,
        user_id: UserId,
        parent_id: Option<CommentId>,
        content: impl Into<String>,
    ) -> Result<Self, CommentError> {
        let content = validate_content(content.into())?;
        let now = Timestamp::now();
        Ok(Self {
            id,
            course_id,
            user_id,
            parent_id,
            content,
            replies: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuilds a comment from persisted state without validation.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: CommentId,
        course_id: CourseId,
        user_id: UserId,
        parent_id: Option<CommentId>,
        content: String,
        replies: Vec<CommentId>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            course_id,
            user_id,
            parent_id,
            content,
            replies,
            created_at,
            updated_at,
        }
    }

    /// Returns true if this comment replies to another comment.
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Replaces the content and bumps `updated_at`.
    pub fn edit(&mut self, content: impl Into<String>) -> Result<(), CommentError> {
        self.content = validate_content(content.into())?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Appends a reply id, ignoring ids already present.
    pub fn add_reply(&mut self, reply_id: CommentId) {
        if reply_id != self.id && !self.replies.contains(&reply_id) {
            self.replies.push(reply_id);
        }
    }

    /// Removes a reply id if present.
    pub fn remove_reply(&mut self, reply_id: &CommentId) {
        self.replies.retain(|id| id != reply_id);
    }
}

impl OwnedByUser for Comment {
    fn owner_id(&self) -> &UserId {
        &self.user_id
    }
}

fn validate_content(content: String) -> Result<String, CommentError> {
    if content.trim().is_empty() {
        return Err(ValidationError::empty_field("content").into());
    }
    let len = content.chars().count();
    if len > MAX_CONTENT_LENGTH {
        return Err(ValidationError::too_long("content", MAX_CONTENT_LENGTH, len).into());
    }
    Ok(content)
}
