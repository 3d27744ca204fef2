//! HTTP DTOs for comment endpoints.
//!
//! JSON keys are camelCase and ids are exposed as `_id`, the shape the web
//! client already consumes.

use serde::{Deserialize, Serialize};

use crate::domain::comment::{CommentView, ReplyView};
use crate::domain::course::AuthorSummary;
use crate::domain::foundation::UserId;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to post a comment or a reply.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: String,
    pub course_id: String,
    /// Comment being replied to; absent, null or empty for a top-level comment.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl CreateCommentRequest {
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Request to edit a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub content: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// `{success: true, data}` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{success: true, message}` envelope.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Author of a comment: expanded when the user still exists, else the raw id.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AuthorField {
    Expanded(AuthorResponse),
    Id(String),
}

impl AuthorField {
    fn new(user_id: &UserId, author: Option<AuthorSummary>) -> Self {
        match author {
            Some(author) => AuthorField::Expanded(author.into()),
            None => AuthorField::Id(user_id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
}

impl From<AuthorSummary> for AuthorResponse {
    fn from(author: AuthorSummary) -> Self {
        Self {
            id: author.id.to_string(),
            name: author.name,
            avatar: author.avatar,
        }
    }
}

/// A reply nested inside its parent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub course_id: String,
    pub user_id: AuthorField,
    pub parent_id: Option<String>,
    /// Grandchild ids, not expanded.
    pub replies: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ReplyView> for ReplyResponse {
    fn from(view: ReplyView) -> Self {
        Self {
            id: view.id.to_string(),
            content: view.content,
            course_id: view.course_id.to_string(),
            user_id: AuthorField::new(&view.user_id, view.author),
            parent_id: view.parent_id.map(|p| p.to_string()),
            replies: view.replies.iter().map(ToString::to_string).collect(),
            created_at: view.created_at.to_rfc3339(),
            updated_at: view.updated_at.to_rfc3339(),
        }
    }
}

/// A comment with author and replies expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub course_id: String,
    pub user_id: AuthorField,
    pub parent_id: Option<String>,
    pub replies: Vec<ReplyResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CommentView> for CommentResponse {
    fn from(view: CommentView) -> Self {
        Self {
            id: view.id.to_string(),
            content: view.content,
            course_id: view.course_id.to_string(),
            user_id: AuthorField::new(&view.user_id, view.author),
            parent_id: view.parent_id.map(|p| p.to_string()),
            replies: view.replies.into_iter().map(ReplyResponse::from).collect(),
            created_at: view.created_at.to_rfc3339(),
            updated_at: view.updated_at.to_rfc3339(),
        }
    }
}
