//! Comment-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | ParentNotFound | 404 |
//! | Forbidden | 403 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{CommentId, DomainError, ErrorCode, ValidationError};

/// What the requester tried to do when an ownership check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Edit,
    Delete,
}

/// Comment-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentError {
    /// Comment was not found.
    NotFound(CommentId),

    /// The comment being replied to does not exist.
    ParentNotFound(CommentId),

    /// Requester is not the author.
    Forbidden(CommentAction),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Store failure.
    Infrastructure(String),
}

impl CommentError {
    pub fn not_found(id: CommentId) -> Self {
        CommentError::NotFound(id)
    }

    pub fn parent_not_found(id: CommentId) -> Self {
        CommentError::ParentNotFound(id)
    }

    pub fn forbidden(action: CommentAction) -> Self {
        CommentError::Forbidden(action)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CommentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        CommentError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CommentError::NotFound(_) | CommentError::ParentNotFound(_) => {
                ErrorCode::CommentNotFound
            }
            CommentError::Forbidden(_) => ErrorCode::Forbidden,
            CommentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            CommentError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        match self {
            CommentError::NotFound(_) => "Comment not found".to_string(),
            CommentError::ParentNotFound(_) => "Parent comment not found".to_string(),
            CommentError::Forbidden(CommentAction::Edit) => {
                "You do not have permission to edit this comment".to_string()
            }
            CommentError::Forbidden(CommentAction::Delete) => {
                "You do not have permission to delete this comment".to_string()
            }
            CommentError::ValidationFailed { message, .. } => message.clone(),
            CommentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for CommentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CommentError {}

impl From<DomainError> for CommentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => CommentError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => CommentError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for CommentError {
    fn from(err: ValidationError) -> Self {
        CommentError::validation(err.field(), err.to_string())
    }
}

impl From<CommentError> for DomainError {
    fn from(err: CommentError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
