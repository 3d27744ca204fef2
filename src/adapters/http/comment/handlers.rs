//! HTTP handlers for comment endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::comment::{
    CreateCommentCommand, CreateCommentHandler, DeleteCommentCommand, DeleteCommentHandler,
    GetCourseCommentsHandler, GetCourseCommentsQuery, UpdateCommentCommand, UpdateCommentHandler,
};
use crate::domain::comment::CommentError;
use crate::domain::foundation::{CommentId, CourseId, DomainError};
use crate::ports::{CommentRepository, UserRepository};

use super::dto::{
    CommentResponse, CreateCommentRequest, DataResponse, MessageResponse, UpdateCommentRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for comment endpoints.
#[derive(Clone)]
pub struct CommentAppState {
    pub comments: Arc<dyn CommentRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl CommentAppState {
    pub fn new(comments: Arc<dyn CommentRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { comments, users }
    }

    pub fn create_comment_handler(&self) -> CreateCommentHandler {
        CreateCommentHandler::new(self.comments.clone(), self.users.clone())
    }

    pub fn get_course_comments_handler(&self) -> GetCourseCommentsHandler {
        GetCourseCommentsHandler::new(self.comments.clone(), self.users.clone())
    }

    pub fn update_comment_handler(&self) -> UpdateCommentHandler {
        UpdateCommentHandler::new(self.comments.clone(), self.users.clone())
    }

    pub fn delete_comment_handler(&self) -> DeleteCommentHandler {
        DeleteCommentHandler::new(self.comments.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/comments - Post a comment or a reply
pub async fn create_comment(
    State(state): State<CommentAppState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CommentApiError> {
    let req = json_body(payload)?;
    let course_id = parse_id::<CourseId>("courseId", &req.course_id)?;
    let parent_id = req
        .parent()
        .map(|p| parse_id::<CommentId>("parentId", p))
        .transpose()?;

    let cmd = CreateCommentCommand {
        course_id,
        user_id: user.id,
        parent_id,
        content: req.content,
    };
    let result = state.create_comment_handler().handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(CommentResponse::from(result.comment))),
    ))
}

/// GET /api/v1/comments/:courseId - Top-level comments of a course, newest first
pub async fn get_course_comments(
    State(state): State<CommentAppState>,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, CommentApiError> {
    let query = GetCourseCommentsQuery {
        course_id: parse_id::<CourseId>("courseId", &course_id)?,
    };
    let comments = state.get_course_comments_handler().handle(query).await?;

    let data: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();
    Ok(Json(DataResponse::new(data)))
}

/// PUT /api/v1/comments/:id - Edit own comment
pub async fn update_comment(
    State(state): State<CommentAppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CommentApiError> {
    let req = json_body(payload)?;
    let cmd = UpdateCommentCommand {
        comment_id: parse_id::<CommentId>("id", &id)?,
        user_id: user.id,
        content: req.content,
    };
    let result = state.update_comment_handler().handle(cmd).await?;

    Ok(Json(DataResponse::new(CommentResponse::from(result.comment))))
}

/// DELETE /api/v1/comments/:id - Delete own comment and its replies
pub async fn delete_comment(
    State(state): State<CommentAppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, CommentApiError> {
    let cmd = DeleteCommentCommand {
        comment_id: parse_id::<CommentId>("id", &id)?,
        user_id: user.id,
    };
    state.delete_comment_handler().handle(cmd).await?;

    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}

/// Unwraps a JSON body, turning axum's rejection into a validation failure.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, CommentError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected comment request body");
        CommentError::validation("body", rejection.body_text())
    })
}

fn parse_id<T: FromStr>(field: &str, raw: &str) -> Result<T, CommentError> {
    raw.trim()
        .parse()
        .map_err(|_| CommentError::validation(field, format!("Invalid {}", field)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts comment errors to HTTP responses.
#[derive(Debug)]
pub struct CommentApiError(CommentError);

impl From<CommentError> for CommentApiError {
    fn from(err: CommentError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for CommentApiError {
    fn from(err: DomainError) -> Self {
        Self(CommentError::from(err))
    }
}

impl IntoResponse for CommentApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            CommentError::NotFound(_) => (StatusCode::NOT_FOUND, "COMMENT_NOT_FOUND"),
            CommentError::ParentNotFound(_) => (StatusCode::NOT_FOUND, "PARENT_NOT_FOUND"),
            CommentError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            CommentError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            CommentError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "Comment request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse::new(error_code, self.0.message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryStore;
    use crate::domain::comment::{Comment, CommentAction};
    use crate::domain::foundation::{AuthenticatedUser, UserId};

    fn state(store: &InMemoryStore) -> CommentAppState {
        CommentAppState::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    fn auth(id: &str) -> RequireAuth {
        RequireAuth(AuthenticatedUser::new(UserId::new(id).unwrap(), None))
    }

    async fn seed_comment(store: &InMemoryStore, owner: &str) -> Comment {
        let comment = Comment::new(
            CommentId::new(),
            CourseId::new(),
            UserId::new(owner).unwrap(),
            None,
            "Great course",
        )
        .unwrap();
        CommentRepository::save(store, &comment).await.unwrap();
        comment
    }

    #[tokio::test]
    async fn create_comment_returns_201() {
        let store = InMemoryStore::new();
        let req = CreateCommentRequest {
            content: "Great course".to_string(),
            course_id: CourseId::new().to_string(),
            parent_id: None,
        };

        let response = create_comment(State(state(&store)), auth("u1"), Ok(Json(req)))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(store.comment_count().await, 1);
    }

    #[tokio::test]
    async fn create_comment_rejects_malformed_course_id() {
        let store = InMemoryStore::new();
        let req = CreateCommentRequest {
            content: "hi".to_string(),
            course_id: "not-a-uuid".to_string(),
            parent_id: None,
        };

        let err = create_comment(State(state(&store)), auth("u1"), Ok(Json(req)))
            .await
            .err()
            .unwrap();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.comment_count().await, 0);
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden() {
        let store = InMemoryStore::new();
        let comment = seed_comment(&store, "owner").await;

        let err = update_comment(
            State(state(&store)),
            auth("intruder"),
            Path(comment.id.to_string()),
            Ok(Json(UpdateCommentRequest {
                content: "edited".to_string(),
            })),
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
        assert_eq!(
            store.comment(&comment.id).await.unwrap().content,
            "Great course"
        );
    }

    #[tokio::test]
    async fn delete_missing_comment_is_404() {
        let store = InMemoryStore::new();

        let err = delete_comment(
            State(state(&store)),
            auth("u1"),
            Path(CommentId::new().to_string()),
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_failure_is_500() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);

        let err = get_course_comments(State(state(&store)), Path(CourseId::new().to_string()))
            .await
            .err()
            .unwrap();

        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn error_statuses() {
        let cases = [
            (CommentError::not_found(CommentId::new()), StatusCode::NOT_FOUND),
            (CommentError::parent_not_found(CommentId::new()), StatusCode::NOT_FOUND),
            (CommentError::forbidden(CommentAction::Delete), StatusCode::FORBIDDEN),
            (CommentError::validation("content", "Content is required"), StatusCode::BAD_REQUEST),
            (CommentError::infrastructure("down"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(CommentApiError(err).into_response().status(), status);
        }
    }
}
