//! Axum router configuration for comment endpoints.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::adapters::http::middleware::{auth_middleware, AuthState};

use super::handlers::{
    create_comment, delete_comment, get_course_comments, update_comment, CommentAppState,
};

/// Create the comment API router, mounted at `/api/v1/comments`.
///
/// # Routes
///
/// ## Public
/// - `GET /:courseId` - Top-level comments of a course with replies
///
/// ## Authenticated
/// - `POST /` - Post a comment or reply
/// - `PUT /:id` - Edit own comment
/// - `DELETE /:id` - Delete own comment and its replies
///
/// The course id and the comment id share one path segment, so both are
/// captured as `:id` and the handler decides how to parse it.
pub fn comment_routes(auth: AuthState) -> Router<CommentAppState> {
    let protected = Router::new()
        .route("/", post(create_comment))
        .route("/:id", put(update_comment).delete(delete_comment))
        .route_layer(middleware::from_fn_with_state(auth, auth_middleware));

    Router::new()
        .route("/:id", get(get_course_comments))
        .merge(protected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::storage::InMemoryStore;

    #[test]
    fn comment_routes_build_with_state() {
        let store = InMemoryStore::new();
        let state = CommentAppState::new(Arc::new(store.clone()), Arc::new(store));
        let auth: AuthState = Arc::new(MockSessionValidator::new());

        let _: Router<()> = comment_routes(auth).with_state(state);
    }
}
