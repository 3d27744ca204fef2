//! HTTP adapters - REST API implementations.
//!
//! Each service has its own HTTP adapter; `api_router` mounts them under
//! `/api/v1` next to the health probe.

pub mod comment;
pub mod error;
pub mod middleware;
pub mod purchase;

use axum::{routing::get, Json, Router};

pub use comment::{comment_routes, CommentAppState};
pub use error::ErrorResponse;
pub use middleware::{auth_middleware, AuthState, RequireAuth};
pub use purchase::{purchase_routes, PurchaseAppState};

/// Build the full API router.
///
/// ```text
/// GET  /health
///      /api/v1/comments/...
///      /api/v1/purchase/...
/// ```
pub fn api_router(
    comments: CommentAppState,
    purchases: PurchaseAppState,
    auth: AuthState,
) -> Router {
    let v1 = Router::new()
        .nest("/comments", comment_routes(auth.clone()).with_state(comments))
        .nest("/purchase", purchase_routes(auth).with_state(purchases));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1)
}

/// GET /health - Liveness probe
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
