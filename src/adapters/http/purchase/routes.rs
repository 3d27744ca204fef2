//! Axum router configuration for purchase endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::adapters::http::middleware::{auth_middleware, AuthState};

use super::handlers::{
    create_checkout_session, get_all_purchased_courses, get_course_detail_with_status,
    handle_payment_webhook, PurchaseAppState,
};

/// Create the purchase API router, mounted at `/api/v1/purchase`.
///
/// # Routes
///
/// ## Authenticated
/// - `POST /checkout/create-checkout-session` - Start checkout for a course
/// - `GET /course/:courseId/detail-with-status` - Course detail plus purchase flag
/// - `GET /` - All completed purchases
///
/// ## Webhook (no auth, signature verified)
/// - `POST /webhook` - Gateway events
pub fn purchase_routes(auth: AuthState) -> Router<PurchaseAppState> {
    Router::new()
        .route(
            "/checkout/create-checkout-session",
            post(create_checkout_session),
        )
        .route(
            "/course/:course_id/detail-with-status",
            get(get_course_detail_with_status),
        )
        .route("/", get(get_all_purchased_courses))
        .route_layer(middleware::from_fn_with_state(auth, auth_middleware))
        .merge(webhook_routes())
}

/// Webhook routes live outside the auth layer: the gateway has no session
/// token and is authenticated by signature instead.
pub fn webhook_routes() -> Router<PurchaseAppState> {
    Router::new().route("/webhook", post(handle_payment_webhook))
}
