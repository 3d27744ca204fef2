//! HTTP handlers for purchase endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::purchase::{
    CheckoutSettings, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    GetCoursePurchaseStatusHandler, GetCoursePurchaseStatusQuery, HandlePaymentWebhookCommand,
    HandlePaymentWebhookHandler, ListPurchasedCoursesHandler, ListPurchasedCoursesQuery,
};
use crate::domain::foundation::{CourseId, DomainError};
use crate::domain::purchase::PurchaseError;
use crate::ports::{
    CourseRepository, PaymentProvider, ProgressRepository, PurchaseRepository, UserRepository,
};

use super::dto::{
    CheckoutSessionResponse, CourseDetailWithStatusResponse, CreateCheckoutSessionRequest,
    PurchaseResponse, PurchasedCoursesResponse, WebhookAckResponse,
};

/// Header carrying the gateway's webhook signature.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct PurchaseAppState {
    pub courses: Arc<dyn CourseRepository>,
    pub users: Arc<dyn UserRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub purchases: Arc<dyn PurchaseRepository>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub checkout_settings: CheckoutSettings,
}

impl PurchaseAppState {
    pub fn create_checkout_session_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            self.courses.clone(),
            self.purchases.clone(),
            self.payment_provider.clone(),
            self.checkout_settings.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandlePaymentWebhookHandler {
        HandlePaymentWebhookHandler::new(
            self.payment_provider.clone(),
            self.purchases.clone(),
            self.courses.clone(),
            self.users.clone(),
            self.progress.clone(),
        )
    }

    pub fn purchase_status_handler(&self) -> GetCoursePurchaseStatusHandler {
        GetCoursePurchaseStatusHandler::new(self.courses.clone(), self.purchases.clone())
    }

    pub fn purchased_courses_handler(&self) -> ListPurchasedCoursesHandler {
        ListPurchasedCoursesHandler::new(self.purchases.clone(), self.courses.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/purchase/checkout/create-checkout-session - Start checkout for a course
pub async fn create_checkout_session(
    State(state): State<PurchaseAppState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<CreateCheckoutSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PurchaseApiError> {
    let req = payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected checkout request body");
        PurchaseError::validation("body", rejection.body_text())
    })?;
    let cmd = CreateCheckoutSessionCommand {
        user_id: user.id,
        course_id: parse_course_id(&req.course_id)?,
    };
    let result = state.create_checkout_session_handler().handle(cmd).await?;

    Ok(Json(CheckoutSessionResponse::new(result.checkout_url)))
}

/// POST /api/v1/purchase/webhook - Handle gateway webhook events
///
/// Takes the raw body: the signature covers the exact bytes sent.
pub async fn handle_payment_webhook(
    State(state): State<PurchaseAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, PurchaseApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Webhook received without signature header");
            PurchaseError::invalid_webhook_signature("Missing Stripe-Signature header")
        })?;

    let cmd = HandlePaymentWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };
    state.webhook_handler().handle(cmd).await?;

    Ok(Json(WebhookAckResponse { received: true }))
}

/// GET /api/v1/purchase/course/:courseId/detail-with-status - Course detail plus purchase flag
pub async fn get_course_detail_with_status(
    State(state): State<PurchaseAppState>,
    RequireAuth(user): RequireAuth,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, PurchaseApiError> {
    let query = GetCoursePurchaseStatusQuery {
        course_id: parse_course_id(&course_id)?,
        user_id: user.id,
    };
    let status = state.purchase_status_handler().handle(query).await?;

    Ok(Json(CourseDetailWithStatusResponse::from(status)))
}

/// GET /api/v1/purchase - Every completed purchase with its course
pub async fn get_all_purchased_courses(
    State(state): State<PurchaseAppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<impl IntoResponse, PurchaseApiError> {
    let purchased = state
        .purchased_courses_handler()
        .handle(ListPurchasedCoursesQuery)
        .await?;

    Ok(Json(PurchasedCoursesResponse {
        purchased_course: purchased.into_iter().map(PurchaseResponse::from).collect(),
    }))
}

fn parse_course_id(raw: &str) -> Result<CourseId, PurchaseError> {
    raw.trim()
        .parse()
        .map_err(|_| PurchaseError::validation("courseId", "Invalid courseId"))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts purchase errors to HTTP responses.
#[derive(Debug)]
pub struct PurchaseApiError(PurchaseError);

impl From<PurchaseError> for PurchaseApiError {
    fn from(err: PurchaseError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for PurchaseApiError {
    fn from(err: DomainError) -> Self {
        Self(PurchaseError::from(err))
    }
}

impl IntoResponse for PurchaseApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            PurchaseError::CourseNotFound(_) => (StatusCode::NOT_FOUND, "COURSE_NOT_FOUND"),
            PurchaseError::PurchaseNotFound { .. } => (StatusCode::NOT_FOUND, "PURCHASE_NOT_FOUND"),
            PurchaseError::CheckoutUrlMissing => (StatusCode::BAD_REQUEST, "CHECKOUT_URL_MISSING"),
            PurchaseError::InvalidWebhookSignature(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_WEBHOOK_SIGNATURE")
            }
            PurchaseError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            PurchaseError::InvalidState { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            PurchaseError::Gateway(msg) => {
                tracing::error!(error = %msg, "Payment gateway failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "PAYMENT_GATEWAY_ERROR")
            }
            PurchaseError::Infrastructure(msg) => {
                tracing::error!(error = %msg, "Purchase request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse::new(error_code, self.0.message());
        (status, Json(body)).into_response()
    }
}
