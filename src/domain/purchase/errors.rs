//! Purchase-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | CourseNotFound | 404 |
//! | PurchaseNotFound | 404 |
//! | CheckoutUrlMissing | 400 |
//! | ValidationFailed | 400 |
//! | InvalidWebhookSignature | 400 |
//! | InvalidState | 409 |
//! | Gateway | 500 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{CourseId, DomainError, ErrorCode};

/// Purchase-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    /// The course being bought or looked up does not exist.
    CourseNotFound(CourseId),

    /// No purchase carries the gateway session id.
    PurchaseNotFound { session_id: String },

    /// The gateway created a session without a hosted checkout URL.
    CheckoutUrlMissing,

    /// The gateway rejected the request or could not be reached.
    Gateway(String),

    /// Webhook payload failed the authenticity check.
    InvalidWebhookSignature(String),

    /// The purchase cannot make the requested transition.
    InvalidState { current: String, attempted: String },

    /// Request input was malformed.
    ValidationFailed { field: String, message: String },

    /// Store failure.
    Infrastructure(String),
}

impl PurchaseError {
    pub fn course_not_found(id: CourseId) -> Self {
        PurchaseError::CourseNotFound(id)
    }

    pub fn purchase_not_found(session_id: impl Into<String>) -> Self {
        PurchaseError::PurchaseNotFound {
            session_id: session_id.into(),
        }
    }

    pub fn checkout_url_missing() -> Self {
        PurchaseError::CheckoutUrlMissing
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        PurchaseError::Gateway(message.into())
    }

    pub fn invalid_webhook_signature(reason: impl Into<String>) -> Self {
        PurchaseError::InvalidWebhookSignature(reason.into())
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        PurchaseError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PurchaseError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PurchaseError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PurchaseError::CourseNotFound(_) => ErrorCode::CourseNotFound,
            PurchaseError::PurchaseNotFound { .. } => ErrorCode::PurchaseNotFound,
            PurchaseError::CheckoutUrlMissing | PurchaseError::Gateway(_) => {
                ErrorCode::PaymentGatewayError
            }
            PurchaseError::InvalidWebhookSignature(_) => ErrorCode::InvalidWebhookSignature,
            PurchaseError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            PurchaseError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            PurchaseError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing message.
    pub fn message(&self) -> String {
        match self {
            PurchaseError::CourseNotFound(_) => "Course not found!".to_string(),
            PurchaseError::PurchaseNotFound { .. } => "Purchase not found".to_string(),
            PurchaseError::CheckoutUrlMissing => "Error while creating session".to_string(),
            PurchaseError::Gateway(_) => "Failed to create checkout session".to_string(),
            PurchaseError::InvalidWebhookSignature(reason) => {
                format!("Webhook error: {}", reason)
            }
            PurchaseError::InvalidState { current, attempted } => {
                format!("Cannot {} purchase in {} state", attempted, current)
            }
            PurchaseError::ValidationFailed { message, .. } => message.clone(),
            PurchaseError::Infrastructure(_) => "Internal Server Error".to_string(),
        }
    }
}

impl std::fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PurchaseError {}

impl From<DomainError> for PurchaseError {
    fn from(err: DomainError) -> Self {
        PurchaseError::Infrastructure(err.to_string())
    }
}

impl From<PurchaseError> for DomainError {
    fn from(err: PurchaseError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_variants() {
        assert_eq!(
            PurchaseError::course_not_found(CourseId::new()).code(),
            ErrorCode::CourseNotFound
        );
        assert_eq!(
            PurchaseError::purchase_not_found("cs_1").code(),
            ErrorCode::PurchaseNotFound
        );
        assert_eq!(
            PurchaseError::checkout_url_missing().code(),
            ErrorCode::PaymentGatewayError
        );
        assert_eq!(
            PurchaseError::invalid_webhook_signature("bad").code(),
            ErrorCode::InvalidWebhookSignature
        );
    }

    #[test]
    fn gateway_details_are_not_leaked() {
        let err = PurchaseError::gateway("sk_live_... rejected");
        assert_eq!(err.message(), "Failed to create checkout session");
    }

    #[test]
    fn store_failures_become_infrastructure() {
        let err: PurchaseError = DomainError::database("timeout").into();
        assert!(matches!(err, PurchaseError::Infrastructure(_)));
        assert_eq!(err.message(), "Internal Server Error");
    }

    #[test]
    fn signature_message_includes_reason() {
        let err = PurchaseError::invalid_webhook_signature("timestamp outside tolerance");
        assert_eq!(err.to_string(), "Webhook error: timestamp outside tolerance");
    }
}
