//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured checkout sessions
//! - Error injection
//! - Call tracking
//! - Webhook verification with a real signing secret

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use secrecy::SecretString;

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider, WebhookEvent,
    WebhookEventData, WebhookEventType,
};

use super::webhook_types::StripeWebhookEvent;
use super::webhook_verifier::StripeWebhookVerifier;

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Configure responses
/// mock.set_checkout_session(CheckoutSession { id: "cs_123".into(), ... });
///
/// // Inject errors
/// mock.set_error(PaymentError::network("timeout"));
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Next checkout session to return.
    next_checkout: Option<CheckoutSession>,

    /// Requests received by `create_checkout_session`, oldest first.
    checkout_requests: Vec<CreateCheckoutRequest>,

    /// Next webhook event to return.
    next_webhook_event: Option<WebhookEvent>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Names of the port methods called, oldest first.
    call_log: Vec<&'static str>,

    webhook_verify_mode: WebhookVerifyMode,
}

/// How to handle webhook verification.
#[derive(Default, Clone)]
enum WebhookVerifyMode {
    /// Accept any signature and parse the payload.
    #[default]
    AcceptAll,

    /// Verify the Stripe signature with a real secret.
    RequireSignature(StripeWebhookVerifier),

    /// Always fail verification.
    AlwaysFail,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails all webhook verifications.
    pub fn rejecting_webhooks() -> Self {
        let mock = Self::new();
        mock.state().webhook_verify_mode = WebhookVerifyMode::AlwaysFail;
        mock
    }

    /// Create a mock that checks webhook signatures against `secret`.
    pub fn with_webhook_secret(secret: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.state().webhook_verify_mode = WebhookVerifyMode::RequireSignature(
            StripeWebhookVerifier::new(SecretString::new(secret.into())),
        );
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Set the checkout session to return.
    pub fn set_checkout_session(&self, session: CheckoutSession) {
        self.state().next_checkout = Some(session);
    }

    /// Set the webhook event to return on verification.
    pub fn set_webhook_event(&self, event: WebhookEvent) {
        self.state().next_webhook_event = Some(event);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state()
            .method_errors
            .insert(method.to_string(), error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|called| *called == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|called| **called == method)
            .count()
    }

    /// The most recent checkout request.
    pub fn last_checkout_request(&self) -> Option<CreateCheckoutRequest> {
        self.state().checkout_requests.last().cloned()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Event Builders
    // ════════════════════════════════════════════════════════════════════════════

    /// A `checkout.session.completed` event for the given session.
    pub fn checkout_completed_event(session_id: &str, amount_total: Option<i64>) -> WebhookEvent {
        WebhookEvent {
            id: format!("evt_checkout_{}", short_id()),
            event_type: WebhookEventType::CheckoutSessionCompleted,
            data: WebhookEventData::Checkout {
                session_id: session_id.to_string(),
                amount_total,
                currency: Some("usd".to_string()),
                payment_status: Some("paid".to_string()),
                course_id: None,
                user_id: None,
            },
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_call(&self, method: &'static str) {
        self.state().call_log.push(method);
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        // Method-specific errors persist
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Global error is consumed
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.record_call("create_checkout_session");
        self.check_error("create_checkout_session")?;

        let mut state = self.state();
        state.checkout_requests.push(request);

        let session = state.next_checkout.take().unwrap_or_else(|| {
            let id = format!("cs_mock_{}", short_id());
            CheckoutSession {
                url: Some(format!("https://checkout.stripe.com/c/pay/{}", id)),
                id,
            }
        });

        Ok(session)
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.record_call("verify_webhook");
        self.check_error("verify_webhook")?;

        let state = self.state();

        match &state.webhook_verify_mode {
            WebhookVerifyMode::AcceptAll => {}
            WebhookVerifyMode::RequireSignature(verifier) => {
                return verifier.verify(payload, signature);
            }
            WebhookVerifyMode::AlwaysFail => {
                return Err(PaymentError::invalid_webhook("Verification disabled"));
            }
        }

        if let Some(event) = &state.next_webhook_event {
            return Ok(event.clone());
        }

        let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload)
            .map_err(|e| PaymentError::invalid_webhook(e.to_string()))?;
        stripe_event.into_webhook_event()
    }
}
