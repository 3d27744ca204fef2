//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API:
//! one-off hosted checkout sessions and webhook verification.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key, webhook_secret);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
    WebhookEvent,
};

use super::webhook_types::{StripeCheckoutSession, StripeErrorResponse};
use super::webhook_verifier::StripeWebhookVerifier;

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Webhook signing secret (whsec_...).
    webhook_secret: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Whether to require livemode events in production.
    require_livemode: bool,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>, webhook_secret: impl Into<String>) -> Self {
        Self::from_secrets(
            SecretString::new(api_key.into()),
            SecretString::new(webhook_secret.into()),
        )
    }

    /// Create a configuration from already-wrapped secrets.
    pub fn from_secrets(api_key: SecretString, webhook_secret: SecretString) -> Self {
        Self {
            api_key,
            webhook_secret,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            require_livemode: false,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Require livemode events in production.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    verifier: StripeWebhookVerifier,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        let verifier = StripeWebhookVerifier::new(config.webhook_secret.clone())
            .with_require_livemode(config.require_livemode);
        Self {
            config,
            verifier,
            http_client: reqwest::Client::new(),
        }
    }
}

/// Form fields for a one-item card payment session.
fn checkout_form(request: &CreateCheckoutRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("payment_method_types[0]", "card".to_string()),
        ("mode", "payment".to_string()),
        (
            "line_items[0][price_data][currency]",
            request.currency.to_lowercase(),
        ),
        (
            "line_items[0][price_data][product_data][name]",
            request.course_title.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]",
            request.unit_amount.to_string(),
        ),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
        ("metadata[courseId]", request.course_id.to_string()),
        ("metadata[userId]", request.user_id.to_string()),
    ];

    if let Some(thumbnail) = request.course_thumbnail.as_ref().filter(|t| !t.is_empty()) {
        params.push((
            "line_items[0][price_data][product_data][images][0]",
            thumbnail.clone(),
        ));
    }

    params
}

/// Classify a non-success Stripe response.
fn api_error(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let code = match status.as_u16() {
        401 | 403 => PaymentErrorCode::AuthenticationError,
        400 | 402 | 404 => PaymentErrorCode::InvalidRequest,
        429 => PaymentErrorCode::RateLimitExceeded,
        _ => PaymentErrorCode::ProviderError,
    };

    match serde_json::from_str::<StripeErrorResponse>(body) {
        Ok(parsed) => {
            let message = parsed
                .error
                .message
                .unwrap_or_else(|| format!("Stripe API error ({})", status));
            let err = PaymentError::new(code, message);
            match parsed.error.code.or(parsed.error.error_type) {
                Some(provider_code) => err.with_provider_code(provider_code),
                None => err,
            }
        }
        Err(_) => PaymentError::new(code, format!("Stripe API error: {}", body)),
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = checkout_form(&request);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                course_id = %request.course_id,
                "Stripe rejected checkout session"
            );
            return Err(api_error(status, &error_text));
        }

        let stripe_session: StripeCheckoutSession = response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })?;

        tracing::info!(
            session_id = %stripe_session.id,
            course_id = %request.course_id,
            user_id = %request.user_id,
            "Created Stripe checkout session"
        );

        Ok(CheckoutSession {
            id: stripe_session.id,
            url: stripe_session.url,
        })
    }

    async fn verify_webhook(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> Result<WebhookEvent, PaymentError> {
        self.verifier.verify(payload, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::sign_payload;
    use crate::domain::foundation::{CourseId, UserId};
    use crate::ports::{WebhookEventData, WebhookEventType};

    fn request() -> CreateCheckoutRequest {
        CreateCheckoutRequest {
            course_id: CourseId::new(),
            user_id: UserId::new("user-1").unwrap(),
            course_title: "Rust for Beginners".to_string(),
            course_thumbnail: Some("https://cdn.example.com/rust.png".to_string()),
            unit_amount: 450000,
            currency: "VND".to_string(),
            success_url: "http://localhost:5173/course-progress/x?success=true".to_string(),
            cancel_url: "http://localhost:5173/course-detail/x".to_string(),
        }
    }

    fn field<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn config_trims_base_url() {
        let config = StripeConfig::new("sk_test", "whsec_test").with_base_url("http://localhost:12111/");
        assert_eq!(config.api_base_url, "http://localhost:12111");
    }

    #[test]
    fn checkout_form_describes_one_card_payment() {
        let req = request();
        let params = checkout_form(&req);

        assert_eq!(field(&params, "mode"), Some("payment"));
        assert_eq!(field(&params, "payment_method_types[0]"), Some("card"));
        assert_eq!(field(&params, "line_items[0][quantity]"), Some("1"));
        assert_eq!(field(&params, "line_items[0][price_data][currency]"), Some("vnd"));
        assert_eq!(
            field(&params, "line_items[0][price_data][unit_amount]"),
            Some("450000")
        );
        assert_eq!(
            field(&params, "line_items[0][price_data][product_data][name]"),
            Some("Rust for Beginners")
        );
        assert_eq!(
            field(&params, "line_items[0][price_data][product_data][images][0]"),
            Some("https://cdn.example.com/rust.png")
        );
        assert_eq!(
            field(&params, "metadata[courseId]"),
            Some(req.course_id.to_string().as_str())
        );
        assert_eq!(field(&params, "metadata[userId]"), Some("user-1"));
    }

    #[test]
    fn checkout_form_omits_missing_thumbnail() {
        let mut req = request();
        req.course_thumbnail = Some(String::new());

        let params = checkout_form(&req);
        assert!(field(&params, "line_items[0][price_data][product_data][images][0]").is_none());
    }

    #[test]
    fn api_error_reads_stripe_envelope() {
        let body = r#"{"error":{"type":"invalid_request_error","code":"amount_too_small","message":"Amount must be at least 50 cents"}}"#;
        let err = api_error(reqwest::StatusCode::BAD_REQUEST, body);

        assert_eq!(err.code, PaymentErrorCode::InvalidRequest);
        assert_eq!(err.provider_code.as_deref(), Some("amount_too_small"));
        assert_eq!(err.message, "Amount must be at least 50 cents");
    }

    #[test]
    fn api_error_classifies_status() {
        assert_eq!(
            api_error(reqwest::StatusCode::UNAUTHORIZED, "nope").code,
            PaymentErrorCode::AuthenticationError
        );
        assert_eq!(
            api_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "").code,
            PaymentErrorCode::RateLimitExceeded
        );
        assert_eq!(
            api_error(reqwest::StatusCode::BAD_GATEWAY, "").code,
            PaymentErrorCode::ProviderError
        );
    }

    #[tokio::test]
    async fn verify_webhook_uses_configured_secret() {
        let adapter = StripePaymentAdapter::new(StripeConfig::new("sk_test", "whsec_abc"));
        let payload = r#"{"id":"evt_1","type":"checkout.session.completed","created":1704067200,"data":{"object":{"id":"cs_1","amount_total":500,"metadata":{"courseId":"c","userId":"u"}}}}"#;
        let header = sign_payload("whsec_abc", chrono::Utc::now().timestamp(), payload.as_bytes());

        let event = adapter
            .verify_webhook(payload.as_bytes(), &header)
            .await
            .unwrap();

        assert_eq!(event.event_type, WebhookEventType::CheckoutSessionCompleted);
        assert!(matches!(
            event.data,
            WebhookEventData::Checkout { ref session_id, .. } if session_id == "cs_1"
        ));
    }

    #[tokio::test]
    async fn verify_webhook_rejects_foreign_signature() {
        let adapter = StripePaymentAdapter::new(StripeConfig::new("sk_test", "whsec_abc"));
        let payload = br#"{"id":"evt_1"}"#;
        let header = sign_payload("whsec_other", chrono::Utc::now().timestamp(), payload);

        let err = adapter.verify_webhook(payload, &header).await.unwrap_err();
        assert!(err.is_invalid_webhook());
    }
}
