//! Stripe webhook signature verification.
//!
//! HMAC-SHA256 over `"{timestamp}.{payload}"` with the endpoint's signing
//! secret, compared in constant time against every `v1` signature in the
//! header. Timestamps older than five minutes are rejected.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::ports::{PaymentError, WebhookEvent};

use super::webhook_types::{hex_encode, SignatureHeader, StripeWebhookEvent};

type HmacSha256 = Hmac<Sha256>;

/// Maximum age for webhook events (5 minutes).
const MAX_TIMESTAMP_AGE_SECS: i64 = 300;

/// Clock skew tolerance for future timestamps (60 seconds).
const MAX_FUTURE_TOLERANCE_SECS: i64 = 60;

/// Verifier for Stripe webhook signatures.
#[derive(Clone)]
pub struct StripeWebhookVerifier {
    secret: SecretString,
    require_livemode: bool,
}

impl StripeWebhookVerifier {
    /// Creates a verifier for the given signing secret (whsec_...).
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            require_livemode: false,
        }
    }

    /// Reject test-mode events.
    pub fn with_require_livemode(mut self, require: bool) -> Self {
        self.require_livemode = require;
        self
    }

    /// Verifies the signature header and parses the event.
    pub fn verify(&self, payload: &[u8], signature: &str) -> Result<WebhookEvent, PaymentError> {
        let header = SignatureHeader::parse(signature).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse Stripe-Signature header");
            PaymentError::invalid_webhook(e.to_string())
        })?;

        self.validate_timestamp(header.timestamp, chrono::Utc::now().timestamp())?;

        let expected = compute_signature(self.secret.expose_secret(), header.timestamp, payload)?;
        let matched = header
            .v1_signatures
            .iter()
            .any(|provided| constant_time_eq(&expected, provided));
        if !matched {
            tracing::warn!(timestamp = header.timestamp, "Invalid webhook signature");
            return Err(PaymentError::invalid_webhook(
                "No signatures found matching the expected signature for payload",
            ));
        }

        let stripe_event: StripeWebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "Failed to parse webhook payload");
            PaymentError::invalid_webhook(format!("Invalid JSON: {}", e))
        })?;

        if self.require_livemode && !stripe_event.livemode {
            tracing::warn!(event_id = %stripe_event.id, "Rejected test mode event");
            return Err(PaymentError::invalid_webhook(
                "Test mode events not allowed in production",
            ));
        }

        let event = stripe_event.into_webhook_event()?;
        tracing::info!(
            event_id = %event.id,
            event_type = ?event.event_type,
            "Webhook signature verified"
        );
        Ok(event)
    }

    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), PaymentError> {
        let age = now - timestamp;

        if age > MAX_TIMESTAMP_AGE_SECS {
            tracing::warn!(
                event_timestamp = timestamp,
                current_time = now,
                age_secs = age,
                "Webhook event too old"
            );
            return Err(PaymentError::invalid_webhook(
                "Timestamp outside the tolerance zone",
            ));
        }

        if age < -MAX_FUTURE_TOLERANCE_SECS {
            tracing::warn!(
                event_timestamp = timestamp,
                current_time = now,
                "Webhook event from the future"
            );
            return Err(PaymentError::invalid_webhook("Event timestamp in future"));
        }

        Ok(())
    }
}

fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, PaymentError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentError::invalid_webhook(format!("Unusable signing secret: {}", e)))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

/// Builds a `Stripe-Signature` header value for `payload`.
///
/// Used to replay events locally and to build signed fixtures.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    match compute_signature(secret, timestamp, payload) {
        Ok(signature) => format!("t={},v1={}", timestamp, hex_encode(&signature)),
        Err(_) => format!("t={}", timestamp),
    }
}
