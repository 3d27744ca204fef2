//! Stripe-specific wire types.
//!
//! These types represent Stripe API objects as they arrive in webhook payloads
//! and API responses, and map them onto the `PaymentProvider` port types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ports::{PaymentError, WebhookEvent, WebhookEventData, WebhookEventType};

// ════════════════════════════════════════════════════════════════════════════════
// Signature Parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Error parsing the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureParseError {
    /// Header is empty or missing.
    MissingHeader,
    /// A component is not of the form `key=value`.
    MalformedComponent,
    /// Missing timestamp component (t=...).
    MissingTimestamp,
    /// Missing v1 signature component.
    MissingV1Signature,
    /// Invalid timestamp format.
    InvalidTimestamp,
    /// Invalid signature format (not valid hex).
    InvalidSignatureFormat,
}

impl std::fmt::Display for SignatureParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "Missing Stripe-Signature header"),
            Self::MalformedComponent => write!(f, "Malformed Stripe-Signature header"),
            Self::MissingTimestamp => write!(f, "Missing timestamp (t=) in signature"),
            Self::MissingV1Signature => write!(f, "Missing v1 signature in header"),
            Self::InvalidTimestamp => write!(f, "Invalid timestamp format"),
            Self::InvalidSignatureFormat => write!(f, "Invalid signature format (not valid hex)"),
        }
    }
}

impl std::error::Error for SignatureParseError {}

/// Parsed Stripe-Signature header components.
///
/// The header format is `t=timestamp,v1=signature[,v1=...][,v0=legacy]`.
/// Stripe sends several `v1` entries while a signing secret is being rolled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when Stripe signed the event.
    pub timestamp: i64,

    /// v1 signatures (HMAC-SHA256, hex-decoded). Never empty.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parse a Stripe-Signature header into components.
    pub fn parse(header: &str) -> Result<Self, SignatureParseError> {
        let header = header.trim();
        if header.is_empty() {
            return Err(SignatureParseError::MissingHeader);
        }

        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or(SignatureParseError::MalformedComponent)?;

            match key.trim() {
                "t" => {
                    timestamp = Some(
                        value
                            .trim()
                            .parse()
                            .map_err(|_| SignatureParseError::InvalidTimestamp)?,
                    );
                }
                "v1" => {
                    v1_signatures.push(
                        hex_decode(value).ok_or(SignatureParseError::InvalidSignatureFormat)?,
                    );
                }
                // v0 and unknown schemes are ignored
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(SignatureParseError::MissingTimestamp)?;
        if v1_signatures.is_empty() {
            return Err(SignatureParseError::MissingV1Signature);
        }

        Ok(Self {
            timestamp,
            v1_signatures,
        })
    }
}

/// Decode a hex string to bytes.
fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    if hex.len() % 2 != 0 {
        return None;
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| hex.get(i..i + 2).and_then(|b| u8::from_str_radix(b, 16).ok()))
        .collect()
}

/// Encode bytes to hex string.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Event Types
// ════════════════════════════════════════════════════════════════════════════════

/// Raw Stripe webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeWebhookEvent {
    /// Unique event identifier (evt_...).
    pub id: String,

    /// Event type (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp when the event was created.
    pub created: i64,

    /// Event payload containing the affected object.
    pub data: StripeEventData,

    /// Whether this is a live or test event.
    #[serde(default)]
    pub livemode: bool,

    /// Stripe API version used for this event.
    pub api_version: Option<String>,
}

/// Event data container.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object affected by this event.
    pub object: serde_json::Value,
}

impl StripeWebhookEvent {
    /// Map the Stripe event type string onto the port's event type.
    pub fn kind(&self) -> WebhookEventType {
        match self.event_type.as_str() {
            "checkout.session.completed" => WebhookEventType::CheckoutSessionCompleted,
            other => WebhookEventType::Unknown(other.to_string()),
        }
    }

    /// Convert into the provider-agnostic event.
    ///
    /// Checkout events must carry a parseable session object; anything else is
    /// passed through as raw JSON.
    pub fn into_webhook_event(self) -> Result<WebhookEvent, PaymentError> {
        let event_type = self.kind();
        let data = match event_type {
            WebhookEventType::CheckoutSessionCompleted => {
                let session: StripeCheckoutSession = serde_json::from_value(self.data.object)
                    .map_err(|e| {
                        PaymentError::invalid_webhook(format!("Invalid checkout session: {}", e))
                    })?;
                session.into_event_data()
            }
            WebhookEventType::Unknown(_) => WebhookEventData::Raw {
                json: self.data.object.to_string(),
            },
        };

        Ok(WebhookEvent {
            id: self.id,
            event_type,
            data,
            created_at: self.created,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Stripe Object Types
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe Checkout Session object, as returned by the API and in events.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCheckoutSession {
    /// Unique session identifier (cs_...).
    pub id: String,

    /// Hosted checkout page. Absent once the session is complete or expired.
    pub url: Option<String>,

    /// Total charged, in the currency's smallest unit.
    pub amount_total: Option<i64>,

    /// Three-letter currency code, lowercase.
    pub currency: Option<String>,

    /// Session payment status (paid, unpaid, no_payment_required).
    pub payment_status: Option<String>,

    /// Session status (open, complete, expired).
    pub status: Option<String>,

    /// Payment mode (payment, setup, subscription).
    pub mode: Option<String>,

    /// Custom metadata attached to the session.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StripeCheckoutSession {
    /// Course id stored in metadata at checkout.
    pub fn course_id(&self) -> Option<&str> {
        self.metadata.get("courseId").map(String::as_str)
    }

    /// Buyer id stored in metadata at checkout.
    pub fn user_id(&self) -> Option<&str> {
        self.metadata.get("userId").map(String::as_str)
    }

    fn into_event_data(self) -> WebhookEventData {
        WebhookEventData::Checkout {
            course_id: self.course_id().map(str::to_string),
            user_id: self.user_id().map(str::to_string),
            session_id: self.id,
            amount_total: self.amount_total,
            currency: self.currency,
            payment_status: self.payment_status,
        }
    }
}

/// Error envelope returned by the Stripe API.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeApiError,
}

/// Error details returned by the Stripe API.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ════════════════════════════════════════════════════════════════════════════
    // SignatureHeader Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn parse_signature_header_valid() {
        let header = "t=1704067200,v1=5d41402abc4b2a76b9719d911017c592";
        let parsed = SignatureHeader::parse(header).unwrap();

        assert_eq!(parsed.timestamp, 1704067200);
        assert_eq!(
            hex_encode(&parsed.v1_signatures[0]),
            "5d41402abc4b2a76b9719d911017c592"
        );
    }

    #[test]
    fn parse_signature_header_keeps_every_v1_and_skips_v0() {
        let header = "t=1704067200,v1=aabb,v1=ccdd,v0=eeff";
        let parsed = SignatureHeader::parse(header).unwrap();

        assert_eq!(parsed.v1_signatures.len(), 2);
        assert_eq!(hex_encode(&parsed.v1_signatures[1]), "ccdd");
    }

    #[test]
    fn parse_signature_header_missing_timestamp() {
        let result = SignatureHeader::parse("v1=5d41402abc4b2a76b9719d911017c592");
        assert_eq!(result, Err(SignatureParseError::MissingTimestamp));
    }

    #[test]
    fn parse_signature_header_missing_v1() {
        let result = SignatureHeader::parse("t=1704067200,v0=aabbccdd");
        assert_eq!(result, Err(SignatureParseError::MissingV1Signature));
    }

    #[test]
    fn parse_signature_header_empty() {
        assert_eq!(
            SignatureHeader::parse("  "),
            Err(SignatureParseError::MissingHeader)
        );
    }

    #[test]
    fn parse_signature_header_rejects_bad_components() {
        assert_eq!(
            SignatureHeader::parse("t=1704067200,garbage"),
            Err(SignatureParseError::MalformedComponent)
        );
        assert_eq!(
            SignatureHeader::parse("t=soon,v1=aabb"),
            Err(SignatureParseError::InvalidTimestamp)
        );
        assert_eq!(
            SignatureHeader::parse("t=1704067200,v1=abc"),
            Err(SignatureParseError::InvalidSignatureFormat)
        );
        assert_eq!(
            SignatureHeader::parse("t=1704067200,v1=zz"),
            Err(SignatureParseError::InvalidSignatureFormat)
        );
    }

    #[test]
    fn hex_helpers_agree() {
        assert_eq!(hex_encode(&[0x00, 0xff, 0x10]), "00ff10");
        assert_eq!(hex_decode("deadbeef"), Some(vec![0xde, 0xad, 0xbe, 0xef]));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Event Conversion Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn checkout_completed_event_carries_session_and_metadata() {
        let json = r#"{
            "id": "evt_1",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": {
                "object": {
                    "id": "cs_test_abc123",
                    "object": "checkout.session",
                    "amount_total": 450000,
                    "currency": "vnd",
                    "payment_status": "paid",
                    "status": "complete",
                    "mode": "payment",
                    "url": null,
                    "metadata": {"courseId": "c-1", "userId": "u-1"}
                }
            },
            "livemode": false
        }"#;

        let stripe_event: StripeWebhookEvent = serde_json::from_str(json).unwrap();
        let event = stripe_event.into_webhook_event().unwrap();

        assert_eq!(event.event_type, WebhookEventType::CheckoutSessionCompleted);
        match event.data {
            WebhookEventData::Checkout {
                session_id,
                amount_total,
                course_id,
                user_id,
                ..
            } => {
                assert_eq!(session_id, "cs_test_abc123");
                assert_eq!(amount_total, Some(450000));
                assert_eq!(course_id.as_deref(), Some("c-1"));
                assert_eq!(user_id.as_deref(), Some("u-1"));
            }
            other => panic!("unexpected data: {:?}", other),
        }
    }

    #[test]
    fn unknown_event_is_passed_through_raw() {
        let json = r#"{
            "id": "evt_2",
            "type": "payment_intent.created",
            "created": 1704067200,
            "data": {"object": {"id": "pi_1"}}
        }"#;

        let event: StripeWebhookEvent = serde_json::from_str(json).unwrap();
        let event = event.into_webhook_event().unwrap();

        assert_eq!(
            event.event_type,
            WebhookEventType::Unknown("payment_intent.created".to_string())
        );
        assert!(matches!(event.data, WebhookEventData::Raw { .. }));
    }

    #[test]
    fn expired_checkout_is_not_treated_as_completion() {
        let json = r#"{
            "id": "evt_3",
            "type": "checkout.session.expired",
            "created": 1704067200,
            "data": {"object": {"id": "cs_1", "status": "expired"}}
        }"#;

        let event: StripeWebhookEvent = serde_json::from_str(json).unwrap();

        assert_eq!(
            event.kind(),
            WebhookEventType::Unknown("checkout.session.expired".to_string())
        );
    }

    #[test]
    fn checkout_event_without_session_id_is_rejected() {
        let json = r#"{
            "id": "evt_3",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": {"object": {"amount_total": 10}}
        }"#;

        let event: StripeWebhookEvent = serde_json::from_str(json).unwrap();
        let err = event.into_webhook_event().unwrap_err();
        assert!(err.is_invalid_webhook());
    }

    #[test]
    fn api_error_envelope_parses() {
        let json = r#"{"error": {"type": "invalid_request_error", "code": "parameter_missing", "message": "Missing required param: line_items."}}"#;
        let parsed: StripeErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.error.code.as_deref(), Some("parameter_missing"));
    }
}
