//! Payment configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe checkout)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe API key
    pub stripe_api_key: String,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: String,

    /// ISO currency code for course prices
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Web client base URL for checkout redirects
    #[serde(default = "default_client_url")]
    pub client_url: String,

    /// Reject test-mode webhook events
    #[serde(default)]
    pub require_livemode: bool,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    pub fn api_key(&self) -> SecretString {
        SecretString::new(self.stripe_api_key.clone())
    }

    pub fn webhook_secret(&self) -> SecretString {
        SecretString::new(self.stripe_webhook_secret.clone())
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }

        // Verify key prefixes for safety
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if !self.client_url.starts_with("http://") && !self.client_url.starts_with("https://") {
            return Err(ValidationError::InvalidClientUrl);
        }

        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: String::new(),
            stripe_webhook_secret: String::new(),
            currency: default_currency(),
            client_url: default_client_url(),
            require_livemode: false,
        }
    }
}

fn default_currency() -> String {
    "vnd".to_string()
}

fn default_client_url() -> String {
    "http://localhost:5173".to_string()
}
