//! HS256 JWT adapter for session validation.
//!
//! Tokens are signed with a shared secret and carry the caller's id in a
//! `userId` claim (the platform's login endpoint) or in the standard `sub`
//! claim. Expiry is always enforced.
//!
//! # Example
//!
//! ```ignore
//! use course_platform::adapters::auth::JwtSessionValidator;
//!
//! let validator = JwtSessionValidator::new(secret);
//! let user = validator.validate("eyJ...").await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// JWT claims accepted by the validator.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    /// User id as issued by the platform login.
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,

    /// Subject, used when `userId` is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Expiry timestamp (Unix epoch seconds)
    exp: i64,

    /// Issued at timestamp
    #[serde(default)]
    iat: Option<i64>,
}

/// Validates HS256-signed session tokens.
#[derive(Clone)]
pub struct JwtSessionValidator {
    secret: SecretString,
}

impl JwtSessionValidator {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Signs a token for `user_id` valid for `ttl_secs` seconds.
    ///
    /// Used by local tooling and tests; production tokens come from the
    /// login service sharing the same secret.
    pub fn issue(&self, user_id: &UserId, ttl_secs: i64) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            user_id: Some(user_id.to_string()),
            sub: None,
            name: None,
            exp: now + ttl_secs,
            iat: Some(now),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| AuthError::service_unavailable(format!("Failed to sign token: {}", e)))
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());

        let claims = decode::<SessionClaims>(token, &key, &Self::validation())
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    _ => {
                        tracing::debug!(error = %e, "Token validation failed");
                        AuthError::InvalidToken
                    }
                }
            })?
            .claims;

        let raw_id = claims.user_id.or(claims.sub).ok_or_else(|| {
            tracing::warn!("Token carries neither userId nor sub");
            AuthError::InvalidToken
        })?;

        let user_id = UserId::new(raw_id).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(user_id, claims.name))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator").finish_non_exhaustive()
    }
}
