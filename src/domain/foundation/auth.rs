//! Authentication types for the domain layer.
//!
//! These types represent the caller identified by a validated session token.
//! Any token scheme can populate them via the `SessionValidator` port.
//!
//! ```ignore
//! let user = AuthenticatedUser::new(UserId::new("user-123")?, Some("Alice".into()));
//! request.extensions_mut().insert(user);
//! ```

use super::UserId;
use thiserror::Error;

/// Caller extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier carried by the token.
    pub id: UserId,

    /// Display name if the token carries one.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, display_name: Option<String>) -> Self {
        Self { id, display_name }
    }

    /// Returns the display name, or the user id as fallback.
    pub fn display_name_or_id(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// No token was presented with the request.
    #[error("Missing authentication token")]
    MissingToken,

    /// The token is malformed or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The validator itself could not run (bad key, misconfiguration).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken | AuthError::InvalidToken | AuthError::TokenExpired
        )
    }
}
