//! Mock authentication adapter for testing.
//!
//! Implements the `SessionValidator` port for tests, avoiding signed tokens.
//!
//! # Example
//!
//! ```ignore
//! use course_platform::adapters::auth::MockSessionValidator;
//!
//! let validator = MockSessionValidator::new().with_test_user("valid-token", "user-123");
//! let result = validator.validate("valid-token").await;
//! assert!(result.is_ok());
//! ```

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Mock session validator for testing.
///
/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    /// Map of valid tokens to their associated users
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Optional error to return for all validations (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    /// Creates a new empty mock validator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a valid token for the given user id.
    ///
    /// Ids that fail `UserId` validation are skipped.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        match UserId::new(&user_id) {
            Ok(id) => {
                let user = AuthenticatedUser::new(id, Some(format!("Test User {}", user_id)));
                self.with_user(token, user)
            }
            Err(_) => self,
        }
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.error_mut() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.error_mut() = None;
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens_mut().insert(token.into(), user);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens_mut().remove(token);
    }

    fn tokens(&self) -> RwLockReadGuard<'_, HashMap<String, AuthenticatedUser>> {
        self.tokens.read().unwrap_or_else(|p| p.into_inner())
    }

    fn tokens_mut(&self) -> RwLockWriteGuard<'_, HashMap<String, AuthenticatedUser>> {
        self.tokens.write().unwrap_or_else(|p| p.into_inner())
    }

    fn error_mut(&self) -> RwLockWriteGuard<'_, Option<AuthError>> {
        self.force_error.write().unwrap_or_else(|p| p.into_inner())
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let forced = self
            .force_error
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(error) = forced {
            return Err(error);
        }

        self.tokens()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
