//! Authentication configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum secret length accepted in production.
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Authentication configuration (HS256 session tokens)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Shared secret the login service signs session tokens with
    pub jwt_secret: String,
}

impl AuthConfig {
    pub fn secret(&self) -> SecretString {
        SecretString::new(self.jwt_secret.clone())
    }

    /// Validate authentication configuration
    ///
    /// In production, short secrets are rejected.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }

        if *environment == Environment::Production
            && self.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN
        {
            return Err(ValidationError::WeakJwtSecret);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_missing_secret() {
        let config = AuthConfig::default();
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_short_secret_allowed_in_development() {
        let config = AuthConfig {
            jwt_secret: "dev".to_string(),
        };
        assert!(config.validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_short_secret_rejected_in_production() {
        let config = AuthConfig {
            jwt_secret: "dev".to_string(),
        };
        assert!(matches!(
            config.validate(&Environment::Production),
            Err(ValidationError::WeakJwtSecret)
        ));

        let config = AuthConfig {
            jwt_secret: "x".repeat(32),
        };
        assert!(config.validate(&Environment::Production).is_ok());
    }
}
