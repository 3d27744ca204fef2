//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `COURSE_PLATFORM` prefix
//! and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use course_platform::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod payment;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Session token configuration
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `COURSE_PLATFORM__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `COURSE_PLATFORM__DATABASE__URL=...` -> `database.url = ...`
    /// - `COURSE_PLATFORM__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or cannot be
    /// parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COURSE_PLATFORM")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Outside production an empty database URL is accepted and selects the
    /// in-memory store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if self.database.is_configured() || self.is_production() {
            self.database.validate()?;
        }
        self.auth.validate(&self.server.environment)?;
        self.payment.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "COURSE_PLATFORM__DATABASE__URL",
        "COURSE_PLATFORM__AUTH__JWT_SECRET",
        "COURSE_PLATFORM__PAYMENT__STRIPE_API_KEY",
        "COURSE_PLATFORM__PAYMENT__STRIPE_WEBHOOK_SECRET",
        "COURSE_PLATFORM__PAYMENT__CURRENCY",
        "COURSE_PLATFORM__SERVER__PORT",
        "COURSE_PLATFORM__SERVER__ENVIRONMENT",
    ];

    fn set_minimal_env() {
        env::set_var("COURSE_PLATFORM__AUTH__JWT_SECRET", "local-dev-secret");
        env::set_var("COURSE_PLATFORM__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
        env::set_var("COURSE_PLATFORM__PAYMENT__STRIPE_WEBHOOK_SECRET", "whsec_xxx");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|p| p.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_from_environment() {
        let result = load_with(&[]);

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.auth.jwt_secret, "local-dev-secret");
        assert_eq!(config.payment.currency, "vnd");
        assert!(!config.database.is_configured());
    }

    #[test]
    fn test_validate_without_database_in_development() {
        let config = load_with(&[]).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_requires_database() {
        let config = load_with(&[
            ("COURSE_PLATFORM__SERVER__ENVIRONMENT", "production"),
            ("COURSE_PLATFORM__AUTH__JWT_SECRET", "0123456789abcdef0123456789abcdef"),
        ])
        .unwrap();

        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_configured_database_is_validated() {
        let config = load_with(&[("COURSE_PLATFORM__DATABASE__URL", "mysql://localhost/courses")])
            .unwrap();

        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        ));
    }

    #[test]
    fn test_server_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_custom_server_port_and_currency() {
        let config = load_with(&[
            ("COURSE_PLATFORM__SERVER__PORT", "3000"),
            ("COURSE_PLATFORM__PAYMENT__CURRENCY", "usd"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.payment.currency, "usd");
    }
}
