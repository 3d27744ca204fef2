//! PostgreSQL pool settings

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_POOL_SIZE: u32 = 100;

/// Store backend settings.
///
/// An empty `url` selects the in-memory store; production requires one.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,

    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty()
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.is_configured() {
            return Err(ValidationError::MissingRequired("DATABASE_URL"));
        }
        if !["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
        {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            min_connections: 1,
            max_connections: 10,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            run_migrations: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_url(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn blank_url_means_in_memory() {
        assert!(!DatabaseConfig::default().is_configured());
        assert!(!with_url("   ").is_configured());
        assert!(matches!(
            with_url("  ").validate(),
            Err(ValidationError::MissingRequired("DATABASE_URL"))
        ));
    }

    #[test]
    fn only_postgres_urls_are_accepted() {
        assert!(with_url("postgres://app@localhost/courses").validate().is_ok());
        assert!(with_url("postgresql://app@localhost/courses").validate().is_ok());
        assert!(matches!(
            with_url("mongodb://localhost/courses").validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        ));
    }

    #[test]
    fn pool_bounds_are_checked() {
        let inverted = DatabaseConfig {
            min_connections: 8,
            max_connections: 4,
            ..with_url("postgres://localhost/courses")
        };
        assert!(matches!(inverted.validate(), Err(ValidationError::InvalidPoolSize)));

        let oversized = DatabaseConfig {
            max_connections: MAX_POOL_SIZE + 1,
            ..with_url("postgres://localhost/courses")
        };
        assert!(matches!(oversized.validate(), Err(ValidationError::PoolSizeTooLarge)));
    }

    #[test]
    fn durations_come_from_seconds() {
        let config = DatabaseConfig {
            acquire_timeout_secs: 3,
            idle_timeout_secs: 60,
            max_lifetime_secs: 120,
            ..Default::default()
        };
        assert_eq!(config.acquire_timeout(), Duration::from_secs(3));
        assert_eq!(config.idle_timeout(), Duration::from_secs(60));
        assert_eq!(config.max_lifetime(), Duration::from_secs(120));
    }
}
