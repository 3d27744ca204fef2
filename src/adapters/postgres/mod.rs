//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresCommentRepository` - Comment tree with `UUID[]` reply lists
//! - `PostgresCourseRepository`, `PostgresUserRepository`, `PostgresProgressRepository` - Catalog access
//! - `PostgresPurchaseRepository` - Course purchases
//!
//! Schema lives in `migrations/` and is embedded with `sqlx::migrate!`.

mod catalog_repository;
mod comment_repository;
mod purchase_repository;

pub use catalog_repository::{
    PostgresCourseRepository, PostgresProgressRepository, PostgresUserRepository,
};
pub use comment_repository::PostgresCommentRepository;
pub use purchase_repository::PostgresPurchaseRepository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Open a connection pool sized by `config`.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .connect(&config.url)
        .await
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
