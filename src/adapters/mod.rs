//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Session token validation (JWT, mock)
//! - `http` - Axum REST endpoints
//! - `postgres` - PostgreSQL store adapters
//! - `storage` - In-memory store adapter
//! - `stripe` - Stripe checkout and webhook verification

pub mod auth;
pub mod http;
pub mod postgres;
pub mod storage;
pub mod stripe;

pub use auth::{JwtSessionValidator, MockSessionValidator};
pub use postgres::{
    PostgresCommentRepository, PostgresCourseRepository, PostgresProgressRepository,
    PostgresPurchaseRepository, PostgresUserRepository,
};
pub use storage::InMemoryStore;
pub use stripe::{MockPaymentProvider, StripeConfig, StripePaymentAdapter};
