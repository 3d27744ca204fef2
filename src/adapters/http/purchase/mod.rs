//! HTTP adapter for purchase endpoints.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{PurchaseApiError, PurchaseAppState};
pub use routes::purchase_routes;
