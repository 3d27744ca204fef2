//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `CommentRepository` - Comment tree persistence
//! - `PurchaseRepository` - Course purchase persistence
//! - `CourseRepository`, `UserRepository`, `ProgressRepository` - Catalog access
//!
//! ## External Service Ports
//!
//! - `PaymentProvider` - Hosted checkout and webhook verification
//! - `SessionValidator` - Session token validation

mod comment_repository;
mod course_repository;
mod payment_provider;
mod purchase_repository;
mod session_validator;

pub use comment_repository::CommentRepository;
pub use course_repository::{CourseRepository, ProgressRepository, UserRepository};
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
    WebhookEvent, WebhookEventData, WebhookEventType,
};
pub use purchase_repository::PurchaseRepository;
pub use session_validator::SessionValidator;
