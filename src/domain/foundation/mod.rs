//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, traits, and error types
//! that form the vocabulary of the course platform domain.

mod auth;
mod errors;
mod ids;
mod ownership;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CommentId, CourseId, LectureId, ProgressId, PurchaseId, UserId};
pub use ownership::OwnedByUser;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
