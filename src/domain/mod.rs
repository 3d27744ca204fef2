//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `comment` - Threaded course comments
//! - `course` - Catalog entities read and updated by the services
//! - `purchase` - Course purchases and their lifecycle

pub mod comment;
pub mod course;
pub mod foundation;
pub mod purchase;
