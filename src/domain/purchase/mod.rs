//! Purchase domain module.
//!
//! Course purchases and their pending/completed lifecycle.

mod aggregate;
mod errors;
mod status;
mod views;

pub use aggregate::CoursePurchase;
pub use errors::PurchaseError;
pub use status::PurchaseStatus;
pub use views::{CoursePurchaseStatus, PurchasedCourse};
