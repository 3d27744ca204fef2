//! Purchase handlers.
//!
//! ## Commands
//! - Starting a checkout session for a course
//! - Processing payment webhooks
//!
//! ## Queries
//! - Course detail with the caller's purchase status
//! - All completed purchases

mod create_checkout_session;
mod get_course_purchase_status;
mod handle_payment_webhook;
mod list_purchased_courses;

// Commands
pub use create_checkout_session::{
    CheckoutSettings, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreateCheckoutSessionResult,
};
pub use handle_payment_webhook::{
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
};

// Queries
pub use get_course_purchase_status::{GetCoursePurchaseStatusHandler, GetCoursePurchaseStatusQuery};
pub use list_purchased_courses::{ListPurchasedCoursesHandler, ListPurchasedCoursesQuery};
