//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod comment;
pub mod purchase;

pub use comment::{
    CommentExpander, CreateCommentCommand, CreateCommentHandler, CreateCommentResult,
    DeleteCommentCommand, DeleteCommentHandler, DeleteCommentResult, GetCourseCommentsHandler,
    GetCourseCommentsQuery, UpdateCommentCommand, UpdateCommentHandler, UpdateCommentResult,
};
pub use purchase::{
    CheckoutSettings, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreateCheckoutSessionResult, GetCoursePurchaseStatusHandler, GetCoursePurchaseStatusQuery,
    HandlePaymentWebhookCommand, HandlePaymentWebhookHandler, HandlePaymentWebhookResult,
    ListPurchasedCoursesHandler, ListPurchasedCoursesQuery,
};
