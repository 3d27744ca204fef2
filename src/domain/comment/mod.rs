//! Comment domain module.
//!
//! Threaded course comments: top-level comments and one level of replies.

mod aggregate;
mod errors;
mod views;

pub use aggregate::{Comment, MAX_CONTENT_LENGTH};
pub use errors::{CommentAction, CommentError};
pub use views::{author_ids, CommentView, ReplyView};
