//! Comment handlers.
//!
//! ## Commands
//! - Posting comments and replies
//! - Editing a comment (owner only)
//! - Deleting a comment with its replies (owner only)
//!
//! ## Queries
//! - Listing a course's comment threads

mod comment_expander;
mod create_comment;
mod delete_comment;
mod get_course_comments;
mod update_comment;

pub use comment_expander::CommentExpander;

// Commands
pub use create_comment::{CreateCommentCommand, CreateCommentHandler, CreateCommentResult};
pub use delete_comment::{DeleteCommentCommand, DeleteCommentHandler, DeleteCommentResult};
pub use update_comment::{UpdateCommentCommand, UpdateCommentHandler, UpdateCommentResult};

// Queries
pub use get_course_comments::{GetCourseCommentsHandler, GetCourseCommentsQuery};
