//! Property-based tests for comment threads.
//!
//! Random sequences of posts, replies and deletes are applied through the
//! application handlers; after every step the stored tree must agree with a
//! simple model of live comments.

use std::sync::Arc;

use proptest::prelude::*;

use course_platform::adapters::InMemoryStore;
use course_platform::application::handlers::comment::{
    CreateCommentCommand, CreateCommentHandler, DeleteCommentCommand, DeleteCommentHandler,
};
use course_platform::domain::comment::{Comment, MAX_CONTENT_LENGTH};
use course_platform::domain::foundation::{CommentId, CourseId, UserId};

#[derive(Debug, Clone)]
enum Op {
    Post,
    /// Reply to the n-th live top-level comment (modulo count).
    Reply(usize),
    /// Delete the n-th live comment (modulo count).
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Post),
        any::<usize>().prop_map(Op::Reply),
        any::<usize>().prop_map(Op::Delete),
    ]
}

/// Live comments in creation order, with their parent.
#[derive(Default)]
struct Model {
    live: Vec<(CommentId, Option<CommentId>)>,
}

impl Model {
    fn top_level(&self) -> Vec<CommentId> {
        self.live
            .iter()
            .filter(|(_, parent)| parent.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    fn children(&self, parent: &CommentId) -> Vec<CommentId> {
        self.live
            .iter()
            .filter(|(_, p)| p.as_ref() == Some(parent))
            .map(|(id, _)| *id)
            .collect()
    }

    fn delete(&mut self, id: &CommentId) {
        self.live.retain(|(c, parent)| c != id && parent.as_ref() != Some(id));
    }
}

async fn run(ops: Vec<Op>) -> Result<(), TestCaseError> {
    let store = InMemoryStore::new();
    let create = CreateCommentHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));
    let delete = DeleteCommentHandler::new(Arc::new(store.clone()));
    let course = CourseId::new();
    let user = UserId::new("author").unwrap();
    let mut model = Model::default();

    for op in ops {
        match op {
            Op::Post => {
                let result = create
                    .handle(CreateCommentCommand {
                        course_id: course,
                        user_id: user.clone(),
                        parent_id: None,
                        content: "top".to_string(),
                    })
                    .await;
                prop_assert!(result.is_ok());
                if let Ok(result) = result {
                    model.live.push((result.comment.id, None));
                }
            }
            Op::Reply(n) => {
                let parents = model.top_level();
                if parents.is_empty() {
                    continue;
                }
                let parent = parents[n % parents.len()];
                let result = create
                    .handle(CreateCommentCommand {
                        course_id: course,
                        user_id: user.clone(),
                        parent_id: Some(parent),
                        content: "reply".to_string(),
                    })
                    .await;
                prop_assert!(result.is_ok());
                if let Ok(result) = result {
                    model.live.push((result.comment.id, Some(parent)));
                }
            }
            Op::Delete(n) => {
                if model.live.is_empty() {
                    continue;
                }
                let (target, _) = model.live[n % model.live.len()];
                let result = delete
                    .handle(DeleteCommentCommand {
                        comment_id: target,
                        user_id: user.clone(),
                    })
                    .await;
                prop_assert!(result.is_ok());
                model.delete(&target);
            }
        }

        // Store agrees with the model
        prop_assert_eq!(store.comment_count().await, model.live.len());
        for (id, parent) in &model.live {
            let stored = store.comment(id).await;
            prop_assert!(stored.is_some(), "live comment {} missing", id);
            if let Some(stored) = stored {
                prop_assert_eq!(&stored.parent_id, parent);
                prop_assert_eq!(stored.replies, model.children(id));
            }
        }
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Reply lists always mirror the replies that exist, through any mix
    /// of posts, replies and cascading deletes.
    #[test]
    fn reply_lists_track_live_replies(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(run(ops))?;
    }

    /// Content is accepted exactly when it has a visible character and fits the limit.
    #[test]
    fn content_validation(content in "[ a-z\\t]{0,40}", extra in 0usize..3) {
        let padded = if extra == 0 {
            content.clone()
        } else {
            format!("{}{}", content, "x".repeat(MAX_CONTENT_LENGTH))
        };

        let result = Comment::new(
            CommentId::new(),
            CourseId::new(),
            UserId::new("author").unwrap(),
            None,
            padded.clone(),
        );

        let visible = !padded.trim().is_empty();
        let fits = padded.chars().count() <= MAX_CONTENT_LENGTH;
        prop_assert_eq!(result.is_ok(), visible && fits);
    }
}
