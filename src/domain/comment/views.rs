//! Read models for comments with author and reply expansion.

use std::collections::HashMap;

use crate::domain::course::AuthorSummary;
use crate::domain::foundation::{CommentId, CourseId, Timestamp, UserId};

use super::Comment;

/// A reply with its author expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyView {
    pub id: CommentId,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub author: Option<AuthorSummary>,
    pub parent_id: Option<CommentId>,
    pub content: String,
    pub replies: Vec<CommentId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment with its author and its replies' authors expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub id: CommentId,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub author: Option<AuthorSummary>,
    pub parent_id: Option<CommentId>,
    pub content: String,
    pub replies: Vec<ReplyView>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CommentView {
    /// Expands `comment` using already-loaded replies and authors.
    ///
    /// Replies are emitted in the order of `comment.replies`; ids with no
    /// loaded comment are skipped. Authors missing from the map are left
    /// unexpanded.
    pub fn assemble(
        comment: Comment,
        replies: &HashMap<CommentId, Comment>,
        authors: &HashMap<UserId, AuthorSummary>,
    ) -> Self {
        let reply_views = comment
            .replies
            .iter()
            .filter_map(|id| replies.get(id))
            .map(|reply| ReplyView {
                id: reply.id,
                course_id: reply.course_id,
                user_id: reply.user_id.clone(),
                author: authors.get(&reply.user_id).cloned(),
                parent_id: reply.parent_id,
                content: reply.content.clone(),
                replies: reply.replies.clone(),
                created_at: reply.created_at,
                updated_at: reply.updated_at,
            })
            .collect();

        Self {
            author: authors.get(&comment.user_id).cloned(),
            id: comment.id,
            course_id: comment.course_id,
            user_id: comment.user_id,
            parent_id: comment.parent_id,
            content: comment.content,
            replies: reply_views,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// Collects every user id whose summary is needed to expand `comments`.
pub fn author_ids<'a>(comments: impl IntoIterator<Item = &'a Comment>) -> Vec<UserId> {
    let mut ids: Vec<UserId> = comments.into_iter().map(|c| c.user_id.clone()).collect();
    ids.sort();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn summary(id: &str, name: &str) -> AuthorSummary {
        AuthorSummary {
            id: user(id),
            name: name.to_string(),
            avatar: None,
        }
    }

    #[test]
    fn assemble_expands_authors_and_keeps_reply_order() {
        let course = CourseId::new();
        let mut parent = Comment::new(CommentId::new(), course, user("u1"), None, "parent").unwrap();
        let first = Comment::new(CommentId::new(), course, user("u2"), Some(parent.id), "a").unwrap();
        let second = Comment::new(CommentId::new(), course, user("u1"), Some(parent.id), "b").unwrap();
        parent.add_reply(first.id);
        parent.add_reply(second.id);

        let replies: HashMap<_, _> = [first.clone(), second.clone()]
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let authors: HashMap<_, _> = [summary("u1", "Ann"), summary("u2", "Bo")]
            .into_iter()
            .map(|a| (a.id.clone(), a))
            .collect();

        let view = CommentView::assemble(parent, &replies, &authors);

        assert_eq!(view.author.as_ref().map(|a| a.name.as_str()), Some("Ann"));
        assert_eq!(view.replies.len(), 2);
        assert_eq!(view.replies[0].id, first.id);
        assert_eq!(view.replies[0].author.as_ref().map(|a| a.name.as_str()), Some("Bo"));
        assert_eq!(view.replies[1].id, second.id);
    }

    #[test]
    fn assemble_skips_missing_replies_and_authors() {
        let mut parent =
            Comment::new(CommentId::new(), CourseId::new(), user("ghost"), None, "p").unwrap();
        parent.add_reply(CommentId::new());

        let view = CommentView::assemble(parent, &HashMap::new(), &HashMap::new());

        assert!(view.author.is_none());
        assert!(view.replies.is_empty());
    }

    #[test]
    fn author_ids_are_unique() {
        let course = CourseId::new();
        let a = Comment::new(CommentId::new(), course, user("u1"), None, "a").unwrap();
        let b = Comment::new(CommentId::new(), course, user("u1"), None, "b").unwrap();
        let c = Comment::new(CommentId::new(), course, user("u2"), None, "c").unwrap();

        assert_eq!(author_ids([&a, &b, &c]), vec![user("u1"), user("u2")]);
    }
}
