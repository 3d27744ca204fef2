//! PostgreSQL implementation of CommentRepository.
//!
//! Reply lists are `UUID[]` columns mutated with `array_append`/`array_remove`
//! so each link change is a single statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::foundation::{
    CommentId, CourseId, DomainError, ErrorCode, Timestamp, UserId,
};
use crate::ports::CommentRepository;

/// PostgreSQL implementation of the CommentRepository port.
pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a comment.
#[derive(Debug, sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    course_id: Uuid,
    user_id: String,
    parent_id: Option<Uuid>,
    content: String,
    replies: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CommentRow> for Comment {
    type Error = DomainError;

    fn try_from(row: CommentRow) -> Result<Self, Self::Error> {
        let user_id = UserId::new(row.user_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
        })?;

        Ok(Comment::reconstitute(
            CommentId::from_uuid(row.id),
            CourseId::from_uuid(row.course_id),
            user_id,
            row.parent_id.map(CommentId::from_uuid),
            row.content,
            row.replies.into_iter().map(CommentId::from_uuid).collect(),
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        ))
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, course_id, user_id, parent_id, content, replies, created_at, updated_at FROM comments";

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

fn uuids(ids: &[CommentId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn save(&self, comment: &Comment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO comments (
                id, course_id, user_id, parent_id, content, replies, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(comment.id.as_uuid())
        .bind(comment.course_id.as_uuid())
        .bind(comment.user_id.as_str())
        .bind(comment.parent_id.map(|p| *p.as_uuid()))
        .bind(&comment.content)
        .bind(uuids(&comment.replies))
        .bind(comment.created_at.as_datetime())
        .bind(comment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save comment", e))?;

        Ok(())
    }

    async fn update(&self, comment: &Comment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE comments SET content = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(comment.id.as_uuid())
        .bind(&comment.content)
        .bind(comment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update comment", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::CommentNotFound,
                format!("Comment not found: {}", comment.id),
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, DomainError> {
        let row: Option<CommentRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch comment", e))?;

        row.map(Comment::try_from).transpose()
    }

    async fn find_many(&self, ids: &[CommentId]) -> Result<Vec<Comment>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<CommentRow> =
            sqlx::query_as(&format!("{} WHERE id = ANY($1)", SELECT_COLUMNS))
                .bind(uuids(ids))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("fetch comments", e))?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn find_top_level_by_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Comment>, DomainError> {
        let rows: Vec<CommentRow> = sqlx::query_as(&format!(
            "{} WHERE course_id = $1 AND parent_id IS NULL ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch course comments", e))?;

        rows.into_iter().map(Comment::try_from).collect()
    }

    async fn add_reply(
        &self,
        parent_id: &CommentId,
        reply_id: &CommentId,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE comments SET replies = array_append(replies, $2)
            WHERE id = $1
            "#,
        )
        .bind(parent_id.as_uuid())
        .bind(reply_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("link reply", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_reply(
        &self,
        parent_id: &CommentId,
        reply_id: &CommentId,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE comments SET replies = array_remove(replies, $2)
            WHERE id = $1
            "#,
        )
        .bind(parent_id.as_uuid())
        .bind(reply_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("unlink reply", e))?;

        Ok(())
    }

    async fn delete(&self, id: &CommentId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete comment", e))?;

        Ok(())
    }

    async fn delete_many(&self, ids: &[CommentId]) -> Result<u64, DomainError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM comments WHERE id = ANY($1)")
            .bind(uuids(ids))
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete replies", e))?;

        Ok(result.rows_affected())
    }
}
