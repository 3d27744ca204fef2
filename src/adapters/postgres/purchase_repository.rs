//! PostgreSQL implementation of PurchaseRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, PurchaseId, Timestamp, UserId};
use crate::domain::purchase::{CoursePurchase, PurchaseStatus};
use crate::ports::PurchaseRepository;

/// PostgreSQL implementation of the PurchaseRepository port.
pub struct PostgresPurchaseRepository {
    pool: PgPool,
}

impl PostgresPurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a purchase.
#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: Uuid,
    course_id: Uuid,
    user_id: String,
    amount: i64,
    status: String,
    payment_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for CoursePurchase {
    type Error = DomainError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        let status = PurchaseStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid status value: {}", row.status),
            )
        })?;
        let user_id = UserId::new(row.user_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
        })?;

        Ok(CoursePurchase {
            id: PurchaseId::from_uuid(row.id),
            course_id: CourseId::from_uuid(row.course_id),
            user_id,
            amount: row.amount,
            status,
            payment_id: row.payment_id,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, course_id, user_id, amount, status, payment_id, created_at, updated_at
    FROM course_purchases
"#;

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl PurchaseRepository for PostgresPurchaseRepository {
    async fn save(&self, purchase: &CoursePurchase) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO course_purchases (
                id, course_id, user_id, amount, status, payment_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(purchase.id.as_uuid())
        .bind(purchase.course_id.as_uuid())
        .bind(purchase.user_id.as_str())
        .bind(purchase.amount)
        .bind(purchase.status.as_str())
        .bind(&purchase.payment_id)
        .bind(purchase.created_at.as_datetime())
        .bind(purchase.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save purchase", e))?;

        Ok(())
    }

    async fn update(&self, purchase: &CoursePurchase) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE course_purchases SET
                amount = $2,
                status = $3,
                payment_id = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(purchase.id.as_uuid())
        .bind(purchase.amount)
        .bind(purchase.status.as_str())
        .bind(&purchase.payment_id)
        .bind(purchase.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update purchase", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::PurchaseNotFound,
                format!("Purchase not found: {}", purchase.id),
            ));
        }

        Ok(())
    }

    async fn find_by_payment_id(
        &self,
        payment_id: &str,
    ) -> Result<Option<CoursePurchase>, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(&format!(
            "{} WHERE payment_id = $1 ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(payment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch purchase", e))?;

        row.map(CoursePurchase::try_from).transpose()
    }

    async fn exists_for_user_and_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM course_purchases WHERE user_id = $1 AND course_id = $2
            )
            "#,
        )
        .bind(user_id.as_str())
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("check purchase", e))?;

        Ok(exists)
    }

    async fn find_completed(&self) -> Result<Vec<CoursePurchase>, DomainError> {
        let rows: Vec<PurchaseRow> = sqlx::query_as(&format!(
            "{} WHERE status = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(PurchaseStatus::Completed.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch completed purchases", e))?;

        rows.into_iter().map(CoursePurchase::try_from).collect()
    }
}
