//! PostgreSQL implementations of the catalog ports.
//!
//! Courses, users and progress records belong to the wider platform; these
//! adapters read them and grow the enrolment sets. Set-append is a single
//! `array_append` guarded by `NOT ($2 = ANY(...))`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::course::{
    AuthorSummary, Course, CourseDetail, CourseLevel, CourseProgress, Lecture, LectureProgress,
    UserProfile,
};
use crate::domain::foundation::{
    CourseId, DomainError, ErrorCode, LectureId, ProgressId, Timestamp, UserId,
};
use crate::ports::{CourseRepository, ProgressRepository, UserRepository};

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

fn parse_user_id(raw: String) -> Result<UserId, DomainError> {
    UserId::new(raw).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Courses
// ════════════════════════════════════════════════════════════════════════════════

/// PostgreSQL implementation of the CourseRepository port.
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_lectures(&self, ids: &[LectureId]) -> Result<Vec<Lecture>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<LectureRow> = sqlx::query_as(
            "SELECT id, title, video_url, public_id, is_preview_free FROM lectures WHERE id = ANY($1)",
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch lectures", e))?;

        // Keep the course's lecture order.
        let mut by_id: HashMap<Uuid, Lecture> =
            rows.into_iter().map(|r| (r.id, Lecture::from(r))).collect();
        Ok(uuids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    title: String,
    subtitle: Option<String>,
    description: Option<String>,
    category: String,
    level: Option<String>,
    price: Option<i64>,
    thumbnail: Option<String>,
    creator: String,
    lectures: Vec<Uuid>,
    enrolled_students: Vec<String>,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CourseRow> for Course {
    type Error = DomainError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let enrolled_students = row
            .enrolled_students
            .into_iter()
            .map(parse_user_id)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Course {
            id: CourseId::from_uuid(row.id),
            title: row.title,
            subtitle: row.subtitle,
            description: row.description,
            category: row.category,
            level: row.level.as_deref().and_then(CourseLevel::parse),
            price: row.price,
            thumbnail: row.thumbnail,
            creator: parse_user_id(row.creator)?,
            lectures: row.lectures.into_iter().map(LectureId::from_uuid).collect(),
            enrolled_students,
            is_published: row.is_published,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LectureRow {
    id: Uuid,
    title: String,
    video_url: Option<String>,
    public_id: Option<String>,
    is_preview_free: bool,
}

impl From<LectureRow> for Lecture {
    fn from(row: LectureRow) -> Self {
        Lecture {
            id: LectureId::from_uuid(row.id),
            title: row.title,
            video_url: row.video_url,
            public_id: row.public_id,
            is_preview_free: row.is_preview_free,
        }
    }
}

const COURSE_COLUMNS: &str = r#"
    SELECT id, title, subtitle, description, category, level, price, thumbnail, creator,
           lectures, enrolled_students, is_published, created_at, updated_at
    FROM courses
"#;

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let row: Option<CourseRow> = sqlx::query_as(&format!("{} WHERE id = $1", COURSE_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch course", e))?;

        row.map(Course::try_from).transpose()
    }

    async fn find_many(&self, ids: &[CourseId]) -> Result<Vec<Course>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<CourseRow> =
            sqlx::query_as(&format!("{} WHERE id = ANY($1)", COURSE_COLUMNS))
                .bind(uuids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("fetch courses", e))?;

        rows.into_iter().map(Course::try_from).collect()
    }

    async fn find_detail(&self, id: &CourseId) -> Result<Option<CourseDetail>, DomainError> {
        let Some(course) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let creator: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = $1", USER_COLUMNS))
            .bind(course.creator.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch course creator", e))?;
        let creator = creator.map(UserProfile::try_from).transpose()?;
        let lectures = self.find_lectures(&course.lectures).await?;

        Ok(Some(CourseDetail {
            course,
            creator,
            lectures,
        }))
    }

    async fn add_enrolled_student(
        &self,
        course_id: &CourseId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE courses SET enrolled_students = array_append(enrolled_students, $2)
            WHERE id = $1 AND NOT ($2 = ANY(enrolled_students))
            "#,
        )
        .bind(course_id.as_uuid())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("enroll student", e))?;

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Users
// ════════════════════════════════════════════════════════════════════════════════

/// PostgreSQL implementation of the UserRepository port.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    photo_url: Option<String>,
    enrolled_courses: Vec<Uuid>,
}

impl TryFrom<UserRow> for UserProfile {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            id: parse_user_id(row.id)?,
            name: row.name,
            email: row.email,
            photo_url: row.photo_url,
            enrolled_courses: row
                .enrolled_courses
                .into_iter()
                .map(CourseId::from_uuid)
                .collect(),
        })
    }
}

const USER_COLUMNS: &str = "SELECT id, name, email, photo_url, enrolled_courses FROM users";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = $1", USER_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("fetch user", e))?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn find_authors(&self, ids: &[UserId]) -> Result<Vec<AuthorSummary>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<&str> = ids.iter().map(UserId::as_str).collect();
        let rows: Vec<(String, String, Option<String>)> =
            sqlx::query_as("SELECT id, name, photo_url FROM users WHERE id = ANY($1)")
                .bind(&raw)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("fetch authors", e))?;

        rows.into_iter()
            .map(|(id, name, avatar)| {
                Ok(AuthorSummary {
                    id: parse_user_id(id)?,
                    name,
                    avatar,
                })
            })
            .collect()
    }

    async fn add_enrolled_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE users SET enrolled_courses = array_append(enrolled_courses, $2)
            WHERE id = $1 AND NOT ($2 = ANY(enrolled_courses))
            "#,
        )
        .bind(user_id.as_str())
        .bind(course_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("enroll course", e))?;

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Progress
// ════════════════════════════════════════════════════════════════════════════════

/// PostgreSQL implementation of the ProgressRepository port.
pub struct PostgresProgressRepository {
    pool: PgPool,
}

impl PostgresProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProgressRow {
    id: Uuid,
    user_id: String,
    course_id: Uuid,
    completed: bool,
    lecture_progress: Json<Vec<LectureProgress>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProgressRow> for CourseProgress {
    type Error = DomainError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        Ok(CourseProgress {
            id: ProgressId::from_uuid(row.id),
            user_id: parse_user_id(row.user_id)?,
            course_id: CourseId::from_uuid(row.course_id),
            completed: row.completed,
            lecture_progress: row.lecture_progress.0,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl ProgressRepository for PostgresProgressRepository {
    async fn create(&self, progress: &CourseProgress) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO course_progress (id, user_id, course_id, completed, lecture_progress, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(progress.id.as_uuid())
        .bind(progress.user_id.as_str())
        .bind(progress.course_id.as_uuid())
        .bind(progress.completed)
        .bind(Json(&progress.lecture_progress))
        .bind(progress.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("create progress", e))?;

        Ok(())
    }

    async fn find_by_user_and_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Vec<CourseProgress>, DomainError> {
        let rows: Vec<ProgressRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, course_id, completed, lecture_progress, created_at
            FROM course_progress
            WHERE user_id = $1 AND course_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(user_id.as_str())
        .bind(course_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("fetch progress", e))?;

        rows.into_iter().map(CourseProgress::try_from).collect()
    }
}
