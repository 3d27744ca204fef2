//! In-Memory Store Adapter
//!
//! Implements every store port over `HashMap`s behind `tokio::sync::RwLock`.
//! Used by tests and by the server when no database URL is configured.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::comment::Comment;
use crate::domain::course::{
    AuthorSummary, Course, CourseDetail, CourseProgress, Lecture, UserProfile,
};
use crate::domain::foundation::{
    CommentId, CourseId, DomainError, ErrorCode, LectureId, PurchaseId, UserId,
};
use crate::domain::purchase::CoursePurchase;
use crate::ports::{
    CommentRepository, CourseRepository, ProgressRepository, PurchaseRepository, UserRepository,
};

/// In-memory storage for all store ports.
///
/// Cloning shares the underlying data, so one store can back several ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    comments: Arc<RwLock<HashMap<CommentId, Comment>>>,
    courses: Arc<RwLock<HashMap<CourseId, Course>>>,
    lectures: Arc<RwLock<HashMap<LectureId, Lecture>>>,
    users: Arc<RwLock<HashMap<UserId, UserProfile>>>,
    purchases: Arc<RwLock<HashMap<PurchaseId, CoursePurchase>>>,
    progress: Arc<RwLock<Vec<CourseProgress>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with a database error (useful for tests).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::database("In-memory store marked unavailable"));
        }
        Ok(())
    }

    /// Seed a course.
    pub async fn insert_course(&self, course: Course) {
        self.courses.write().await.insert(course.id, course);
    }

    /// Seed a lecture.
    pub async fn insert_lecture(&self, lecture: Lecture) {
        self.lectures.write().await.insert(lecture.id, lecture);
    }

    /// Seed a user.
    pub async fn insert_user(&self, user: UserProfile) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Current state of a comment.
    pub async fn comment(&self, id: &CommentId) -> Option<Comment> {
        self.comments.read().await.get(id).cloned()
    }

    /// Number of stored comments.
    pub async fn comment_count(&self) -> usize {
        self.comments.read().await.len()
    }

    /// Current state of a course.
    pub async fn course(&self, id: &CourseId) -> Option<Course> {
        self.courses.read().await.get(id).cloned()
    }

    /// Current state of a user.
    pub async fn user(&self, id: &UserId) -> Option<UserProfile> {
        self.users.read().await.get(id).cloned()
    }

    /// All stored purchases.
    pub async fn purchases(&self) -> Vec<CoursePurchase> {
        self.purchases.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn save(&self, comment: &Comment) -> Result<(), DomainError> {
        self.check_available()?;
        self.comments.write().await.insert(comment.id, comment.clone());
        Ok(())
    }

    async fn update(&self, comment: &Comment) -> Result<(), DomainError> {
        self.check_available()?;
        let mut comments = self.comments.write().await;
        let stored = comments.get_mut(&comment.id).ok_or_else(|| {
            DomainError::new(ErrorCode::CommentNotFound, "Comment not found")
                .with_detail("comment_id", comment.id.to_string())
        })?;
        stored.content = comment.content.clone();
        stored.updated_at = comment.updated_at;
        Ok(())
    }

    async fn find_by_id(&self, id: &CommentId) -> Result<Option<Comment>, DomainError> {
        self.check_available()?;
        Ok(self.comments.read().await.get(id).cloned())
    }

    async fn find_many(&self, ids: &[CommentId]) -> Result<Vec<Comment>, DomainError> {
        self.check_available()?;
        let comments = self.comments.read().await;
        Ok(ids.iter().filter_map(|id| comments.get(id).cloned()).collect())
    }

    async fn find_top_level_by_course(
        &self,
        course_id: &CourseId,
    ) -> Result<Vec<Comment>, DomainError> {
        self.check_available()?;
        let comments = self.comments.read().await;
        let mut top_level: Vec<Comment> = comments
            .values()
            .filter(|c| c.course_id == *course_id && c.parent_id.is_none())
            .cloned()
            .collect();
        top_level.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(top_level)
    }

    async fn add_reply(
        &self,
        parent_id: &CommentId,
        reply_id: &CommentId,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut comments = self.comments.write().await;
        match comments.get_mut(parent_id) {
            Some(parent) => {
                parent.add_reply(*reply_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_reply(
        &self,
        parent_id: &CommentId,
        reply_id: &CommentId,
    ) -> Result<(), DomainError> {
        self.check_available()?;
        if let Some(parent) = self.comments.write().await.get_mut(parent_id) {
            parent.remove_reply(reply_id);
        }
        Ok(())
    }

    async fn delete(&self, id: &CommentId) -> Result<(), DomainError> {
        self.check_available()?;
        self.comments.write().await.remove(id);
        Ok(())
    }

    async fn delete_many(&self, ids: &[CommentId]) -> Result<u64, DomainError> {
        self.check_available()?;
        let mut comments = self.comments.write().await;
        Ok(ids.iter().filter(|id| comments.remove(*id).is_some()).count() as u64)
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        self.check_available()?;
        Ok(self.courses.read().await.get(id).cloned())
    }

    async fn find_many(&self, ids: &[CourseId]) -> Result<Vec<Course>, DomainError> {
        self.check_available()?;
        let courses = self.courses.read().await;
        Ok(ids.iter().filter_map(|id| courses.get(id).cloned()).collect())
    }

    async fn find_detail(&self, id: &CourseId) -> Result<Option<CourseDetail>, DomainError> {
        self.check_available()?;
        let Some(course) = self.courses.read().await.get(id).cloned() else {
            return Ok(None);
        };
        let creator = self.users.read().await.get(&course.creator).cloned();
        let lectures = {
            let lectures = self.lectures.read().await;
            course
                .lectures
                .iter()
                .filter_map(|id| lectures.get(id).cloned())
                .collect()
        };
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
        self.check_available()?;
        if let Some(course) = self.courses.write().await.get_mut(course_id) {
            course.enroll(user_id.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        self.check_available()?;
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_authors(&self, ids: &[UserId]) -> Result<Vec<AuthorSummary>, DomainError> {
        self.check_available()?;
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(UserProfile::summary))
            .collect())
    }

    async fn add_enrolled_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<(), DomainError> {
        self.check_available()?;
        if let Some(user) = self.users.write().await.get_mut(user_id) {
            user.enroll(*course_id);
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryStore {
    async fn create(&self, progress: &CourseProgress) -> Result<(), DomainError> {
        self.check_available()?;
        self.progress.write().await.push(progress.clone());
        Ok(())
    }

    async fn find_by_user_and_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Vec<CourseProgress>, DomainError> {
        self.check_available()?;
        Ok(self
            .progress
            .read()
            .await
            .iter()
            .filter(|p| p.user_id == *user_id && p.course_id == *course_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PurchaseRepository for InMemoryStore {
    async fn save(&self, purchase: &CoursePurchase) -> Result<(), DomainError> {
        self.check_available()?;
        self.purchases
            .write()
            .await
            .insert(purchase.id, purchase.clone());
        Ok(())
    }

    async fn update(&self, purchase: &CoursePurchase) -> Result<(), DomainError> {
        self.check_available()?;
        let mut purchases = self.purchases.write().await;
        if !purchases.contains_key(&purchase.id) {
            return Err(
                DomainError::new(ErrorCode::PurchaseNotFound, "Purchase not found")
                    .with_detail("purchase_id", purchase.id.to_string()),
            );
        }
        purchases.insert(purchase.id, purchase.clone());
        Ok(())
    }

    async fn find_by_payment_id(
        &self,
        payment_id: &str,
    ) -> Result<Option<CoursePurchase>, DomainError> {
        self.check_available()?;
        Ok(self
            .purchases
            .read()
            .await
            .values()
            .find(|p| p.payment_id.as_deref() == Some(payment_id))
            .cloned())
    }

    async fn exists_for_user_and_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<bool, DomainError> {
        self.check_available()?;
        Ok(self
            .purchases
            .read()
            .await
            .values()
            .any(|p| p.user_id == *user_id && p.course_id == *course_id))
    }

    async fn find_completed(&self) -> Result<Vec<CoursePurchase>, DomainError> {
        self.check_available()?;
        let mut completed: Vec<CoursePurchase> = self
            .purchases
            .read()
            .await
            .values()
            .filter(|p| p.is_completed())
            .cloned()
            .collect();
        completed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn top_level_comments_are_newest_first_and_exclude_replies() {
        let store = InMemoryStore::new();
        let course = CourseId::new();
        let older = Comment::new(CommentId::new(), course, user("u1"), None, "older").unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = Comment::new(CommentId::new(), course, user("u1"), None, "newer").unwrap();
        let reply =
            Comment::new(CommentId::new(), course, user("u2"), Some(older.id), "reply").unwrap();

        for c in [&older, &newer, &reply] {
            CommentRepository::save(&store, c).await.unwrap();
        }

        let listed = store.find_top_level_by_course(&course).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn add_reply_reports_missing_parent() {
        let store = InMemoryStore::new();
        assert!(!store
            .add_reply(&CommentId::new(), &CommentId::new())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn delete_many_counts_removed() {
        let store = InMemoryStore::new();
        let c = Comment::new(CommentId::new(), CourseId::new(), user("u1"), None, "x").unwrap();
        CommentRepository::save(&store, &c).await.unwrap();

        let removed = store.delete_many(&[c.id, CommentId::new()]).await.unwrap();

        assert_eq!(removed, 1);
        assert_eq!(store.comment_count().await, 0);
    }

    #[tokio::test]
    async fn unavailable_store_fails_with_database_error() {
        let store = InMemoryStore::new();
        store.set_unavailable(true);

        let err = CommentRepository::find_by_id(&store, &CommentId::new())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[tokio::test]
    async fn enrollment_sets_ignore_duplicates() {
        let store = InMemoryStore::new();
        let now = Timestamp::now();
        let course = Course {
            id: CourseId::new(),
            title: "T".to_string(),
            subtitle: None,
            description: None,
            category: "C".to_string(),
            level: None,
            price: None,
            thumbnail: None,
            creator: user("creator"),
            lectures: vec![],
            enrolled_students: vec![],
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        store.insert_course(course.clone()).await;

        store.add_enrolled_student(&course.id, &user("s")).await.unwrap();
        store.add_enrolled_student(&course.id, &user("s")).await.unwrap();

        assert_eq!(store.course(&course.id).await.unwrap().enrolled_students.len(), 1);
    }
}
