//! GetCoursePurchaseStatusHandler - Course detail plus the caller's purchase flag.

use std::sync::Arc;

use crate::domain::foundation::{CourseId, UserId};
use crate::domain::purchase::{CoursePurchaseStatus, PurchaseError};
use crate::ports::{CourseRepository, PurchaseRepository};

/// Query for a course as seen by one user.
#[derive(Debug, Clone)]
pub struct GetCoursePurchaseStatusQuery {
    pub course_id: CourseId,
    pub user_id: UserId,
}

/// Handler for the course detail page.
pub struct GetCoursePurchaseStatusHandler {
    courses: Arc<dyn CourseRepository>,
    purchases: Arc<dyn PurchaseRepository>,
}

impl GetCoursePurchaseStatusHandler {
    pub fn new(courses: Arc<dyn CourseRepository>, purchases: Arc<dyn PurchaseRepository>) -> Self {
        Self { courses, purchases }
    }

    /// `purchased` is true for any purchase record, pending ones included.
    pub async fn handle(
        &self,
        query: GetCoursePurchaseStatusQuery,
    ) -> Result<CoursePurchaseStatus, PurchaseError> {
        let detail = self
            .courses
            .find_detail(&query.course_id)
            .await?
            .ok_or_else(|| PurchaseError::course_not_found(query.course_id))?;

        let purchased = self
            .purchases
            .exists_for_user_and_course(&query.user_id, &query.course_id)
            .await?;

        Ok(CoursePurchaseStatus { detail, purchased })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryStore;
    use crate::domain::course::{Course, Lecture, UserProfile};
    use crate::domain::foundation::{LectureId, PurchaseId, Timestamp};
    use crate::domain::purchase::CoursePurchase;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    async fn seed_course(store: &InMemoryStore) -> Course {
        let lecture = Lecture {
            id: LectureId::new(),
            title: "Ownership".to_string(),
            video_url: None,
            public_id: None,
            is_preview_free: true,
        };
        store.insert_lecture(lecture.clone()).await;
        store
            .insert_user(UserProfile {
                id: user("creator"),
                name: "Creator".to_string(),
                email: "creator@example.com".to_string(),
                photo_url: None,
                enrolled_courses: vec![],
            })
            .await;

        let course = Course {
            id: CourseId::new(),
            title: "Rust".to_string(),
            subtitle: None,
            description: None,
            category: "Programming".to_string(),
            level: None,
            price: Some(10),
            thumbnail: None,
            creator: user("creator"),
            lectures: vec![lecture.id],
            enrolled_students: vec![],
            is_published: true,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };
        store.insert_course(course.clone()).await;
        course
    }

    fn handler(store: &InMemoryStore) -> GetCoursePurchaseStatusHandler {
        GetCoursePurchaseStatusHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn expands_detail_and_reports_not_purchased() {
        let store = InMemoryStore::new();
        let course = seed_course(&store).await;

        let status = handler(&store)
            .handle(GetCoursePurchaseStatusQuery {
                course_id: course.id,
                user_id: user("visitor"),
            })
            .await
            .unwrap();

        assert!(!status.purchased);
        assert_eq!(status.detail.course.id, course.id);
        assert_eq!(status.detail.creator.unwrap().name, "Creator");
        assert_eq!(status.detail.lectures.len(), 1);
    }

    #[tokio::test]
    async fn pending_purchase_counts_as_purchased() {
        let store = InMemoryStore::new();
        let course = seed_course(&store).await;
        let purchase = CoursePurchase::pending(PurchaseId::new(), course.id, user("buyer"), 10);
        PurchaseRepository::save(&store, &purchase).await.unwrap();

        let status = handler(&store)
            .handle(GetCoursePurchaseStatusQuery {
                course_id: course.id,
                user_id: user("buyer"),
            })
            .await
            .unwrap();

        assert!(status.purchased);
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let store = InMemoryStore::new();
        let missing = CourseId::new();

        let err = handler(&store)
            .handle(GetCoursePurchaseStatusQuery {
                course_id: missing,
                user_id: user("visitor"),
            })
            .await
            .unwrap_err();

        assert_eq!(err, PurchaseError::course_not_found(missing));
    }
}
