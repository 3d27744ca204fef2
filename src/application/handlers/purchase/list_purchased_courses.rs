//! ListPurchasedCoursesHandler - Query handler for every completed purchase.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::foundation::CourseId;
use crate::domain::purchase::{PurchaseError, PurchasedCourse};
use crate::ports::{CourseRepository, PurchaseRepository};

/// Query for all completed purchases across users.
#[derive(Debug, Clone, Default)]
pub struct ListPurchasedCoursesQuery;

/// Handler for listing completed purchases with their courses.
pub struct ListPurchasedCoursesHandler {
    purchases: Arc<dyn PurchaseRepository>,
    courses: Arc<dyn CourseRepository>,
}

impl ListPurchasedCoursesHandler {
    pub fn new(purchases: Arc<dyn PurchaseRepository>, courses: Arc<dyn CourseRepository>) -> Self {
        Self { purchases, courses }
    }

    pub async fn handle(
        &self,
        _query: ListPurchasedCoursesQuery,
    ) -> Result<Vec<PurchasedCourse>, PurchaseError> {
        let purchases = self.purchases.find_completed().await?;

        let mut course_ids: Vec<CourseId> = purchases.iter().map(|p| p.course_id).collect();
        course_ids.sort_by_key(|id| *id.as_uuid());
        course_ids.dedup();

        let courses: HashMap<CourseId, _> = self
            .courses
            .find_many(&course_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(purchases
            .into_iter()
            .map(|purchase| PurchasedCourse {
                course: courses.get(&purchase.course_id).cloned(),
                purchase,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryStore;
    use crate::domain::course::Course;
    use crate::domain::foundation::{PurchaseId, Timestamp, UserId};
    use crate::domain::purchase::CoursePurchase;

    fn course() -> Course {
        Course {
            id: CourseId::new(),
            title: "Tokio".to_string(),
            subtitle: None,
            description: None,
            category: "Programming".to_string(),
            level: None,
            price: Some(10),
            thumbnail: None,
            creator: UserId::new("creator").unwrap(),
            lectures: vec![],
            enrolled_students: vec![],
            is_published: true,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn lists_only_completed_purchases_with_courses() {
        let store = InMemoryStore::new();
        let course = course();
        store.insert_course(course.clone()).await;

        let mut completed = CoursePurchase::pending(
            PurchaseId::new(),
            course.id,
            UserId::new("a").unwrap(),
            10,
        );
        completed.complete(Some(10)).unwrap();
        let pending = CoursePurchase::pending(PurchaseId::new(), course.id, UserId::new("b").unwrap(), 10);
        let orphan = {
            let mut p = CoursePurchase::pending(PurchaseId::new(), CourseId::new(), UserId::new("c").unwrap(), 5);
            p.complete(None).unwrap();
            p
        };
        for p in [&completed, &pending, &orphan] {
            PurchaseRepository::save(&store, p).await.unwrap();
        }

        let handler = ListPurchasedCoursesHandler::new(Arc::new(store.clone()), Arc::new(store.clone()));
        let listed = handler.handle(ListPurchasedCoursesQuery).await.unwrap();

        assert_eq!(listed.len(), 2);
        let with_course = listed.iter().find(|p| p.purchase.id == completed.id).unwrap();
        assert_eq!(with_course.course.as_ref().unwrap().title, "Tokio");
        let without = listed.iter().find(|p| p.purchase.id == orphan.id).unwrap();
        assert!(without.course.is_none());
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = InMemoryStore::new();
        let handler = ListPurchasedCoursesHandler::new(Arc::new(store.clone()), Arc::new(store));

        assert!(handler.handle(ListPurchasedCoursesQuery).await.unwrap().is_empty());
    }
}
