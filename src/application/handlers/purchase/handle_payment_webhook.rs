//! HandlePaymentWebhookHandler - Reconciles purchases from gateway events.
//!
//! Only `checkout.session.completed` changes state; every other verified
//! event is acknowledged and ignored.
//!
//! Deliveries are not deduplicated. A repeated completion event leaves the
//! purchase completed and the enrolled sets unchanged, but records another
//! progress entry.

use std::sync::Arc;

use crate::domain::course::CourseProgress;
use crate::domain::foundation::{CourseId, PurchaseId, UserId};
use crate::domain::purchase::PurchaseError;
use crate::ports::{
    CourseRepository, PaymentProvider, ProgressRepository, PurchaseRepository, UserRepository,
    WebhookEvent, WebhookEventData, WebhookEventType,
};

/// Command carrying a raw webhook delivery.
#[derive(Debug, Clone)]
pub struct HandlePaymentWebhookCommand {
    pub payload: Vec<u8>,
    pub signature: String,
}

/// Outcome of webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlePaymentWebhookResult {
    /// A purchase was completed and the buyer enrolled.
    PurchaseCompleted {
        purchase_id: PurchaseId,
        course_id: CourseId,
        user_id: UserId,
        amount: i64,
    },

    /// Event verified but not acted upon.
    Ignored { event_type: String },
}

/// Handler for gateway webhooks.
pub struct HandlePaymentWebhookHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    purchases: Arc<dyn PurchaseRepository>,
    courses: Arc<dyn CourseRepository>,
    users: Arc<dyn UserRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl HandlePaymentWebhookHandler {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        purchases: Arc<dyn PurchaseRepository>,
        courses: Arc<dyn CourseRepository>,
        users: Arc<dyn UserRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            payment_provider,
            purchases,
            courses,
            users,
            progress,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandlePaymentWebhookCommand,
    ) -> Result<HandlePaymentWebhookResult, PurchaseError> {
        // 1. Verify signature and parse
        let event = self
            .payment_provider
            .verify_webhook(&cmd.payload, &cmd.signature)
            .await
            .map_err(|e| {
                if e.is_invalid_webhook() {
                    PurchaseError::invalid_webhook_signature(e.message)
                } else {
                    PurchaseError::gateway(e.message)
                }
            })?;

        // 2. Route by event type
        let event_type = match event.event_type {
            WebhookEventType::CheckoutSessionCompleted => {
                return self.complete_purchase(event).await;
            }
            WebhookEventType::Unknown(name) => name,
        };

        tracing::debug!(event_id = %event.id, event_type = %event_type, "Ignoring webhook event");
        Ok(HandlePaymentWebhookResult::Ignored { event_type })
    }

    async fn complete_purchase(
        &self,
        event: WebhookEvent,
    ) -> Result<HandlePaymentWebhookResult, PurchaseError> {
        let (session_id, amount_total) = match event.data {
            WebhookEventData::Checkout {
                session_id,
                amount_total,
                ..
            } => (session_id, amount_total),
            WebhookEventData::Raw { .. } => {
                return Err(PurchaseError::invalid_webhook_signature(
                    "Checkout event without session data",
                ));
            }
        };

        // 3. Find the purchase recorded at checkout
        let mut purchase = self
            .purchases
            .find_by_payment_id(&session_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(session_id = %session_id, "No purchase for checkout session");
                PurchaseError::purchase_not_found(session_id.clone())
            })?;

        // 4. Complete and persist
        purchase.complete(amount_total)?;
        self.purchases.update(&purchase).await?;

        // 5. Enroll the buyer on both sides
        self.users
            .add_enrolled_course(&purchase.user_id, &purchase.course_id)
            .await?;
        self.courses
            .add_enrolled_student(&purchase.course_id, &purchase.user_id)
            .await?;

        // 6. Start progress tracking
        let progress = CourseProgress::start(purchase.user_id.clone(), purchase.course_id);
        self.progress.create(&progress).await?;

        tracing::info!(
            event_id = %event.id,
            purchase_id = %purchase.id,
            course_id = %purchase.course_id,
            user_id = %purchase.user_id,
            amount = purchase.amount,
            "Purchase completed"
        );

        Ok(HandlePaymentWebhookResult::PurchaseCompleted {
            purchase_id: purchase.id,
            course_id: purchase.course_id,
            user_id: purchase.user_id,
            amount: purchase.amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryStore;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::course::{Course, UserProfile};
    use crate::domain::foundation::Timestamp;
    use crate::domain::purchase::{CoursePurchase, PurchaseStatus};
    use crate::ports::PaymentError;

    struct Fixture {
        store: InMemoryStore,
        gateway: MockPaymentProvider,
        handler: HandlePaymentWebhookHandler,
        purchase: CoursePurchase,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let gateway = MockPaymentProvider::new();
        let buyer = UserId::new("buyer").unwrap();

        let course = Course {
            id: CourseId::new(),
            title: "Async Rust".to_string(),
            subtitle: None,
            description: None,
            category: "Programming".to_string(),
            level: None,
            price: Some(1000),
            thumbnail: None,
            creator: UserId::new("creator").unwrap(),
            lectures: vec![],
            enrolled_students: vec![],
            is_published: true,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        };
        store.insert_course(course.clone()).await;
        store
            .insert_user(UserProfile {
                id: buyer.clone(),
                name: "Buyer".to_string(),
                email: "buyer@example.com".to_string(),
                photo_url: None,
                enrolled_courses: vec![],
            })
            .await;

        let mut purchase = CoursePurchase::pending(PurchaseId::new(), course.id, buyer, 1000);
        purchase.attach_payment("cs_test_1");
        PurchaseRepository::save(&store, &purchase).await.unwrap();

        let handler = HandlePaymentWebhookHandler::new(
            Arc::new(gateway.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        );

        Fixture {
            store,
            gateway,
            handler,
            purchase,
        }
    }

    fn command() -> HandlePaymentWebhookCommand {
        HandlePaymentWebhookCommand {
            payload: b"{}".to_vec(),
            signature: "t=1,v1=00".to_string(),
        }
    }

    #[tokio::test]
    async fn completed_checkout_enrolls_buyer() {
        let f = fixture().await;
        f.gateway
            .set_webhook_event(MockPaymentProvider::checkout_completed_event("cs_test_1", Some(1200)));

        let result = f.handler.handle(command()).await.unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::PurchaseCompleted {
                purchase_id: f.purchase.id,
                course_id: f.purchase.course_id,
                user_id: f.purchase.user_id.clone(),
                amount: 1200,
            }
        );

        let stored = f.store.purchases().await;
        assert_eq!(stored[0].status, PurchaseStatus::Completed);
        assert_eq!(stored[0].amount, 1200);

        let user = f.store.user(&f.purchase.user_id).await.unwrap();
        assert_eq!(user.enrolled_courses, vec![f.purchase.course_id]);
        let course = f.store.course(&f.purchase.course_id).await.unwrap();
        assert_eq!(course.enrolled_students, vec![f.purchase.user_id.clone()]);

        let progress = ProgressRepository::find_by_user_and_course(
            &f.store,
            &f.purchase.user_id,
            &f.purchase.course_id,
        )
        .await
        .unwrap();
        assert_eq!(progress.len(), 1);
        assert!(!progress[0].completed);
        assert!(progress[0].lecture_progress.is_empty());
    }

    #[tokio::test]
    async fn missing_amount_keeps_checkout_price() {
        let f = fixture().await;
        f.gateway
            .set_webhook_event(MockPaymentProvider::checkout_completed_event("cs_test_1", None));

        f.handler.handle(command()).await.unwrap();

        assert_eq!(f.store.purchases().await[0].amount, 1000);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found_and_nothing_changes() {
        let f = fixture().await;
        f.gateway
            .set_webhook_event(MockPaymentProvider::checkout_completed_event("cs_other", Some(5)));

        let err = f.handler.handle(command()).await.unwrap_err();

        assert_eq!(err, PurchaseError::purchase_not_found("cs_other"));
        let stored = f.store.purchases().await;
        assert_eq!(stored[0].status, PurchaseStatus::Pending);
        assert!(f
            .store
            .user(&f.purchase.user_id)
            .await
            .unwrap()
            .enrolled_courses
            .is_empty());
    }

    #[tokio::test]
    async fn bad_signature_is_rejected() {
        let f = fixture().await;
        f.gateway
            .set_method_error("verify_webhook", PaymentError::invalid_webhook("bad sig"));

        let err = f.handler.handle(command()).await.unwrap_err();

        assert_eq!(err, PurchaseError::invalid_webhook_signature("bad sig"));
        assert_eq!(f.store.purchases().await[0].status, PurchaseStatus::Pending);
    }

    #[tokio::test]
    async fn other_events_are_ignored() {
        let f = fixture().await;
        let payload = br#"{"id":"evt_9","type":"payment_intent.created","created":1704067200,"data":{"object":{"id":"pi_1"}}}"#;

        let result = f
            .handler
            .handle(HandlePaymentWebhookCommand {
                payload: payload.to_vec(),
                signature: "unused".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(
            result,
            HandlePaymentWebhookResult::Ignored {
                event_type: "payment_intent.created".to_string()
            }
        );
        assert_eq!(f.store.purchases().await[0].status, PurchaseStatus::Pending);
    }

    #[tokio::test]
    async fn redelivery_keeps_sets_but_adds_progress() {
        let f = fixture().await;
        let event = MockPaymentProvider::checkout_completed_event("cs_test_1", Some(1000));
        f.gateway.set_webhook_event(event);

        f.handler.handle(command()).await.unwrap();
        f.handler.handle(command()).await.unwrap();

        let user = f.store.user(&f.purchase.user_id).await.unwrap();
        assert_eq!(user.enrolled_courses.len(), 1);
        let course = f.store.course(&f.purchase.course_id).await.unwrap();
        assert_eq!(course.enrolled_students.len(), 1);
        let progress = ProgressRepository::find_by_user_and_course(
            &f.store,
            &f.purchase.user_id,
            &f.purchase.course_id,
        )
        .await
        .unwrap();
        assert_eq!(progress.len(), 2);
    }
}
