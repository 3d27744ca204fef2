//! CreateCheckoutSessionHandler - Command handler for starting a course purchase.

use std::sync::Arc;

use crate::domain::foundation::{CourseId, PurchaseId, UserId};
use crate::domain::purchase::{CoursePurchase, PurchaseError};
use crate::ports::{CourseRepository, CreateCheckoutRequest, PaymentProvider, PurchaseRepository};

/// Checkout settings shared by every session.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// ISO currency code sent to the gateway.
    pub currency: String,

    /// Front-end origin the gateway redirects back to.
    pub client_url: String,
}

impl CheckoutSettings {
    pub fn new(currency: impl Into<String>, client_url: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            client_url: client_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn success_url(&self, course_id: &CourseId) -> String {
        format!("{}/course-progress/{}?success=true", self.client_url, course_id)
    }

    pub fn cancel_url(&self, course_id: &CourseId) -> String {
        format!("{}/course-detail/{}", self.client_url, course_id)
    }
}

/// Command to start checkout for one course.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    pub user_id: UserId,
    pub course_id: CourseId,
}

/// Result of a started checkout.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionResult {
    pub purchase_id: PurchaseId,
    pub session_id: String,
    pub checkout_url: String,
}

/// Handler for starting checkout.
pub struct CreateCheckoutSessionHandler {
    courses: Arc<dyn CourseRepository>,
    purchases: Arc<dyn PurchaseRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
    settings: CheckoutSettings,
}

impl CreateCheckoutSessionHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        purchases: Arc<dyn PurchaseRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            courses,
            purchases,
            payment_provider,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CreateCheckoutSessionResult, PurchaseError> {
        // 1. Load course
        let course = self
            .courses
            .find_by_id(&cmd.course_id)
            .await?
            .ok_or_else(|| PurchaseError::course_not_found(cmd.course_id))?;

        // 2. Pending purchase at the current price
        let mut purchase = CoursePurchase::pending(
            PurchaseId::new(),
            course.id,
            cmd.user_id.clone(),
            course.checkout_price(),
        );

        // 3. Ask the gateway for a hosted session
        let session = self
            .payment_provider
            .create_checkout_session(CreateCheckoutRequest {
                course_id: course.id,
                user_id: cmd.user_id,
                course_title: course.title.clone(),
                course_thumbnail: course.thumbnail.clone(),
                unit_amount: purchase.amount,
                currency: self.settings.currency.clone(),
                success_url: self.settings.success_url(&course.id),
                cancel_url: self.settings.cancel_url(&course.id),
            })
            .await
            .map_err(|e| {
                tracing::error!(course_id = %course.id, error = %e, "Checkout session creation failed");
                PurchaseError::gateway(e.message)
            })?;

        // 4. A session without a URL cannot be paid
        let checkout_url = session.url.ok_or_else(|| {
            tracing::error!(session_id = %session.id, "Checkout session has no URL");
            PurchaseError::checkout_url_missing()
        })?;

        // 5. Persist
        purchase.attach_payment(session.id.clone());
        self.purchases.save(&purchase).await?;

        tracing::info!(
            purchase_id = %purchase.id,
            course_id = %purchase.course_id,
            user_id = %purchase.user_id,
            session_id = %session.id,
            "Pending purchase recorded"
        );

        Ok(CreateCheckoutSessionResult {
            purchase_id: purchase.id,
            session_id: session.id,
            checkout_url,
        })
    }
}
