//! Course purchase repository port.

use crate::domain::foundation::{CourseId, DomainError, UserId};
use crate::domain::purchase::CoursePurchase;
use async_trait::async_trait;

/// Repository port for CoursePurchase persistence.
///
/// Purchases are never deleted, so there is no delete operation.
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Save a new purchase.
    async fn save(&self, purchase: &CoursePurchase) -> Result<(), DomainError>;

    /// Persist status, amount, and payment id of an existing purchase.
    ///
    /// # Errors
    ///
    /// - `PurchaseNotFound` if the purchase doesn't exist
    async fn update(&self, purchase: &CoursePurchase) -> Result<(), DomainError>;

    /// Find the purchase created for a gateway checkout session.
    async fn find_by_payment_id(
        &self,
        payment_id: &str,
    ) -> Result<Option<CoursePurchase>, DomainError>;

    /// True if any purchase record exists for the pair, whatever its status.
    async fn exists_for_user_and_course(
        &self,
        user_id: &UserId,
        course_id: &CourseId,
    ) -> Result<bool, DomainError>;

    /// All purchases with status `completed`, newest first.
    async fn find_completed(&self) -> Result<Vec<CoursePurchase>, DomainError>;
}
