//! CoursePurchase aggregate.
//!
//! A purchase is created `Pending` when the checkout session is opened and
//! carries the gateway session id as `payment_id`. The payment webhook is the
//! only caller of `complete`. Purchases are never deleted.

use crate::domain::foundation::{CourseId, PurchaseId, StateMachine, Timestamp, UserId};
use serde::{Deserialize, Serialize};

use super::{PurchaseError, PurchaseStatus};

/// Course purchase record. Amounts are in the currency's smallest unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePurchase {
    pub id: PurchaseId,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub amount: i64,
    pub status: PurchaseStatus,
    pub payment_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CoursePurchase {
    /// Creates a pending purchase at the given amount.
    pub fn pending(id: PurchaseId, course_id: CourseId, user_id: UserId, amount: i64) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            course_id,
            user_id,
            amount,
            status: PurchaseStatus::Pending,
            payment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Records the gateway checkout session id.
    pub fn attach_payment(&mut self, session_id: impl Into<String>) {
        self.payment_id = Some(session_id.into());
        self.updated_at = Timestamp::now();
    }

    /// Marks the purchase completed, taking the paid amount when the gateway
    /// reports one.
    ///
    /// A repeated confirmation of an already completed purchase only
    /// refreshes the amount.
    pub fn complete(&mut self, amount_total: Option<i64>) -> Result<(), PurchaseError> {
        let current = self.status;
        if current != PurchaseStatus::Completed {
            self.status = current
                .transition_to(PurchaseStatus::Completed)
                .map_err(|_| PurchaseError::invalid_state(current.as_str(), "complete"))?;
        }
        if let Some(amount) = amount_total.filter(|a| *a > 0) {
            self.amount = amount;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == PurchaseStatus::Completed
    }
}
