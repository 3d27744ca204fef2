//! Purchase status state machine.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle of a course purchase.
///
/// `Pending` is set at checkout; only a verified payment webhook moves it to
/// `Completed`. There is no refund or cancellation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Pending,
    Completed,
}

impl PurchaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Completed => "completed",
        }
    }

    /// Parses the stored representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PurchaseStatus::Pending),
            "completed" => Some(PurchaseStatus::Completed),
            _ => None,
        }
    }
}

impl StateMachine for PurchaseStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (PurchaseStatus::Pending, PurchaseStatus::Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            PurchaseStatus::Pending => vec![PurchaseStatus::Completed],
            PurchaseStatus::Completed => vec![],
        }
    }
}
