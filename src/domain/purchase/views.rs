//! Read models for purchase queries.

use crate::domain::course::{Course, CourseDetail};

use super::CoursePurchase;

/// A completed purchase with its course expanded.
///
/// `course` is `None` when the course has since been removed from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasedCourse {
    pub purchase: CoursePurchase,
    pub course: Option<Course>,
}

/// A course detail together with whether the caller has a purchase record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoursePurchaseStatus {
    pub detail: CourseDetail,
    pub purchased: bool,
}
