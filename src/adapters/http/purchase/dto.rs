//! HTTP DTOs for purchase endpoints.
//!
//! Field names follow the web client's catalog schema (`courseTitle`,
//! `coursePrice`, `_id`, ...).

use serde::{Deserialize, Serialize};

use crate::domain::course::{Course, CourseDetail, Lecture, UserProfile};
use crate::domain::purchase::{CoursePurchase, CoursePurchaseStatus, PurchasedCourse};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to start checkout for a course.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    pub course_id: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Hosted checkout page to redirect the buyer to.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSessionResponse {
    pub success: bool,
    pub url: String,
}

impl CheckoutSessionResponse {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            success: true,
            url: url.into(),
        }
    }
}

/// Acknowledgement returned to the gateway.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
}

/// Catalog fields shared by the list and detail views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseFields {
    #[serde(rename = "_id")]
    pub id: String,
    pub course_title: String,
    #[serde(rename = "subTitle")]
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: String,
    pub course_level: Option<String>,
    pub course_price: Option<i64>,
    pub course_thumbnail: Option<String>,
    pub enrolled_students: Vec<String>,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Course> for CourseFields {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.to_string(),
            course_title: course.title.clone(),
            subtitle: course.subtitle.clone(),
            description: course.description.clone(),
            category: course.category.clone(),
            course_level: course.level.map(|l| l.as_str().to_string()),
            course_price: course.price,
            course_thumbnail: course.thumbnail.clone(),
            enrolled_students: course
                .enrolled_students
                .iter()
                .map(ToString::to_string)
                .collect(),
            is_published: course.is_published,
            created_at: course.created_at.to_rfc3339(),
            updated_at: course.updated_at.to_rfc3339(),
        }
    }
}

/// Course with creator and lectures left as ids.
#[derive(Debug, Clone, Serialize)]
pub struct CourseResponse {
    #[serde(flatten)]
    pub fields: CourseFields,
    pub creator: String,
    pub lectures: Vec<String>,
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            fields: CourseFields::from(course),
            creator: course.creator.to_string(),
            lectures: course.lectures.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
}

impl From<UserProfile> for CreatorResponse {
    fn from(user: UserProfile) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            email: user.email,
            photo_url: user.photo_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub lecture_title: String,
    pub video_url: Option<String>,
    pub public_id: Option<String>,
    pub is_preview_free: bool,
}

impl From<Lecture> for LectureResponse {
    fn from(lecture: Lecture) -> Self {
        Self {
            id: lecture.id.to_string(),
            lecture_title: lecture.title,
            video_url: lecture.video_url,
            public_id: lecture.public_id,
            is_preview_free: lecture.is_preview_free,
        }
    }
}

/// Creator: expanded when the user still exists, else the raw id.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CreatorField {
    Expanded(CreatorResponse),
    Id(String),
}

/// Course with creator and lectures expanded.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetailResponse {
    #[serde(flatten)]
    pub fields: CourseFields,
    pub creator: CreatorField,
    pub lectures: Vec<LectureResponse>,
}

impl From<CourseDetail> for CourseDetailResponse {
    fn from(detail: CourseDetail) -> Self {
        let creator = match detail.creator {
            Some(user) => CreatorField::Expanded(user.into()),
            None => CreatorField::Id(detail.course.creator.to_string()),
        };
        Self {
            fields: CourseFields::from(&detail.course),
            creator,
            lectures: detail.lectures.into_iter().map(LectureResponse::from).collect(),
        }
    }
}

/// `{course, purchased}` for the course detail page.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetailWithStatusResponse {
    pub course: CourseDetailResponse,
    pub purchased: bool,
}

impl From<CoursePurchaseStatus> for CourseDetailWithStatusResponse {
    fn from(status: CoursePurchaseStatus) -> Self {
        Self {
            course: status.detail.into(),
            purchased: status.purchased,
        }
    }
}

/// Course reference on a purchase: expanded unless removed from the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PurchasedCourseField {
    Expanded(Box<CourseResponse>),
    Id(String),
}

/// A completed purchase with its course expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub course_id: PurchasedCourseField,
    pub user_id: String,
    pub amount: i64,
    pub status: String,
    pub payment_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PurchasedCourse> for PurchaseResponse {
    fn from(item: PurchasedCourse) -> Self {
        let PurchasedCourse { purchase, course } = item;
        let course_field = match course {
            Some(course) => PurchasedCourseField::Expanded(Box::new(CourseResponse::from(&course))),
            None => PurchasedCourseField::Id(purchase.course_id.to_string()),
        };
        Self::with_course(purchase, course_field)
    }
}

impl PurchaseResponse {
    fn with_course(purchase: CoursePurchase, course_id: PurchasedCourseField) -> Self {
        Self {
            id: purchase.id.to_string(),
            course_id,
            user_id: purchase.user_id.to_string(),
            amount: purchase.amount,
            status: purchase.status.as_str().to_string(),
            payment_id: purchase.payment_id,
            created_at: purchase.created_at.to_rfc3339(),
            updated_at: purchase.updated_at.to_rfc3339(),
        }
    }
}

/// `{purchasedCourse: [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct PurchasedCoursesResponse {
    #[serde(rename = "purchasedCourse")]
    pub purchased_course: Vec<PurchaseResponse>,
}
