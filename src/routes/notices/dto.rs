use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNoticeRequest {
    #[schema(example = "Midterm schedule")]
    pub title: String,

    #[schema(example = "The CS101 midterm takes place on October 12th.")]
    pub body: String,

    #[schema(example = "K66-CS1")]
    pub class_section: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeResponse {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub sent_at: NaiveDateTime,
    pub sender_id: String,
    pub class_section: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeListResponse {
    pub total: usize,
    pub notices: Vec<NoticeResponse>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NoticeQueryParams {
    /// Instructor-only filter; ignored for students
    pub class_section: Option<String>,
}
