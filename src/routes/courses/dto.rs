use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCourseRequest {
    #[schema(example = "CS101")]
    pub course_code: String,

    #[schema(example = "Introduction to Programming")]
    pub title: String,

    #[schema(example = 3)]
    pub credits: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    #[schema(example = "Introduction to Programming")]
    pub title: Option<String>,

    #[schema(example = 3)]
    pub credits: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub course_code: String,
    pub title: String,
    pub credits: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseListResponse {
    pub total: usize,
    pub courses: Vec<CourseResponse>,
}
