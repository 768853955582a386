use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewResponse {
    pub total_students: u64,
    pub total_courses: u64,
}
