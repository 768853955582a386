use axum::{Json, Router, http::StatusCode, routing::get};

use super::dto::OverviewResponse;
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{CourseRepository, StudentRepository};

pub fn create_route() -> Router {
    Router::new().route("/api/v1/stats/overview", get(get_overview))
}

/// Headline counts for the dashboard (Instructor only)
#[utoipa::path(
    get,
    path = "/api/v1/stats/overview",
    responses(
        (status = 200, description = "Overview retrieved", body = OverviewResponse),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Stats"
)]
pub async fn get_overview(
    AuthClaims(auth_claims): AuthClaims,
) -> Result<(StatusCode, Json<OverviewResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let student_repo = StudentRepository::new();
    let course_repo = CourseRepository::new();

    let total_students = student_repo.count().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to count students: {}", e),
        )
    })?;

    let total_courses = course_repo.count().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to count courses: {}", e),
        )
    })?;

    Ok((
        StatusCode::OK,
        Json(OverviewResponse {
            total_students,
            total_courses,
        }),
    ))
}
