use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{delete, get, post, put},
};

use super::dto::{CourseListResponse, CourseResponse, CreateCourseRequest, UpdateCourseRequest};
use crate::entities::course;
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{CourseRepository, CourseUpdate};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/courses", post(create_course))
        .route("/api/v1/courses", get(get_all_courses))
        .route("/api/v1/courses/{course_code}", get(get_course))
        .route("/api/v1/courses/{course_code}", put(update_course))
        .route("/api/v1/courses/{course_code}", delete(delete_course))
}

fn to_response(course: course::Model) -> CourseResponse {
    CourseResponse {
        course_code: course.course_code,
        title: course.title,
        credits: course.credits,
    }
}

/// Create a new course (Instructor only)
#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Duplicate code or invalid credits"),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn create_course(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    if payload.course_code.trim().is_empty() || payload.title.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "course_code and title are required".to_string(),
        ));
    }
    if payload.credits < 1 {
        return Err((
            StatusCode::BAD_REQUEST,
            "Credits must be a positive integer".to_string(),
        ));
    }

    let course_repo = CourseRepository::new();

    let existing = course_repo.find_by_id(&payload.course_code).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to check course code: {}", e),
        )
    })?;
    if existing.is_some() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Course code {} already exists", payload.course_code),
        ));
    }

    let created = course_repo
        .create(payload.course_code, payload.title, payload.credits)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create course: {}", e),
            )
        })?;

    Ok((StatusCode::CREATED, Json(to_response(created))))
}

/// Get all courses ordered by title (Authenticated users)
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses(
        (status = 200, description = "Courses retrieved", body = CourseListResponse),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn get_all_courses(
    AuthClaims(_auth_claims): AuthClaims,
) -> Result<(StatusCode, Json<CourseListResponse>), (StatusCode, String)> {
    let course_repo = CourseRepository::new();

    let courses = course_repo.find_all().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to get courses: {}", e),
        )
    })?;

    let response = CourseListResponse {
        total: courses.len(),
        courses: courses.into_iter().map(to_response).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Get course by code (Authenticated users)
#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_code}",
    params(
        ("course_code" = String, Path, description = "Course code")
    ),
    responses(
        (status = 200, description = "Course retrieved", body = CourseResponse),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn get_course(
    AuthClaims(_auth_claims): AuthClaims,
    Path(course_code): Path<String>,
) -> Result<(StatusCode, Json<CourseResponse>), (StatusCode, String)> {
    let course_repo = CourseRepository::new();

    let course = course_repo
        .find_by_id(&course_code)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get course: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Course not found".to_string()))?;

    Ok((StatusCode::OK, Json(to_response(course))))
}

/// Update course (Instructor only)
#[utoipa::path(
    put,
    path = "/api/v1/courses/{course_code}",
    params(
        ("course_code" = String, Path, description = "Course code")
    ),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Invalid credits"),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    AuthClaims(auth_claims): AuthClaims,
    Path(course_code): Path<String>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    if let Some(credits) = payload.credits {
        if credits < 1 {
            return Err((
                StatusCode::BAD_REQUEST,
                "Credits must be a positive integer".to_string(),
            ));
        }
    }

    let course_repo = CourseRepository::new();

    course_repo
        .find_by_id(&course_code)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get course: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Course not found".to_string()))?;

    let updates = CourseUpdate {
        title: payload.title,
        credits: payload.credits,
    };

    let updated = course_repo.update(&course_code, updates).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to update course: {}", e),
        )
    })?;

    Ok((StatusCode::OK, Json(to_response(updated))))
}

/// Delete course (Instructor only). Scores for the course are removed by
/// the database cascade.
#[utoipa::path(
    delete,
    path = "/api/v1/courses/{course_code}",
    params(
        ("course_code" = String, Path, description = "Course code")
    ),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
pub async fn delete_course(
    AuthClaims(auth_claims): AuthClaims,
    Path(course_code): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let course_repo = CourseRepository::new();

    let result = course_repo.delete(&course_code).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to delete course: {}", e),
        )
    })?;

    if result.rows_affected == 0 {
        return Err((StatusCode::NOT_FOUND, "Course not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
