use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, put},
};

use super::dto::{ProfileResponse, UpdateProfileRequest};
use crate::extractor::AuthClaims;
use crate::repositories::{StudentRepository, StudentUpdate};
use crate::utils::jwt::UserRole;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/profile", get(get_profile))
        .route("/api/v1/profile", put(update_profile))
}

/// Get the signed-in student's own profile
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile retrieved", body = ProfileResponse),
        (status = 403, description = "Not a student account"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_profile(
    AuthClaims(auth_claims): AuthClaims,
) -> Result<(StatusCode, Json<ProfileResponse>), (StatusCode, String)> {
    if auth_claims.role != UserRole::Student {
        return Err((
            StatusCode::FORBIDDEN,
            "Only student accounts have a profile".to_string(),
        ));
    }

    let student_repo = StudentRepository::new();
    let student = student_repo
        .find_by_id(&auth_claims.username)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get profile: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Profile not found".to_string()))?;

    let response = ProfileResponse {
        student_id: student.student_id,
        full_name: student.full_name,
        birth_date: student.birth_date,
        class_section: student.class_section,
        department: student.department,
        email: student.email,
        location: student.location,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Update the signed-in student's own profile
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Email already in use"),
        (status = 403, description = "Not a student account"),
        (status = 404, description = "Profile not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_profile(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>), (StatusCode, String)> {
    if auth_claims.role != UserRole::Student {
        return Err((
            StatusCode::FORBIDDEN,
            "Only student accounts have a profile".to_string(),
        ));
    }

    let student_repo = StudentRepository::new();

    student_repo
        .find_by_id(&auth_claims.username)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get profile: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Profile not found".to_string()))?;

    if let Some(email) = &payload.email {
        let taken = student_repo
            .is_email_taken(email, &auth_claims.username)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to check email: {}", e),
                )
            })?;
        if taken {
            return Err((
                StatusCode::BAD_REQUEST,
                "Email is already used by another student".to_string(),
            ));
        }
    }

    let updates = StudentUpdate {
        full_name: payload.full_name,
        birth_date: payload.birth_date.map(Some),
        email: payload.email.map(Some),
        location: payload.location.map(Some),
        ..Default::default()
    };

    let updated = student_repo
        .update(&auth_claims.username, updates)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to update profile: {}", e),
            )
        })?;

    let response = ProfileResponse {
        student_id: updated.student_id,
        full_name: updated.full_name,
        birth_date: updated.birth_date,
        class_section: updated.class_section,
        department: updated.department,
        email: updated.email,
        location: updated.location,
    };

    Ok((StatusCode::OK, Json(response)))
}
