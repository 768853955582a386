use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    routing::{get, post},
};

use super::dto::{CreateNoticeRequest, NoticeListResponse, NoticeQueryParams, NoticeResponse};
use crate::entities::notice;
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{NoticeRepository, StudentRepository};

const STUDENT_FEED_LIMIT: u64 = 10;

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/notices", post(create_notice))
        .route("/api/v1/notices", get(get_notices))
}

fn to_response(notice: notice::Model) -> NoticeResponse {
    NoticeResponse {
        id: notice.id,
        title: notice.title,
        body: notice.body,
        sent_at: notice.sent_at,
        sender_id: notice.sender_id,
        class_section: notice.class_section,
    }
}

/// Send a notice to a class section (Instructor only)
#[utoipa::path(
    post,
    path = "/api/v1/notices",
    request_body = CreateNoticeRequest,
    responses(
        (status = 201, description = "Notice created", body = NoticeResponse),
        (status = 400, description = "Missing title, body or class section"),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Notices"
)]
pub async fn create_notice(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<CreateNoticeRequest>,
) -> Result<(StatusCode, Json<NoticeResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    if payload.title.trim().is_empty()
        || payload.body.trim().is_empty()
        || payload.class_section.trim().is_empty()
    {
        return Err((
            StatusCode::BAD_REQUEST,
            "title, body and class_section are required".to_string(),
        ));
    }

    let notice_repo = NoticeRepository::new();

    let created = notice_repo
        .create(
            payload.title,
            payload.body,
            auth_claims.username.clone(),
            payload.class_section,
        )
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create notice: {}", e),
            )
        })?;

    Ok((StatusCode::CREATED, Json(to_response(created))))
}

/// Get notices, newest first. Students see the latest notices of their own
/// class section; instructors see everything, optionally filtered by section.
#[utoipa::path(
    get,
    path = "/api/v1/notices",
    params(NoticeQueryParams),
    responses(
        (status = 200, description = "Notices retrieved", body = NoticeListResponse),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Notices"
)]
pub async fn get_notices(
    AuthClaims(auth_claims): AuthClaims,
    Query(params): Query<NoticeQueryParams>,
) -> Result<(StatusCode, Json<NoticeListResponse>), (StatusCode, String)> {
    let notice_repo = NoticeRepository::new();

    let notices = if permission::is_instructor(&auth_claims) {
        notice_repo
            .find_all(params.class_section)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to get notices: {}", e),
                )
            })?
    } else {
        let student_repo = StudentRepository::new();
        let student = student_repo
            .find_by_id(&auth_claims.username)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to get student: {}", e),
                )
            })?
            .ok_or_else(|| (StatusCode::NOT_FOUND, "Student profile not found".to_string()))?;

        match student.class_section {
            Some(section) => notice_repo
                .find_latest_for_section(&section, STUDENT_FEED_LIMIT)
                .await
                .map_err(|e| {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to get notices: {}", e),
                    )
                })?,
            None => Vec::new(),
        }
    };

    let response = NoticeListResponse {
        total: notices.len(),
        notices: notices.into_iter().map(to_response).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}
