use std::collections::{HashMap, HashSet};

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};

use super::dto::{
    GradeSheetResponse, GradeSheetRow, SaveGradesRequest, SaveGradesResponse, partition_entries,
};
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{CourseRepository, ScoreRepository, StudentRepository};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/grades", post(save_grades))
        .route(
            "/api/v1/grades/{class_section}/{course_code}",
            get(get_grade_sheet),
        )
}

/// Get the grade sheet of a class section for one course (Instructor only)
#[utoipa::path(
    get,
    path = "/api/v1/grades/{class_section}/{course_code}",
    params(
        ("class_section" = String, Path, description = "Class section"),
        ("course_code" = String, Path, description = "Course code")
    ),
    responses(
        (status = 200, description = "Grade sheet retrieved", body = GradeSheetResponse),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 404, description = "Course or class section not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn get_grade_sheet(
    AuthClaims(auth_claims): AuthClaims,
    Path((class_section, course_code)): Path<(String, String)>,
) -> Result<(StatusCode, Json<GradeSheetResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let course_repo = CourseRepository::new();
    let student_repo = StudentRepository::new();
    let score_repo = ScoreRepository::new();

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

    let students = student_repo.find_by_section(&class_section).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to get students: {}", e),
        )
    })?;

    if students.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            format!("No students found in class section {}", class_section),
        ));
    }

    let student_ids: Vec<String> = students.iter().map(|s| s.student_id.clone()).collect();

    let scores = score_repo
        .find_for_students_and_course(student_ids, &course_code)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get scores: {}", e),
            )
        })?;

    let by_student: HashMap<String, f64> = scores
        .into_iter()
        .map(|s| (s.student_id, s.score))
        .collect();

    let rows = students
        .into_iter()
        .map(|s| GradeSheetRow {
            score: by_student.get(&s.student_id).copied(),
            student_id: s.student_id,
            full_name: s.full_name,
        })
        .collect();

    let response = GradeSheetResponse {
        course_code,
        class_section,
        rows,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Save a batch of grades for one course and class section (Instructor only).
/// Accepted rows are written in a single transaction; invalid rows are
/// reported back as skipped instead of failing the batch.
#[utoipa::path(
    post,
    path = "/api/v1/grades",
    request_body = SaveGradesRequest,
    responses(
        (status = 200, description = "Grades saved", body = SaveGradesResponse),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
pub async fn save_grades(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<SaveGradesRequest>,
) -> Result<(StatusCode, Json<SaveGradesResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let course_repo = CourseRepository::new();
    let student_repo = StudentRepository::new();
    let score_repo = ScoreRepository::new();

    course_repo
        .find_by_id(&payload.course_code)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get course: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Course not found".to_string()))?;

    let students = student_repo
        .find_by_section(&payload.class_section)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get students: {}", e),
            )
        })?;

    let known_students: HashSet<String> =
        students.into_iter().map(|s| s.student_id).collect();

    let (accepted, skipped) = partition_entries(&payload.entries, &known_students);

    let (created, updated) = if accepted.is_empty() {
        (0, 0)
    } else {
        score_repo
            .save_batch(&payload.course_code, accepted)
            .await
            .map_err(|e| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to save grades: {}", e),
                )
            })?
    };

    let response = SaveGradesResponse {
        created,
        updated,
        skipped,
    };

    Ok((StatusCode::OK, Json(response)))
}
