use axum::{Json, Router, extract::Path, http::StatusCode, routing::get};

use super::dto::{TranscriptResponse, TranscriptRow};
use crate::extractor::AuthClaims;
use crate::grading::{Classification, convert_10_to_4_scale, weighted_gpa};
use crate::middleware::permission;
use crate::repositories::{ScoreRepository, StudentRepository};

pub fn create_route() -> Router {
    Router::new().route("/api/v1/transcripts/{student_id}", get(get_transcript))
}

/// Get the transcript of a student with per-course grades and the weighted
/// GPA on both scales. Students can only read their own transcript.
#[utoipa::path(
    get,
    path = "/api/v1/transcripts/{student_id}",
    params(
        ("student_id" = String, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "Transcript retrieved", body = TranscriptResponse),
        (status = 403, description = "Forbidden - Not your transcript"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Transcripts"
)]
pub async fn get_transcript(
    AuthClaims(auth_claims): AuthClaims,
    Path(student_id): Path<String>,
) -> Result<(StatusCode, Json<TranscriptResponse>), (StatusCode, String)> {
    permission::require_self_or_instructor(&auth_claims, &student_id)?;

    let student_repo = StudentRepository::new();
    let score_repo = ScoreRepository::new();

    let student = student_repo
        .find_by_id(&student_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get student: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Student not found".to_string()))?;

    let graded = score_repo
        .find_by_student_with_courses(&student_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get scores: {}", e),
            )
        })?;

    let mut rows = Vec::with_capacity(graded.len());
    let mut pairs = Vec::with_capacity(graded.len());
    let mut total_credits = 0;

    for (score, course) in graded {
        // Scores cascade with courses, so the course is always present.
        let Some(course) = course else { continue };
        pairs.push((score.score, course.credits));
        total_credits += course.credits;
        rows.push(TranscriptRow {
            course_code: course.course_code,
            title: course.title,
            credits: course.credits,
            grade_10: score.score,
            grade_4: convert_10_to_4_scale(score.score),
        });
    }

    let gpa = weighted_gpa(&pairs);

    let response = TranscriptResponse {
        student_id: student.student_id,
        full_name: student.full_name,
        class_section: student.class_section,
        rows,
        total_credits,
        gpa_10: gpa.gpa_10,
        gpa_4: gpa.gpa_4,
        classification: Classification::from_gpa_10(gpa.gpa_10).label().to_string(),
    };

    Ok((StatusCode::OK, Json(response)))
}
