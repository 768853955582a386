use std::collections::{HashMap, HashSet};

use axum::{
    Json, Router,
    body::Body,
    extract::Query,
    http::{StatusCode, header},
    response::Response,
    routing::get,
};

use super::dto::{
    ClassSectionParams, HighGpaReportResponse, MissingGradeParams, MissingGradeReportResponse,
};
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::reporting::{
    ClassGpaSummary, HIGH_GPA_THRESHOLD, MissingGradeRow, class_gpa_report, high_gpa_report,
    missing_students, pivot_grade_sheet,
};
use crate::repositories::{
    CourseRepository, ReportRepository, ScoreRepository, StudentFilter, StudentRepository,
};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/reports/high-gpa", get(get_high_gpa_report))
        .route("/api/v1/reports/missing-grade", get(get_missing_grade_report))
        .route("/api/v1/reports/class-gpa", get(get_class_gpa_report))
        .route(
            "/api/v1/reports/class-grades/export",
            get(export_class_grades),
        )
}

/// Students with a GPA-10 strictly above 8.0, sorted descending, with a
/// classification histogram (Instructor only)
#[utoipa::path(
    get,
    path = "/api/v1/reports/high-gpa",
    responses(
        (status = 200, description = "High-GPA report", body = HighGpaReportResponse),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn get_high_gpa_report(
    AuthClaims(auth_claims): AuthClaims,
) -> Result<(StatusCode, Json<HighGpaReportResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let report_repo = ReportRepository::new();

    let rows = report_repo.load_score_rows().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to load score rows: {}", e),
        )
    })?;

    let (students, histogram) = high_gpa_report(&rows, HIGH_GPA_THRESHOLD);

    let response = HighGpaReportResponse {
        threshold: HIGH_GPA_THRESHOLD,
        total: students.len(),
        students,
        histogram,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Students without a score for the chosen course (Instructor only).
/// No course chosen means an empty result, not an error.
#[utoipa::path(
    get,
    path = "/api/v1/reports/missing-grade",
    params(MissingGradeParams),
    responses(
        (status = 200, description = "Missing-grade report", body = MissingGradeReportResponse),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn get_missing_grade_report(
    AuthClaims(auth_claims): AuthClaims,
    Query(params): Query<MissingGradeParams>,
) -> Result<(StatusCode, Json<MissingGradeReportResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let course_code = match params.course_code.filter(|code| !code.trim().is_empty()) {
        Some(code) => code,
        None => {
            return Ok((
                StatusCode::OK,
                Json(MissingGradeReportResponse {
                    course_code: None,
                    total: 0,
                    students: Vec::new(),
                }),
            ));
        }
    };

    let student_repo = StudentRepository::new();
    let score_repo = ScoreRepository::new();

    let students = student_repo
        .find_all(StudentFilter::default())
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get students: {}", e),
            )
        })?;

    let graded: HashSet<String> = score_repo
        .graded_student_ids(&course_code)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get graded students: {}", e),
            )
        })?
        .into_iter()
        .collect();

    let all_students: Vec<MissingGradeRow> = students
        .into_iter()
        .map(|s| MissingGradeRow {
            student_id: s.student_id,
            full_name: s.full_name,
            class_section: s.class_section,
        })
        .collect();

    let missing = missing_students(&all_students, &graded);

    let response = MissingGradeReportResponse {
        course_code: Some(course_code),
        total: missing.len(),
        students: missing,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// GPA summary of one class section (Instructor only)
#[utoipa::path(
    get,
    path = "/api/v1/reports/class-gpa",
    params(ClassSectionParams),
    responses(
        (status = 200, description = "Class GPA report", body = ClassGpaSummary),
        (status = 400, description = "No class section selected"),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn get_class_gpa_report(
    AuthClaims(auth_claims): AuthClaims,
    Query(params): Query<ClassSectionParams>,
) -> Result<(StatusCode, Json<ClassGpaSummary>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let class_section = params
        .class_section
        .filter(|section| !section.trim().is_empty())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "No class section selected".to_string(),
            )
        })?;

    let report_repo = ReportRepository::new();

    let rows = report_repo
        .load_score_rows_for_section(&class_section)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to load score rows: {}", e),
            )
        })?;

    Ok((StatusCode::OK, Json(class_gpa_report(&rows))))
}

/// Pivoted CSV grade sheet of one class section, one row per student and
/// one column per course (Instructor only)
#[utoipa::path(
    get,
    path = "/api/v1/reports/class-grades/export",
    params(ClassSectionParams),
    responses(
        (status = 200, description = "CSV grade sheet", content_type = "text/csv"),
        (status = 400, description = "No class section selected"),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 404, description = "No students in the class section"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn export_class_grades(
    AuthClaims(auth_claims): AuthClaims,
    Query(params): Query<ClassSectionParams>,
) -> Result<Response, (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let class_section = params
        .class_section
        .filter(|section| !section.trim().is_empty())
        .ok_or_else(|| {
            (
                StatusCode::BAD_REQUEST,
                "No class section selected".to_string(),
            )
        })?;

    let student_repo = StudentRepository::new();
    let course_repo = CourseRepository::new();
    let score_repo = ScoreRepository::new();

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

    let courses = course_repo.find_all_by_code().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to get courses: {}", e),
        )
    })?;

    let student_ids: Vec<String> = students.iter().map(|s| s.student_id.clone()).collect();
    let scores = score_repo.find_for_students(student_ids).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to get scores: {}", e),
        )
    })?;

    let student_names: Vec<(String, String)> = students
        .into_iter()
        .map(|s| (s.student_id, s.full_name))
        .collect();
    let course_codes: Vec<String> = courses.into_iter().map(|c| c.course_code).collect();
    let score_map: HashMap<(String, String), f64> = scores
        .into_iter()
        .map(|s| ((s.student_id, s.course_code), s.score))
        .collect();

    let sheet = pivot_grade_sheet(&student_names, &course_codes, &score_map);

    let mut writer = csv::Writer::from_writer(vec![]);
    for row in sheet {
        writer.write_record(&row).map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to write CSV: {}", e),
            )
        })?;
    }
    let data = writer.into_inner().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to finish CSV: {}", e),
        )
    })?;

    let filename = format!("grades_{}.csv", class_section);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        )
        .body(Body::from(data))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to build response: {}", e),
            )
        })
}
