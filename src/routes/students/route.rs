use std::collections::HashMap;
use std::io::Cursor;

use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Path, Query},
    http::{StatusCode, header},
    response::Response,
    routing::{get, post},
};
use calamine::{DataType, Reader, Xlsx, open_workbook_from_rs};

use super::dto::{
    BulkImportError, BulkImportResponse, CreateStudentRequest, ImportStudentRow,
    SectionListResponse, StudentListResponse, StudentQueryParams, StudentResponse,
    UpdateStudentRequest,
};
use crate::config::DEFAULT_STUDENT_PASSWORD_SUFFIX;
use crate::entities::student;
use crate::extractor::AuthClaims;
use crate::middleware::permission;
use crate::repositories::{NewStudent, StudentFilter, StudentRepository, StudentUpdate};

pub fn create_route() -> Router {
    Router::new()
        .route("/api/v1/students", get(get_all_students).post(create_student))
        .route("/api/v1/students/sections", get(get_sections))
        .route("/api/v1/students/import", post(import_students))
        .route("/api/v1/students/export", get(export_students))
        .route(
            "/api/v1/students/{student_id}",
            get(get_student).put(update_student).delete(delete_student),
        )
}

fn to_response(student: student::Model) -> StudentResponse {
    StudentResponse {
        student_id: student.student_id,
        full_name: student.full_name,
        birth_date: student.birth_date,
        class_section: student.class_section,
        department: student.department,
        email: student.email,
        location: student.location,
    }
}

fn filter_from_params(params: StudentQueryParams) -> StudentFilter {
    StudentFilter {
        student_id: params.student_id,
        full_name: params.full_name,
        class_section: params.class_section,
        department: params.department,
    }
}

/// List students with optional filters (Instructor only)
#[utoipa::path(
    get,
    path = "/api/v1/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "Students retrieved", body = StudentListResponse),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_all_students(
    AuthClaims(auth_claims): AuthClaims,
    Query(params): Query<StudentQueryParams>,
) -> Result<(StatusCode, Json<StudentListResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let student_repo = StudentRepository::new();
    let students = student_repo
        .find_all(filter_from_params(params))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get students: {}", e),
            )
        })?;

    let response = StudentListResponse {
        total: students.len(),
        students: students.into_iter().map(to_response).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Create a student and its account in one transaction (Instructor only)
#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Duplicate student id or invalid data"),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn create_student(
    AuthClaims(auth_claims): AuthClaims,
    Json(payload): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    if payload.student_id.trim().is_empty() || payload.full_name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "student_id and full_name are required".to_string(),
        ));
    }

    let student_repo = StudentRepository::new();

    let existing = student_repo
        .existing_ids(vec![payload.student_id.clone()])
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to check student id: {}", e),
            )
        })?;
    if !existing.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Student id {} already exists", payload.student_id),
        ));
    }

    let password = payload.password.clone().unwrap_or_else(|| {
        format!(
            "{}{}",
            payload.student_id, DEFAULT_STUDENT_PASSWORD_SUFFIX
        )
    });
    let hashed_password = bcrypt::hash(&password, bcrypt::DEFAULT_COST).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to hash password: {}", e),
        )
    })?;

    let created = student_repo
        .create(NewStudent {
            student_id: payload.student_id,
            full_name: payload.full_name,
            hashed_password,
            birth_date: payload.birth_date,
            class_section: payload.class_section,
            department: payload.department,
            email: payload.email,
            location: payload.location,
        })
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create student: {}", e),
            )
        })?;

    Ok((StatusCode::CREATED, Json(to_response(created))))
}

/// Distinct non-empty class sections
#[utoipa::path(
    get,
    path = "/api/v1/students/sections",
    responses(
        (status = 200, description = "Sections retrieved", body = SectionListResponse),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_sections(
    AuthClaims(_auth_claims): AuthClaims,
) -> Result<(StatusCode, Json<SectionListResponse>), (StatusCode, String)> {
    let student_repo = StudentRepository::new();
    let sections = student_repo.distinct_sections().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to get sections: {}", e),
        )
    })?;

    Ok((StatusCode::OK, Json(SectionListResponse { sections })))
}

/// Get one student (self or instructor)
#[utoipa::path(
    get,
    path = "/api/v1/students/{student_id}",
    params(
        ("student_id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student retrieved", body = StudentResponse),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn get_student(
    AuthClaims(auth_claims): AuthClaims,
    Path(student_id): Path<String>,
) -> Result<(StatusCode, Json<StudentResponse>), (StatusCode, String)> {
    permission::require_self_or_instructor(&auth_claims, &student_id)?;

    let student_repo = StudentRepository::new();
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

    Ok((StatusCode::OK, Json(to_response(student))))
}

/// Update a student (Instructor only)
#[utoipa::path(
    put,
    path = "/api/v1/students/{student_id}",
    params(
        ("student_id" = String, Path, description = "Student ID")
    ),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Email already in use"),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn update_student(
    AuthClaims(auth_claims): AuthClaims,
    Path(student_id): Path<String>,
    Json(payload): Json<UpdateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let student_repo = StudentRepository::new();

    student_repo
        .find_by_id(&student_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get student: {}", e),
            )
        })?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Student not found".to_string()))?;

    if let Some(email) = &payload.email {
        let taken = student_repo
            .is_email_taken(email, &student_id)
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
        class_section: payload.class_section.map(Some),
        department: payload.department.map(Some),
        email: payload.email.map(Some),
        location: payload.location.map(Some),
    };

    let updated = student_repo
        .update(&student_id, updates)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to update student: {}", e),
            )
        })?;

    Ok((StatusCode::OK, Json(to_response(updated))))
}

/// Delete a student (Instructor only). Removes the account; the student row
/// and all its scores go with it through the database cascades.
#[utoipa::path(
    delete,
    path = "/api/v1/students/{student_id}",
    params(
        ("student_id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn delete_student(
    AuthClaims(auth_claims): AuthClaims,
    Path(student_id): Path<String>,
) -> Result<StatusCode, (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let student_repo = StudentRepository::new();
    let result = student_repo.delete(&student_id).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to delete student: {}", e),
        )
    })?;

    if result.rows_affected == 0 {
        return Err((StatusCode::NOT_FOUND, "Student not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Bulk import students from an xlsx upload (Instructor only)
///
/// The first row names the columns. Rows that fail validation or collide
/// with existing ids are reported per row; the valid remainder is written in
/// a single transaction.
#[utoipa::path(
    post,
    path = "/api/v1/students/import",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Import completed", body = BulkImportResponse),
        (status = 400, description = "Bad request"),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn import_students(
    AuthClaims(auth_claims): AuthClaims,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<BulkImportResponse>), (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let mut file_data: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart: {}", e),
        )
    })? {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let data = field.bytes().await.map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read file: {}", e),
                )
            })?;
            file_data = Some(data.to_vec());
            break;
        }
    }

    let file_data =
        file_data.ok_or_else(|| (StatusCode::BAD_REQUEST, "No file provided".to_string()))?;

    let cursor = Cursor::new(file_data);
    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to open Excel file: {}", e),
        )
    })?;

    let sheet_names = workbook.sheet_names().to_owned();
    let first_sheet = sheet_names.first().ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "Excel file has no sheets".to_string(),
        )
    })?;

    let range = workbook.worksheet_range(first_sheet).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read sheet: {}", e),
        )
    })?;

    let mut rows_iter = range.rows();

    // Header row maps column names to indexes
    let header_row = rows_iter.next().ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "Excel file has no header row".to_string(),
        )
    })?;
    let mut columns: HashMap<String, usize> = HashMap::new();
    for (idx, cell) in header_row.iter().enumerate() {
        if let Some(name) = cell.as_string() {
            columns.insert(name.trim().to_lowercase(), idx);
        }
    }

    for required in ["student_id", "full_name", "password", "role"] {
        if !columns.contains_key(required) {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Missing required column: {}", required),
            ));
        }
    }

    let cell_at = |row: &[calamine::Data], name: &str| -> Option<String> {
        columns
            .get(name)
            .and_then(|idx| row.get(*idx))
            .and_then(|cell| cell.as_string())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let mut parsed_rows: Vec<(usize, ImportStudentRow)> = Vec::new();
    let mut errors: Vec<BulkImportError> = Vec::new();
    let mut total_records = 0;

    for (idx, row) in rows_iter.enumerate() {
        let row_num = idx + 2;
        total_records += 1;

        let import_row = ImportStudentRow {
            student_id: cell_at(row, "student_id").unwrap_or_default(),
            full_name: cell_at(row, "full_name").unwrap_or_default(),
            password: cell_at(row, "password").unwrap_or_default(),
            role: cell_at(row, "role").unwrap_or_default(),
            birth_date: cell_at(row, "birth_date"),
            class_section: cell_at(row, "class_section"),
            department: cell_at(row, "department"),
            email: cell_at(row, "email"),
            location: cell_at(row, "location"),
        };

        match import_row.validate() {
            Ok(()) => parsed_rows.push((row_num, import_row)),
            Err(error) => errors.push(BulkImportError {
                row: row_num,
                student_id: import_row.student_id,
                error,
            }),
        }
    }

    // Duplicate ids (against the store and within the file) become per-row
    // errors instead of aborting the batch
    let student_repo = StudentRepository::new();
    let candidate_ids: Vec<String> = parsed_rows
        .iter()
        .map(|(_, row)| row.student_id.clone())
        .collect();
    let existing: std::collections::HashSet<String> = student_repo
        .existing_ids(candidate_ids)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to check existing ids: {}", e),
            )
        })?
        .into_iter()
        .collect();

    let mut seen: std::collections::HashSet<String> = std::collections::HashSet::new();
    let mut new_students: Vec<NewStudent> = Vec::new();
    for (row_num, row) in parsed_rows {
        if existing.contains(&row.student_id) {
            errors.push(BulkImportError {
                row: row_num,
                student_id: row.student_id,
                error: "Student id already exists".to_string(),
            });
            continue;
        }
        if !seen.insert(row.student_id.clone()) {
            errors.push(BulkImportError {
                row: row_num,
                student_id: row.student_id,
                error: "Duplicate student id in file".to_string(),
            });
            continue;
        }

        let birth_date = match row.parse_birth_date() {
            Ok(date) => date,
            Err(error) => {
                errors.push(BulkImportError {
                    row: row_num,
                    student_id: row.student_id,
                    error,
                });
                continue;
            }
        };

        let hashed_password = match bcrypt::hash(&row.password, bcrypt::DEFAULT_COST) {
            Ok(hash) => hash,
            Err(e) => {
                errors.push(BulkImportError {
                    row: row_num,
                    student_id: row.student_id,
                    error: format!("Failed to hash password: {}", e),
                });
                continue;
            }
        };

        new_students.push(NewStudent {
            student_id: row.student_id,
            full_name: row.full_name,
            hashed_password,
            birth_date,
            class_section: row.class_section,
            department: row.department,
            email: row.email,
            location: row.location,
        });
    }

    let successful = if new_students.is_empty() {
        0
    } else {
        student_repo.create_many(new_students).await.map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to import students: {}", e),
            )
        })?
    };

    let response = BulkImportResponse {
        total_records,
        successful,
        failed: errors.len(),
        errors,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Export the filtered roster as CSV (Instructor only)
#[utoipa::path(
    get,
    path = "/api/v1/students/export",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "CSV file", body = String, content_type = "text/csv"),
        (status = 403, description = "Forbidden - Instructor only"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
pub async fn export_students(
    AuthClaims(auth_claims): AuthClaims,
    Query(params): Query<StudentQueryParams>,
) -> Result<Response, (StatusCode, String)> {
    permission::require_instructor(&auth_claims)?;

    let student_repo = StudentRepository::new();
    let students = student_repo
        .find_all(filter_from_params(params))
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to get students: {}", e),
            )
        })?;

    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record([
            "student_id",
            "full_name",
            "birth_date",
            "class_section",
            "department",
            "email",
            "location",
        ])
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to write CSV: {}", e),
            )
        })?;

    for student in students {
        writer
            .write_record([
                student.student_id,
                student.full_name,
                student
                    .birth_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                student.class_section.unwrap_or_default(),
                student.department.unwrap_or_default(),
                student.email.unwrap_or_default(),
                student.location.unwrap_or_default(),
            ])
            .map_err(|e| {
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

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"students.csv\"",
        )
        .body(Body::from(data))
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to build response: {}", e),
            )
        })
}
