use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::grading::Classification;
use crate::reporting::{ClassGpaSummary, HistogramBucket, MissingGradeRow, StudentGpaRow};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::route::health,
        routes::auth::route::login,
        routes::auth::route::change_password,
        routes::profile::route::get_profile,
        routes::profile::route::update_profile,
        routes::students::route::get_all_students,
        routes::students::route::create_student,
        routes::students::route::get_sections,
        routes::students::route::get_student,
        routes::students::route::update_student,
        routes::students::route::delete_student,
        routes::students::route::import_students,
        routes::students::route::export_students,
        routes::courses::route::create_course,
        routes::courses::route::get_all_courses,
        routes::courses::route::get_course,
        routes::courses::route::update_course,
        routes::courses::route::delete_course,
        routes::grades::route::get_grade_sheet,
        routes::grades::route::save_grades,
        routes::transcripts::route::get_transcript,
        routes::reports::route::get_high_gpa_report,
        routes::reports::route::get_missing_grade_report,
        routes::reports::route::get_class_gpa_report,
        routes::reports::route::export_class_grades,
        routes::notices::route::create_notice,
        routes::notices::route::get_notices,
        routes::stats::route::get_overview,
    ),
    components(
        schemas(
            RoleEnum,
            Classification,
            StudentGpaRow,
            HistogramBucket,
            ClassGpaSummary,
            MissingGradeRow,
            routes::health::route::HealthResponse,
            routes::auth::dto::LoginRequest,
            routes::auth::dto::LoginResponse,
            routes::auth::dto::ChangePasswordRequest,
            routes::auth::dto::ChangePasswordResponse,
            routes::profile::dto::ProfileResponse,
            routes::profile::dto::UpdateProfileRequest,
            routes::students::dto::CreateStudentRequest,
            routes::students::dto::UpdateStudentRequest,
            routes::students::dto::StudentResponse,
            routes::students::dto::StudentListResponse,
            routes::students::dto::SectionListResponse,
            routes::students::dto::BulkImportResponse,
            routes::students::dto::BulkImportError,
            routes::courses::dto::CreateCourseRequest,
            routes::courses::dto::UpdateCourseRequest,
            routes::courses::dto::CourseResponse,
            routes::courses::dto::CourseListResponse,
            routes::grades::dto::SaveGradesRequest,
            routes::grades::dto::GradeEntry,
            routes::grades::dto::SaveGradesResponse,
            routes::grades::dto::SkippedGrade,
            routes::grades::dto::GradeSheetResponse,
            routes::grades::dto::GradeSheetRow,
            routes::transcripts::dto::TranscriptResponse,
            routes::transcripts::dto::TranscriptRow,
            routes::reports::dto::HighGpaReportResponse,
            routes::reports::dto::MissingGradeReportResponse,
            routes::notices::dto::CreateNoticeRequest,
            routes::notices::dto::NoticeResponse,
            routes::notices::dto::NoticeListResponse,
            routes::stats::dto::OverviewResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Authentication", description = "Login and password management"),
        (name = "Profile", description = "Student self-service profile"),
        (name = "Students", description = "Student roster management"),
        (name = "Courses", description = "Course catalog management"),
        (name = "Grades", description = "Grade entry and bulk save"),
        (name = "Transcripts", description = "Per-student transcripts and GPA"),
        (name = "Reports", description = "Academic standing reports"),
        (name = "Notices", description = "Class section notices"),
        (name = "Stats", description = "Dashboard counters"),
    ),
    info(
        title = "Student Records Service API",
        description = "Accounts, students, courses, grades, reports and notices",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
