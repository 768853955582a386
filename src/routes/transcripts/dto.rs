use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscriptResponse {
    pub student_id: String,
    pub full_name: String,
    pub class_section: Option<String>,
    pub rows: Vec<TranscriptRow>,
    pub total_credits: i32,
    pub gpa_10: f64,
    pub gpa_4: f64,
    pub classification: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TranscriptRow {
    pub course_code: String,
    pub title: String,
    pub credits: i32,
    pub grade_10: f64,
    pub grade_4: f64,
}
