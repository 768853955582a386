use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::reporting::{HistogramBucket, MissingGradeRow, StudentGpaRow};

#[derive(Debug, Serialize, ToSchema)]
pub struct HighGpaReportResponse {
    pub threshold: f64,
    pub total: usize,
    pub students: Vec<StudentGpaRow>,
    pub histogram: Vec<HistogramBucket>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MissingGradeParams {
    /// Course to check; omitted means no selection and an empty result
    pub course_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MissingGradeReportResponse {
    pub course_code: Option<String>,
    pub total: usize,
    pub students: Vec<MissingGradeRow>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ClassSectionParams {
    /// Class section to report on
    pub class_section: Option<String>,
}
