use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub student_id: String,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub class_section: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
}

/// Section and department are assigned by instructors and cannot be
/// self-edited.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[schema(example = "Nguyen Van A")]
    pub full_name: Option<String>,

    #[schema(example = "2003-09-01")]
    pub birth_date: Option<NaiveDate>,

    #[schema(example = "sv001@example.com")]
    pub email: Option<String>,

    #[schema(example = "Hanoi")]
    pub location: Option<String>,
}
