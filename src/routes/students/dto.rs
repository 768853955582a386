use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    #[schema(example = "SV001")]
    pub student_id: String,

    #[schema(example = "Nguyen Van A")]
    pub full_name: String,

    /// Omitted: the account gets the default password `{student_id}@123`
    #[schema(example = "SV001@123")]
    pub password: Option<String>,

    #[schema(example = "2003-09-01")]
    pub birth_date: Option<NaiveDate>,

    #[schema(example = "K66-CS1")]
    pub class_section: Option<String>,

    #[schema(example = "Computer Science")]
    pub department: Option<String>,

    #[schema(example = "sv001@example.com")]
    pub email: Option<String>,

    #[schema(example = "Hanoi")]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStudentRequest {
    #[schema(example = "Nguyen Van A")]
    pub full_name: Option<String>,

    #[schema(example = "2003-09-01")]
    pub birth_date: Option<NaiveDate>,

    #[schema(example = "K66-CS1")]
    pub class_section: Option<String>,

    #[schema(example = "Computer Science")]
    pub department: Option<String>,

    #[schema(example = "sv001@example.com")]
    pub email: Option<String>,

    #[schema(example = "Hanoi")]
    pub location: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentResponse {
    pub student_id: String,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub class_section: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentListResponse {
    pub total: usize,
    pub students: Vec<StudentResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SectionListResponse {
    pub sections: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentQueryParams {
    /// Substring match on the student id
    pub student_id: Option<String>,
    /// Substring match on the full name
    pub full_name: Option<String>,
    /// Exact match on the class section
    pub class_section: Option<String>,
    /// Exact match on the department
    pub department: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkImportResponse {
    pub total_records: usize,
    pub successful: usize,
    pub failed: usize,
    pub errors: Vec<BulkImportError>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkImportError {
    pub row: usize,
    pub student_id: String,
    pub error: String,
}

/// One spreadsheet row, mapped by header name before validation.
#[derive(Debug, Clone)]
pub struct ImportStudentRow {
    pub student_id: String,
    pub full_name: String,
    pub password: String,
    pub role: String,
    pub birth_date: Option<String>,
    pub class_section: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
}

impl ImportStudentRow {
    pub fn validate(&self) -> Result<(), String> {
        if self.student_id.trim().is_empty() {
            return Err("student_id is required".to_string());
        }
        if self.full_name.trim().is_empty() {
            return Err("full_name is required".to_string());
        }
        if self.password.is_empty() {
            return Err("password is required".to_string());
        }
        // Only student rows can be imported
        if self.role.trim().to_lowercase() != "student" {
            return Err(format!("Invalid role: {}", self.role));
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(format!("Invalid email: {}", email));
            }
        }
        if let Some(raw) = &self.birth_date {
            self.parse_birth_date_str(raw)?;
        }
        Ok(())
    }

    pub fn parse_birth_date(&self) -> Result<Option<NaiveDate>, String> {
        match &self.birth_date {
            Some(raw) => Ok(Some(self.parse_birth_date_str(raw)?)),
            None => Ok(None),
        }
    }

    fn parse_birth_date_str(&self, raw: &str) -> Result<NaiveDate, String> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| format!("Invalid birth_date (expected YYYY-MM-DD): {}", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_row() -> ImportStudentRow {
        ImportStudentRow {
            student_id: "SV001".to_string(),
            full_name: "Nguyen Van A".to_string(),
            password: "SV001@123".to_string(),
            role: "student".to_string(),
            birth_date: Some("2003-09-01".to_string()),
            class_section: Some("K66-CS1".to_string()),
            department: None,
            email: Some("sv001@example.com".to_string()),
            location: None,
        }
    }

    #[test]
    fn accepts_a_valid_row() {
        assert!(valid_row().validate().is_ok());
        assert_eq!(
            valid_row().parse_birth_date().unwrap(),
            Some(NaiveDate::from_ymd_opt(2003, 9, 1).unwrap())
        );
    }

    #[test]
    fn rejects_missing_required_fields() {
        let mut row = valid_row();
        row.student_id = "  ".to_string();
        assert!(row.validate().is_err());

        let mut row = valid_row();
        row.full_name = String::new();
        assert!(row.validate().is_err());

        let mut row = valid_row();
        row.password = String::new();
        assert!(row.validate().is_err());
    }

    #[test]
    fn rejects_non_student_roles() {
        let mut row = valid_row();
        row.role = "instructor".to_string();
        assert!(row.validate().is_err());

        row.role = "Student".to_string();
        assert!(row.validate().is_ok());
    }

    #[test]
    fn rejects_bad_dates_and_emails() {
        let mut row = valid_row();
        row.birth_date = Some("01/09/2003".to_string());
        assert!(row.validate().is_err());

        let mut row = valid_row();
        row.email = Some("not-an-email".to_string());
        assert!(row.validate().is_err());
    }
}
