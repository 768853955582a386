use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveGradesRequest {
    #[schema(example = "CS101")]
    pub course_code: String,

    #[schema(example = "K66-CS1")]
    pub class_section: String,

    pub entries: Vec<GradeEntry>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GradeEntry {
    #[schema(example = "SV001")]
    pub student_id: String,

    /// Null leaves the student ungraded
    #[schema(example = 8.5)]
    pub score: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveGradesResponse {
    pub created: usize,
    pub updated: usize,
    pub skipped: Vec<SkippedGrade>,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct SkippedGrade {
    pub student_id: String,
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeSheetResponse {
    pub course_code: String,
    pub class_section: String,
    pub rows: Vec<GradeSheetRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeSheetRow {
    pub student_id: String,
    pub full_name: String,
    pub score: Option<f64>,
}

/// Splits submitted entries into rows worth persisting and rows to report
/// back as skipped. Entries with a null score are dropped silently.
pub fn partition_entries(
    entries: &[GradeEntry],
    known_students: &HashSet<String>,
) -> (Vec<(String, f64)>, Vec<SkippedGrade>) {
    let mut accepted = Vec::new();
    let mut skipped = Vec::new();

    for entry in entries {
        let Some(score) = entry.score else {
            continue;
        };
        if !known_students.contains(&entry.student_id) {
            skipped.push(SkippedGrade {
                student_id: entry.student_id.clone(),
                reason: "Student not found in this class section".to_string(),
            });
            continue;
        }
        if !(0.0..=10.0).contains(&score) {
            skipped.push(SkippedGrade {
                student_id: entry.student_id.clone(),
                reason: format!("Score {} is outside the range 0 to 10", score),
            });
            continue;
        }
        accepted.push((entry.student_id.clone(), score));
    }

    (accepted, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> HashSet<String> {
        ["SV001", "SV002"].iter().map(|s| s.to_string()).collect()
    }

    fn entry(student_id: &str, score: Option<f64>) -> GradeEntry {
        GradeEntry {
            student_id: student_id.to_string(),
            score,
        }
    }

    #[test]
    fn null_scores_are_ignored() {
        let (accepted, skipped) =
            partition_entries(&[entry("SV001", None), entry("SV002", Some(7.0))], &known());
        assert_eq!(accepted, vec![("SV002".to_string(), 7.0)]);
        assert!(skipped.is_empty());
    }

    #[test]
    fn out_of_range_scores_are_skipped_with_reason() {
        let (accepted, skipped) = partition_entries(
            &[
                entry("SV001", Some(10.5)),
                entry("SV002", Some(-0.1)),
            ],
            &known(),
        );
        assert!(accepted.is_empty());
        assert_eq!(skipped.len(), 2);
        assert!(skipped[0].reason.contains("outside the range"));
    }

    #[test]
    fn unknown_students_are_skipped() {
        let (accepted, skipped) =
            partition_entries(&[entry("SV999", Some(5.0))], &known());
        assert!(accepted.is_empty());
        assert_eq!(skipped[0].student_id, "SV999");
        assert!(skipped[0].reason.contains("not found"));
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        let (accepted, skipped) = partition_entries(
            &[entry("SV001", Some(0.0)), entry("SV002", Some(10.0))],
            &known(),
        );
        assert_eq!(accepted.len(), 2);
        assert!(skipped.is_empty());
    }
}
