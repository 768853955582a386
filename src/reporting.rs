use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use utoipa::ToSchema;

use crate::grading::{Classification, weighted_gpa};

/// GPA-10 must be strictly greater than this to appear in the high-GPA report.
pub const HIGH_GPA_THRESHOLD: f64 = 8.0;

/// One graded course of one student, joined with profile and course data.
#[derive(Debug, Clone)]
pub struct ScoreRow {
    pub student_id: String,
    pub full_name: String,
    pub class_section: Option<String>,
    pub score: f64,
    pub credits: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentGpaRow {
    pub student_id: String,
    pub full_name: String,
    pub class_section: Option<String>,
    pub gpa_10: f64,
    pub gpa_4: f64,
    pub classification: Classification,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HistogramBucket {
    pub classification: Classification,
    pub count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClassGpaSummary {
    pub graded_students: usize,
    pub avg_gpa_10: f64,
    pub avg_gpa_4: f64,
    pub students: Vec<StudentGpaRow>,
    pub histogram: Vec<HistogramBucket>,
}

/// Per-student GPAs over a set of joined score rows, ordered by student id.
///
/// Students without any score row never appear; that is the inner join the
/// reports rely on, not an explicit filter.
pub fn student_gpas(rows: &[ScoreRow]) -> Vec<StudentGpaRow> {
    struct Grouped {
        full_name: String,
        class_section: Option<String>,
        pairs: Vec<(f64, i32)>,
    }

    let mut grouped: BTreeMap<String, Grouped> = BTreeMap::new();
    for row in rows {
        grouped
            .entry(row.student_id.clone())
            .or_insert_with(|| Grouped {
                full_name: row.full_name.clone(),
                class_section: row.class_section.clone(),
                pairs: Vec::new(),
            })
            .pairs
            .push((row.score, row.credits));
    }

    grouped
        .into_iter()
        .map(|(student_id, group)| {
            let gpa = weighted_gpa(&group.pairs);
            StudentGpaRow {
                student_id,
                full_name: group.full_name,
                class_section: group.class_section,
                gpa_10: gpa.gpa_10,
                gpa_4: gpa.gpa_4,
                classification: Classification::from_gpa_10(gpa.gpa_10),
            }
        })
        .collect()
}

/// Students whose GPA-10 is strictly above `threshold`, sorted descending by
/// GPA-10, plus a classification histogram over the retained set. The
/// histogram always carries all five categories, zero counts included.
pub fn high_gpa_report(
    rows: &[ScoreRow],
    threshold: f64,
) -> (Vec<StudentGpaRow>, Vec<HistogramBucket>) {
    let mut students: Vec<StudentGpaRow> = student_gpas(rows)
        .into_iter()
        .filter(|row| row.gpa_10 > threshold)
        .collect();
    students.sort_by(|a, b| b.gpa_10.total_cmp(&a.gpa_10));

    let mut counts: HashMap<Classification, usize> = HashMap::new();
    for row in &students {
        *counts.entry(row.classification).or_insert(0) += 1;
    }

    let histogram = Classification::ALL
        .iter()
        .map(|classification| HistogramBucket {
            classification: *classification,
            count: counts.get(classification).copied().unwrap_or(0),
        })
        .collect();

    (students, histogram)
}

/// Unweighted means of per-student GPAs for one class section.
///
/// Unlike the high-GPA report this histogram omits empty categories; the two
/// reports intentionally present their distributions differently.
pub fn class_gpa_report(rows: &[ScoreRow]) -> ClassGpaSummary {
    let students = student_gpas(rows);
    let graded_students = students.len();

    let (avg_gpa_10, avg_gpa_4) = if graded_students == 0 {
        (0.0, 0.0)
    } else {
        let total = graded_students as f64;
        (
            students.iter().map(|s| s.gpa_10).sum::<f64>() / total,
            students.iter().map(|s| s.gpa_4).sum::<f64>() / total,
        )
    };

    let mut counts: HashMap<Classification, usize> = HashMap::new();
    for row in &students {
        *counts.entry(row.classification).or_insert(0) += 1;
    }

    let histogram = Classification::ALL
        .iter()
        .filter_map(|classification| {
            counts.get(classification).map(|count| HistogramBucket {
                classification: *classification,
                count: *count,
            })
        })
        .collect();

    ClassGpaSummary {
        graded_students,
        avg_gpa_10,
        avg_gpa_4,
        students,
        histogram,
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MissingGradeRow {
    pub student_id: String,
    pub full_name: String,
    pub class_section: Option<String>,
}

/// Set difference: students with no score row for the chosen course,
/// sorted by class section then student id.
pub fn missing_students(
    students: &[MissingGradeRow],
    graded_ids: &HashSet<String>,
) -> Vec<MissingGradeRow> {
    let mut missing: Vec<MissingGradeRow> = students
        .iter()
        .filter(|student| !graded_ids.contains(&student.student_id))
        .cloned()
        .collect();
    missing.sort_by(|a, b| {
        (a.class_section.as_deref(), a.student_id.as_str())
            .cmp(&(b.class_section.as_deref(), b.student_id.as_str()))
    });
    missing
}

/// Pivoted grade sheet for CSV export: one row per student, one column per
/// course, empty cells where no score exists.
pub fn pivot_grade_sheet(
    students: &[(String, String)],
    course_codes: &[String],
    scores: &HashMap<(String, String), f64>,
) -> Vec<Vec<String>> {
    let mut sheet = Vec::with_capacity(students.len() + 1);

    let mut header = vec!["student_id".to_string(), "full_name".to_string()];
    header.extend(course_codes.iter().cloned());
    sheet.push(header);

    for (student_id, full_name) in students {
        let mut row = vec![student_id.clone(), full_name.clone()];
        for course_code in course_codes {
            let cell = scores
                .get(&(student_id.clone(), course_code.clone()))
                .map(|score| score.to_string())
                .unwrap_or_default();
            row.push(cell);
        }
        sheet.push(row);
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(student_id: &str, name: &str, section: &str, score: f64, credits: i32) -> ScoreRow {
        ScoreRow {
            student_id: student_id.to_string(),
            full_name: name.to_string(),
            class_section: Some(section.to_string()),
            score,
            credits,
        }
    }

    #[test]
    fn student_gpas_groups_by_student() {
        let rows = vec![
            row("SV002", "Binh", "K1", 6.0, 2),
            row("SV001", "An", "K1", 9.0, 3),
            row("SV001", "An", "K1", 7.0, 1),
        ];

        let gpas = student_gpas(&rows);
        assert_eq!(gpas.len(), 2);
        assert_eq!(gpas[0].student_id, "SV001");
        assert_eq!(gpas[0].gpa_10, 8.5);
        assert_eq!(gpas[1].student_id, "SV002");
        assert_eq!(gpas[1].gpa_10, 6.0);
    }

    #[test]
    fn high_gpa_threshold_is_strict() {
        let rows = vec![
            row("SV001", "An", "K1", 8.0, 3),
            row("SV002", "Binh", "K1", 8.5, 3),
        ];

        let (students, _) = high_gpa_report(&rows, HIGH_GPA_THRESHOLD);
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].student_id, "SV002");
    }

    #[test]
    fn high_gpa_sorts_descending_and_keeps_empty_buckets() {
        let rows = vec![
            row("SV001", "An", "K1", 8.5, 3),
            row("SV002", "Binh", "K1", 9.5, 3),
            row("SV003", "Chi", "K2", 9.2, 3),
        ];

        let (students, histogram) = high_gpa_report(&rows, HIGH_GPA_THRESHOLD);
        let ids: Vec<&str> = students.iter().map(|s| s.student_id.as_str()).collect();
        assert_eq!(ids, ["SV002", "SV003", "SV001"]);

        assert_eq!(histogram.len(), 5);
        assert_eq!(histogram[0].classification, Classification::Weak);
        assert_eq!(histogram[0].count, 0);
        assert_eq!(histogram[3].classification, Classification::Good);
        assert_eq!(histogram[3].count, 1);
        assert_eq!(histogram[4].classification, Classification::Excellent);
        assert_eq!(histogram[4].count, 2);
    }

    #[test]
    fn class_report_uses_unweighted_means() {
        // SV001: GPA 8.5 / 4.0, SV002: GPA 5.5 / 2.0. Credits differ so the
        // class mean is not the credit-weighted mean of the raw scores.
        let rows = vec![
            row("SV001", "An", "K1", 8.5, 1),
            row("SV002", "Binh", "K1", 5.5, 5),
        ];

        let summary = class_gpa_report(&rows);
        assert_eq!(summary.graded_students, 2);
        assert_eq!(summary.avg_gpa_10, 7.0);
        assert_eq!(summary.avg_gpa_4, 3.0);
    }

    #[test]
    fn class_histogram_omits_empty_buckets_and_sums_to_count() {
        let rows = vec![
            row("SV001", "An", "K1", 9.5, 3),
            row("SV002", "Binh", "K1", 9.0, 3),
            row("SV003", "Chi", "K1", 5.0, 3),
        ];

        let summary = class_gpa_report(&rows);
        assert_eq!(summary.histogram.len(), 2);
        let total: usize = summary.histogram.iter().map(|b| b.count).sum();
        assert_eq!(total, summary.graded_students);
        assert!(
            summary
                .histogram
                .iter()
                .all(|bucket| bucket.count > 0)
        );
    }

    #[test]
    fn empty_section_yields_zero_averages() {
        let summary = class_gpa_report(&[]);
        assert_eq!(summary.graded_students, 0);
        assert_eq!(summary.avg_gpa_10, 0.0);
        assert_eq!(summary.avg_gpa_4, 0.0);
        assert!(summary.histogram.is_empty());
    }

    #[test]
    fn missing_students_is_a_set_difference() {
        let students = vec![
            MissingGradeRow {
                student_id: "SV003".to_string(),
                full_name: "Chi".to_string(),
                class_section: Some("K2".to_string()),
            },
            MissingGradeRow {
                student_id: "SV001".to_string(),
                full_name: "An".to_string(),
                class_section: Some("K1".to_string()),
            },
            MissingGradeRow {
                student_id: "SV002".to_string(),
                full_name: "Binh".to_string(),
                class_section: Some("K1".to_string()),
            },
        ];
        let graded: HashSet<String> = ["SV002".to_string()].into_iter().collect();

        let missing = missing_students(&students, &graded);
        let ids: Vec<&str> = missing.iter().map(|m| m.student_id.as_str()).collect();
        assert_eq!(ids, ["SV001", "SV003"]);
    }

    #[test]
    fn pivot_sheet_has_one_column_per_course() {
        let students = vec![
            ("SV001".to_string(), "An".to_string()),
            ("SV002".to_string(), "Binh".to_string()),
        ];
        let courses = vec!["CS101".to_string(), "MA102".to_string()];
        let mut scores = HashMap::new();
        scores.insert(("SV001".to_string(), "CS101".to_string()), 8.5);
        scores.insert(("SV002".to_string(), "MA102".to_string()), 7.0);

        let sheet = pivot_grade_sheet(&students, &courses, &scores);
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet[0], ["student_id", "full_name", "CS101", "MA102"]);
        assert_eq!(sheet[1], ["SV001", "An", "8.5", ""]);
        assert_eq!(sheet[2], ["SV002", "Binh", "", "7"]);
    }
}
