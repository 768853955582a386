use std::collections::HashMap;

use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{course, score, student};
use crate::reporting::ScoreRow;
use crate::static_service::DATABASE_CONNECTION;

/// Read side of the reports: fetches score rows joined with student and
/// course data; the aggregation itself lives in `reporting` so it stays
/// testable without a database.
pub struct ReportRepository;

impl ReportRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn load_score_rows(&self) -> Result<Vec<ScoreRow>> {
        let db = self.get_connection();
        let scored = score::Entity::find()
            .find_also_related(course::Entity)
            .all(db)
            .await?;
        let students = student::Entity::find().all(db).await?;
        Ok(Self::join_rows(scored, students))
    }

    pub async fn load_score_rows_for_section(&self, class_section: &str) -> Result<Vec<ScoreRow>> {
        let db = self.get_connection();
        let students = student::Entity::find()
            .filter(student::Column::ClassSection.eq(class_section))
            .all(db)
            .await?;

        if students.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<String> = students.iter().map(|s| s.student_id.clone()).collect();
        let scored = score::Entity::find()
            .filter(score::Column::StudentId.is_in(student_ids))
            .find_also_related(course::Entity)
            .all(db)
            .await?;
        Ok(Self::join_rows(scored, students))
    }

    fn join_rows(
        scored: Vec<(score::Model, Option<course::Model>)>,
        students: Vec<student::Model>,
    ) -> Vec<ScoreRow> {
        let student_map: HashMap<String, &student::Model> = students
            .iter()
            .map(|s| (s.student_id.clone(), s))
            .collect();

        scored
            .into_iter()
            .filter_map(|(score_row, course_row)| {
                let course_row = course_row?;
                let student_row = student_map.get(&score_row.student_id)?;
                Some(ScoreRow {
                    student_id: score_row.student_id,
                    full_name: student_row.full_name.clone(),
                    class_section: student_row.class_section.clone(),
                    score: score_row.score,
                    credits: course_row.credits,
                })
            })
            .collect()
    }
}
