use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::entities::{course, score};
use crate::static_service::DATABASE_CONNECTION;

pub struct ScoreRepository;

impl ScoreRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    /// Scores of one student joined with their courses, ordered by course code.
    pub async fn find_by_student_with_courses(
        &self,
        student_id: &str,
    ) -> Result<Vec<(score::Model, Option<course::Model>)>> {
        let db = self.get_connection();
        let rows = score::Entity::find()
            .filter(score::Column::StudentId.eq(student_id))
            .find_also_related(course::Entity)
            .order_by_asc(score::Column::CourseCode)
            .all(db)
            .await?;
        Ok(rows)
    }

    pub async fn graded_student_ids(&self, course_code: &str) -> Result<Vec<String>> {
        let db = self.get_connection();
        let ids: Vec<String> = score::Entity::find()
            .select_only()
            .column(score::Column::StudentId)
            .filter(score::Column::CourseCode.eq(course_code))
            .into_tuple()
            .all(db)
            .await?;
        Ok(ids)
    }

    pub async fn find_for_students_and_course(
        &self,
        student_ids: Vec<String>,
        course_code: &str,
    ) -> Result<Vec<score::Model>> {
        let db = self.get_connection();
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let scores = score::Entity::find()
            .filter(score::Column::StudentId.is_in(student_ids))
            .filter(score::Column::CourseCode.eq(course_code))
            .all(db)
            .await?;
        Ok(scores)
    }

    pub async fn find_for_students(&self, student_ids: Vec<String>) -> Result<Vec<score::Model>> {
        let db = self.get_connection();
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let scores = score::Entity::find()
            .filter(score::Column::StudentId.is_in(student_ids))
            .all(db)
            .await?;
        Ok(scores)
    }

    /// Insert-or-update on the composite key, the whole batch in one
    /// transaction. Any storage error rolls the batch back.
    pub async fn save_batch(
        &self,
        course_code: &str,
        entries: Vec<(String, f64)>,
    ) -> Result<(usize, usize)> {
        let db = self.get_connection();
        let txn = db.begin().await?;

        let mut created = 0;
        let mut updated = 0;
        for (student_id, value) in entries {
            let existing = score::Entity::find_by_id((student_id.clone(), course_code.to_string()))
                .one(&txn)
                .await?;

            match existing {
                Some(model) => {
                    let mut active: score::ActiveModel = model.into();
                    active.score = Set(value);
                    active.update(&txn).await?;
                    updated += 1;
                }
                None => {
                    let model = score::ActiveModel {
                        student_id: Set(student_id),
                        course_code: Set(course_code.to_string()),
                        score: Set(value),
                    };
                    model.insert(&txn).await?;
                    created += 1;
                }
            }
        }

        txn.commit().await?;
        Ok((created, updated))
    }
}
