use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DeleteResult, EntityTrait, PaginatorTrait, QueryOrder,
    Set,
};

use crate::entities::course;
use crate::static_service::DATABASE_CONNECTION;

#[derive(Default)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub credits: Option<i32>,
}

pub struct CourseRepository;

impl CourseRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn find_by_id(&self, course_code: &str) -> Result<Option<course::Model>> {
        let db = self.get_connection();
        let found = course::Entity::find_by_id(course_code).one(db).await?;
        Ok(found)
    }

    pub async fn find_all(&self) -> Result<Vec<course::Model>> {
        let db = self.get_connection();
        let courses = course::Entity::find()
            .order_by_asc(course::Column::Title)
            .all(db)
            .await?;
        Ok(courses)
    }

    pub async fn find_all_by_code(&self) -> Result<Vec<course::Model>> {
        let db = self.get_connection();
        let courses = course::Entity::find()
            .order_by_asc(course::Column::CourseCode)
            .all(db)
            .await?;
        Ok(courses)
    }

    pub async fn create(
        &self,
        course_code: String,
        title: String,
        credits: i32,
    ) -> Result<course::Model> {
        let db = self.get_connection();
        let course_model = course::ActiveModel {
            course_code: Set(course_code),
            title: Set(title),
            credits: Set(credits),
        };
        let created = course_model.insert(db).await?;
        Ok(created)
    }

    pub async fn update(&self, course_code: &str, updates: CourseUpdate) -> Result<course::Model> {
        let course = self
            .find_by_id(course_code)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Course not found"))?;
        let db = self.get_connection();

        let mut active: course::ActiveModel = course.into();
        if let Some(title) = updates.title {
            active.title = Set(title);
        }
        if let Some(credits) = updates.credits {
            active.credits = Set(credits);
        }

        let result = active.update(db).await?;
        Ok(result)
    }

    pub async fn delete(&self, course_code: &str) -> Result<DeleteResult> {
        let db = self.get_connection();
        let result = course::Entity::delete_by_id(course_code).exec(db).await?;
        Ok(result)
    }

    pub async fn count(&self) -> Result<u64> {
        let db = self.get_connection();
        let total = course::Entity::find().count(db).await?;
        Ok(total)
    }
}
