use anyhow::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::notice;
use crate::static_service::DATABASE_CONNECTION;

pub struct NoticeRepository;

impl NoticeRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn create(
        &self,
        title: String,
        body: String,
        sender_id: String,
        class_section: String,
    ) -> Result<notice::Model> {
        let db = self.get_connection();
        let now = chrono::Utc::now().naive_utc();

        let model = notice::ActiveModel {
            title: Set(title),
            body: Set(body),
            sent_at: Set(now),
            sender_id: Set(sender_id),
            class_section: Set(class_section),
            ..Default::default()
        };
        let created = model.insert(db).await?;
        Ok(created)
    }

    /// Newest notices for one section, capped at `limit`.
    pub async fn find_latest_for_section(
        &self,
        class_section: &str,
        limit: u64,
    ) -> Result<Vec<notice::Model>> {
        let db = self.get_connection();
        let notices = notice::Entity::find()
            .filter(notice::Column::ClassSection.eq(class_section))
            .order_by_desc(notice::Column::SentAt)
            .limit(limit)
            .all(db)
            .await?;
        Ok(notices)
    }

    pub async fn find_all(&self, class_section: Option<String>) -> Result<Vec<notice::Model>> {
        let db = self.get_connection();
        let mut query = notice::Entity::find();

        if let Some(class_section) = class_section {
            query = query.filter(notice::Column::ClassSection.eq(class_section));
        }

        let notices = query
            .order_by_desc(notice::Column::SentAt)
            .all(db)
            .await?;
        Ok(notices)
    }
}
