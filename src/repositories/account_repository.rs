use anyhow::Result;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::entities::account;
use crate::static_service::DATABASE_CONNECTION;

pub struct AccountRepository;

impl AccountRepository {
    pub fn new() -> Self {
        Self
    }

    pub fn get_connection(&self) -> &'static DatabaseConnection {
        DATABASE_CONNECTION
            .get()
            .expect("DATABASE_CONNECTION not set")
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<account::Model>> {
        let db = self.get_connection();
        let found = account::Entity::find_by_id(username).one(db).await?;
        Ok(found)
    }

    pub async fn update_password(&self, username: &str, hashed_password: String) -> Result<()> {
        let account = self
            .find_by_username(username)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Account not found"))?;
        let db = self.get_connection();

        let mut active: account::ActiveModel = account.into();
        active.password = Set(hashed_password);
        active.update(db).await?;

        Ok(())
    }
}
