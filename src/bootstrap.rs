use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use crate::config::APP_CONFIG;
use crate::entities::{account, sea_orm_active_enums::RoleEnum};

/// Seeds the instructor account on startup so a fresh database is usable
/// without manual SQL.
pub async fn initialize_instructor_account(db: &DatabaseConnection) -> Result<()> {
    let username: &str = &APP_CONFIG.bootstrap_instructor_username;
    let default_password: &str = &APP_CONFIG.bootstrap_instructor_password;

    let existing = account::Entity::find_by_id(username)
        .one(db)
        .await
        .context("Failed to check existing instructor account")?;

    if existing.is_some() {
        tracing::info!("Instructor account already exists, skipping initialization");
        return Ok(());
    }

    tracing::info!("Creating default instructor account...");

    let hashed_password = bcrypt::hash(default_password, bcrypt::DEFAULT_COST)
        .context("Failed to hash instructor password")?;

    let instructor = account::ActiveModel {
        username: Set(username.to_string()),
        password: Set(hashed_password),
        role: Set(RoleEnum::Instructor),
        ..Default::default()
    };

    instructor
        .insert(db)
        .await
        .context("Failed to insert instructor account")?;

    tracing::info!("✅ Instructor account created successfully!");
    tracing::info!("  Username: {}", username);
    tracing::warn!("⚠️  Please change the default password after first login!");

    Ok(())
}
