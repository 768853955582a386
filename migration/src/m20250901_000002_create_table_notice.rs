use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // class_section is free text on purpose: a notice can target a section
        // that has no enrolled students yet
        manager
            .create_table(
                Table::create()
                    .table(Notices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notices::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notices::Title).string().not_null())
                    .col(ColumnDef::new(Notices::Body).text().not_null())
                    .col(
                        ColumnDef::new(Notices::SentAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .col(ColumnDef::new(Notices::SenderId).string().not_null())
                    .col(ColumnDef::new(Notices::ClassSection).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notices_sender")
                            .from_tbl(Notices::Table)
                            .from_col(Notices::SenderId)
                            .to_tbl(Accounts::Table)
                            .to_col(Accounts::Username)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notices_class_section")
                    .table(Notices::Table)
                    .col(Notices::ClassSection)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_notices_class_section")
                    .table(Notices::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Notices::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Notices {
    Table,
    Id,
    Title,
    Body,
    SentAt,
    SenderId,
    ClassSection,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Username,
}
