use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Account roles are a Postgres enum type
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    CREATE TYPE role_enum AS ENUM ('student', 'instructor');
                EXCEPTION
                    WHEN duplicate_object THEN null;
                END $$;
                "#,
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::Password).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::Role)
                            .custom(Alias::new("role_enum"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp()
                            .not_null()
                            .extra("DEFAULT CURRENT_TIMESTAMP".to_string()),
                    )
                    .to_owned(),
            )
            .await?;

        // A student row shares its primary key with the account it belongs to.
        // Deleting the account removes the student and, transitively, its scores.
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::StudentId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::FullName).string().not_null())
                    .col(ColumnDef::new(Students::BirthDate).date().null())
                    .col(ColumnDef::new(Students::ClassSection).string().null())
                    .col(ColumnDef::new(Students::Department).string().null())
                    .col(ColumnDef::new(Students::Email).string().null())
                    .col(ColumnDef::new(Students::Location).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_students_account")
                            .from_tbl(Students::Table)
                            .from_col(Students::StudentId)
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
                    .name("unique_students_email")
                    .table(Students::Table)
                    .col(Students::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_students_class_section")
                    .table(Students::Table)
                    .col(Students::ClassSection)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::CourseCode)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Credits).integer().not_null())
                    .to_owned(),
            )
            .await?;

        // One score per (student, course); both parents cascade deletes
        manager
            .create_table(
                Table::create()
                    .table(Scores::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Scores::StudentId).string().not_null())
                    .col(ColumnDef::new(Scores::CourseCode).string().not_null())
                    .col(ColumnDef::new(Scores::Score).double().not_null())
                    .primary_key(
                        Index::create()
                            .col(Scores::StudentId)
                            .col(Scores::CourseCode),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_student")
                            .from_tbl(Scores::Table)
                            .from_col(Scores::StudentId)
                            .to_tbl(Students::Table)
                            .to_col(Students::StudentId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scores_course")
                            .from_tbl(Scores::Table)
                            .from_col(Scores::CourseCode)
                            .to_tbl(Courses::Table)
                            .to_col(Courses::CourseCode)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_scores_course_code")
                    .table(Scores::Table)
                    .col(Scores::CourseCode)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_scores_course_code")
                    .table(Scores::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Scores::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_students_class_section")
                    .table(Students::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("unique_students_email")
                    .table(Students::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS role_enum;")
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Username,
    Password,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Students {
    Table,
    StudentId,
    FullName,
    BirthDate,
    ClassSection,
    Department,
    Email,
    Location,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    CourseCode,
    Title,
    Credits,
}

#[derive(DeriveIden)]
enum Scores {
    Table,
    StudentId,
    CourseCode,
    Score,
}
