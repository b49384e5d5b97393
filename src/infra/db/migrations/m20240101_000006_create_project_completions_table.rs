//! Migration: Create project_completions audit table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProjectCompletions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectCompletions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProjectCompletions::UserId).integer().not_null())
                    // Kept after the project is deleted: no foreign key
                    .col(ColumnDef::new(ProjectCompletions::ProjectId).integer().not_null())
                    .col(
                        ColumnDef::new(ProjectCompletions::CompletionDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectCompletions::TotalHoursWorked)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_completions_user_id")
                            .from(ProjectCompletions::Table, ProjectCompletions::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProjectCompletions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProjectCompletions {
    Table,
    Id,
    UserId,
    ProjectId,
    CompletionDate,
    TotalHoursWorked,
}
