//! Migration: Create user_projects (assignment) table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_projects_table::Projects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProjects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserProjects::UserId).integer().not_null())
                    .col(ColumnDef::new(UserProjects::ProjectId).integer().not_null())
                    .col(
                        ColumnDef::new(UserProjects::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(UserProjects::AssignedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_projects_user_id")
                            .from(UserProjects::Table, UserProjects::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_projects_project_id")
                            .from(UserProjects::Table, UserProjects::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_projects_user_project")
                    .table(UserProjects::Table)
                    .col(UserProjects::UserId)
                    .col(UserProjects::ProjectId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProjects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserProjects {
    Table,
    Id,
    UserId,
    ProjectId,
    Status,
    AssignedAt,
}
