//! Migration: Create time_entries table.

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
                    .table(TimeEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimeEntries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TimeEntries::UserId).integer().not_null())
                    .col(ColumnDef::new(TimeEntries::ProjectId).integer().not_null())
                    .col(
                        ColumnDef::new(TimeEntries::ClockIn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimeEntries::ClockOut)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(TimeEntries::DurationMinutes).integer().null())
                    .col(ColumnDef::new(TimeEntries::Date).date().not_null())
                    .col(
                        ColumnDef::new(TimeEntries::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(TimeEntries::SyncedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TimeEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_entries_user_id")
                            .from(TimeEntries::Table, TimeEntries::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_entries_project_id")
                            .from(TimeEntries::Table, TimeEntries::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_time_entries_user_date")
                    .table(TimeEntries::Table)
                    .col(TimeEntries::UserId)
                    .col(TimeEntries::Date)
                    .to_owned(),
            )
            .await?;

        // At most one open session per (user, project)
        manager
            .get_connection()
            .execute_unprepared(
                r#"CREATE UNIQUE INDEX IF NOT EXISTS "idx_time_entries_one_active" ON "time_entries" ("user_id", "project_id") WHERE "status" = 'active'"#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimeEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TimeEntries {
    Table,
    Id,
    UserId,
    ProjectId,
    ClockIn,
    ClockOut,
    DurationMinutes,
    Date,
    Status,
    SyncedAt,
    CreatedAt,
}
