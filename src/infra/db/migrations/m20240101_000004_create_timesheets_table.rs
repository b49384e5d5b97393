//! Migration: Create timesheets table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_projects_table::Projects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let day = |col: Timesheets| {
            ColumnDef::new(col)
                .double()
                .not_null()
                .default(0.0)
                .to_owned()
        };

        manager
            .create_table(
                Table::create()
                    .table(Timesheets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Timesheets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Timesheets::UserId).integer().not_null())
                    .col(ColumnDef::new(Timesheets::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Timesheets::WeekStart).date().not_null())
                    .col(day(Timesheets::Sunday))
                    .col(day(Timesheets::Monday))
                    .col(day(Timesheets::Tuesday))
                    .col(day(Timesheets::Wednesday))
                    .col(day(Timesheets::Thursday))
                    .col(day(Timesheets::Friday))
                    .col(day(Timesheets::Saturday))
                    .col(day(Timesheets::TotalHours))
                    .col(
                        ColumnDef::new(Timesheets::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Timesheets::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timesheets_user_id")
                            .from(Timesheets::Table, Timesheets::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_timesheets_project_id")
                            .from(Timesheets::Table, Timesheets::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_timesheets_user_project_week")
                    .table(Timesheets::Table)
                    .col(Timesheets::UserId)
                    .col(Timesheets::ProjectId)
                    .col(Timesheets::WeekStart)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Timesheets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Timesheets {
    Table,
    Id,
    UserId,
    ProjectId,
    WeekStart,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    TotalHours,
    Status,
    SubmittedAt,
}
