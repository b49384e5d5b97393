//! Migration: Create projects table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::ClientName).string_len(100).not_null())
                    .col(ColumnDef::new(Projects::ProjectName).string_len(100).not_null())
                    .col(ColumnDef::new(Projects::WorkType).string_len(50).not_null())
                    .col(ColumnDef::new(Projects::Location).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(super) enum Projects {
    Table,
    Id,
    ClientName,
    ProjectName,
    WorkType,
    Location,
    CreatedAt,
}
