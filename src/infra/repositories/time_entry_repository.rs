//! Time entry repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};

use super::entities::{
    project,
    time_entry::{self, Entity as TimeEntryEntity},
};
use crate::config::SYNC_MARK_BATCH_SIZE;
use crate::domain::{entry_date, EntryStatus, TimeEntry, TimeEntryDetails};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Time entry repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TimeEntryRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<TimeEntry>>;

    /// Open a session starting at `clock_in`.
    async fn create(
        &self,
        user_id: i32,
        project_id: i32,
        clock_in: DateTime<Utc>,
    ) -> AppResult<TimeEntry>;

    /// Close an active entry. Returns `false` if the entry is not active.
    async fn complete(
        &self,
        id: i32,
        clock_out: DateTime<Utc>,
        duration_minutes: i32,
    ) -> AppResult<bool>;

    /// Open sessions of a user across projects, newest first.
    async fn list_active_for_user(&self, user_id: i32) -> AppResult<Vec<TimeEntryDetails>>;

    /// All sessions of a user, optionally for one calendar date, newest first.
    async fn list_for_user(
        &self,
        user_id: i32,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<TimeEntryDetails>>;
}

/// Concrete implementation of TimeEntryRepository
pub struct TimeEntryStore {
    db: DatabaseConnection,
}

impl TimeEntryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn list_with_project(
        &self,
        query: Select<TimeEntryEntity>,
    ) -> AppResult<Vec<TimeEntryDetails>> {
        let rows = query
            .order_by_desc(time_entry::Column::CreatedAt)
            .order_by_desc(time_entry::Column::Id)
            .find_also_related(project::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(entry, project)| {
                let (project_name, client_name) = project
                    .map(|p| (p.project_name, p.client_name))
                    .unwrap_or_default();
                TimeEntryDetails {
                    entry: TimeEntry::from(entry),
                    project_name,
                    client_name,
                }
            })
            .collect())
    }
}

#[async_trait]
impl TimeEntryRepository for TimeEntryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<TimeEntry>> {
        Ok(TimeEntryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(TimeEntry::from))
    }

    async fn create(
        &self,
        user_id: i32,
        project_id: i32,
        clock_in: DateTime<Utc>,
    ) -> AppResult<TimeEntry> {
        create(&self.db, user_id, project_id, clock_in).await
    }

    async fn complete(
        &self,
        id: i32,
        clock_out: DateTime<Utc>,
        duration_minutes: i32,
    ) -> AppResult<bool> {
        let result = TimeEntryEntity::update_many()
            .col_expr(time_entry::Column::ClockOut, Expr::value(clock_out))
            .col_expr(time_entry::Column::DurationMinutes, Expr::value(duration_minutes))
            .col_expr(
                time_entry::Column::Status,
                Expr::value(EntryStatus::Completed.as_str()),
            )
            .filter(time_entry::Column::Id.eq(id))
            .filter(time_entry::Column::Status.eq(EntryStatus::Active.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_active_for_user(&self, user_id: i32) -> AppResult<Vec<TimeEntryDetails>> {
        let query = TimeEntryEntity::find()
            .filter(time_entry::Column::UserId.eq(user_id))
            .filter(time_entry::Column::Status.eq(EntryStatus::Active.as_str()));
        self.list_with_project(query).await
    }

    async fn list_for_user(
        &self,
        user_id: i32,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<TimeEntryDetails>> {
        let mut query = TimeEntryEntity::find().filter(time_entry::Column::UserId.eq(user_id));
        if let Some(date) = date {
            query = query.filter(time_entry::Column::Date.eq(date));
        }
        self.list_with_project(query).await
    }
}

pub(crate) async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    project_id: i32,
    clock_in: DateTime<Utc>,
) -> AppResult<TimeEntry> {
    let model = time_entry::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        project_id: Set(project_id),
        clock_in: Set(clock_in),
        clock_out: Set(None),
        duration_minutes: Set(None),
        date: Set(entry_date(clock_in)),
        status: Set(EntryStatus::Active.as_str().to_string()),
        synced_at: Set(None),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    Ok(TimeEntry::from(model))
}

pub(crate) async fn find_active<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    project_id: i32,
) -> AppResult<Option<TimeEntry>> {
    let model = TimeEntryEntity::find()
        .filter(time_entry::Column::UserId.eq(user_id))
        .filter(time_entry::Column::ProjectId.eq(project_id))
        .filter(time_entry::Column::Status.eq(EntryStatus::Active.as_str()))
        .one(db)
        .await?;
    Ok(model.map(TimeEntry::from))
}

/// Completed entries with a positive duration that no sync has folded yet.
pub(crate) async fn list_unsynced<C: ConnectionTrait>(db: &C) -> AppResult<Vec<TimeEntry>> {
    let models = TimeEntryEntity::find()
        .filter(time_entry::Column::Status.eq(EntryStatus::Completed.as_str()))
        .filter(time_entry::Column::DurationMinutes.gt(0))
        .filter(time_entry::Column::SyncedAt.is_null())
        .order_by_asc(time_entry::Column::Id)
        .all(db)
        .await?;
    Ok(models.into_iter().map(TimeEntry::from).collect())
}

/// Stamp `synced_at` on the given entries, `SYNC_MARK_BATCH_SIZE` ids per
/// statement to stay under the driver's bind-parameter limit.
pub(crate) async fn mark_synced<C: ConnectionTrait>(
    db: &C,
    ids: &[i32],
    synced_at: DateTime<Utc>,
) -> AppResult<u64> {
    let mut stamped = 0;
    for batch in ids.chunks(SYNC_MARK_BATCH_SIZE) {
        let result = TimeEntryEntity::update_many()
            .col_expr(time_entry::Column::SyncedAt, Expr::value(synced_at))
            .filter(time_entry::Column::Id.is_in(batch.iter().copied()))
            .filter(time_entry::Column::SyncedAt.is_null())
            .exec(db)
            .await?;
        stamped += result.rows_affected;
    }
    Ok(stamped)
}

pub(crate) async fn delete_for_project<C: ConnectionTrait>(db: &C, project_id: i32) -> AppResult<u64> {
    let result = TimeEntryEntity::delete_many()
        .filter(time_entry::Column::ProjectId.eq(project_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
