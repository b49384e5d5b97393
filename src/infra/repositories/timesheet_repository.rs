//! Timesheet repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};

use super::entities::{
    project,
    timesheet::{self, Entity as TimesheetEntity},
    user,
};
use crate::domain::{Timesheet, TimesheetDetails, TimesheetFilter, TimesheetStatus, WeekHours};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Timesheet repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TimesheetRepository: Send + Sync {
    /// Rows of one user for one week, across projects.
    async fn list_for_user_week(
        &self,
        user_id: i32,
        week_start: NaiveDate,
    ) -> AppResult<Vec<TimesheetDetails>>;

    /// Admin listing. Every filter that is set must match exactly.
    async fn list(&self, filter: TimesheetFilter) -> AppResult<Vec<TimesheetDetails>>;
}

/// Concrete implementation of TimesheetRepository
pub struct TimesheetStore {
    db: DatabaseConnection,
}

impl TimesheetStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn list_with_project(
        &self,
        query: Select<TimesheetEntity>,
        with_user_names: bool,
    ) -> AppResult<Vec<TimesheetDetails>> {
        let rows = query
            .order_by_desc(timesheet::Column::WeekStart)
            .order_by_asc(timesheet::Column::Id)
            .find_also_related(project::Entity)
            .all(&self.db)
            .await?;

        let names = if with_user_names {
            let ids: Vec<i32> = rows.iter().map(|(t, _)| t.user_id).collect();
            user_names(&self.db, ids).await?
        } else {
            HashMap::new()
        };

        Ok(rows
            .into_iter()
            .map(|(sheet, project)| {
                let (client_name, project_name, work_type, location) = project
                    .map(|p| (p.client_name, p.project_name, p.work_type, p.location))
                    .unwrap_or_default();
                TimesheetDetails {
                    user_name: names.get(&sheet.user_id).cloned(),
                    timesheet: Timesheet::from(sheet),
                    client_name,
                    project_name,
                    work_type,
                    location,
                }
            })
            .collect())
    }
}

#[async_trait]
impl TimesheetRepository for TimesheetStore {
    async fn list_for_user_week(
        &self,
        user_id: i32,
        week_start: NaiveDate,
    ) -> AppResult<Vec<TimesheetDetails>> {
        let query = TimesheetEntity::find()
            .filter(timesheet::Column::UserId.eq(user_id))
            .filter(timesheet::Column::WeekStart.eq(week_start));
        self.list_with_project(query, false).await
    }

    async fn list(&self, filter: TimesheetFilter) -> AppResult<Vec<TimesheetDetails>> {
        let mut query = TimesheetEntity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(timesheet::Column::UserId.eq(user_id));
        }
        if let Some(week_start) = filter.week_start {
            query = query.filter(timesheet::Column::WeekStart.eq(week_start));
        }
        if let Some(project_id) = filter.project_id {
            query = query.filter(timesheet::Column::ProjectId.eq(project_id));
        }
        self.list_with_project(query, true).await
    }
}

/// Display names keyed by user id.
pub(crate) async fn user_names<C: ConnectionTrait>(
    db: &C,
    mut ids: Vec<i32>,
) -> AppResult<HashMap<i32, String>> {
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;
    Ok(users.into_iter().map(|u| (u.id, u.name)).collect())
}

pub(crate) async fn find_week<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    project_id: i32,
    week_start: NaiveDate,
) -> AppResult<Option<Timesheet>> {
    let model = TimesheetEntity::find()
        .filter(timesheet::Column::UserId.eq(user_id))
        .filter(timesheet::Column::ProjectId.eq(project_id))
        .filter(timesheet::Column::WeekStart.eq(week_start))
        .one(db)
        .await?;
    Ok(model.map(Timesheet::from))
}

/// Insert a new active row. `total_hours` is derived from `hours`.
pub(crate) async fn insert<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    project_id: i32,
    week_start: NaiveDate,
    hours: WeekHours,
) -> AppResult<Timesheet> {
    let model = timesheet::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        project_id: Set(project_id),
        week_start: Set(week_start),
        sunday: Set(hours.sunday),
        monday: Set(hours.monday),
        tuesday: Set(hours.tuesday),
        wednesday: Set(hours.wednesday),
        thursday: Set(hours.thursday),
        friday: Set(hours.friday),
        saturday: Set(hours.saturday),
        total_hours: Set(hours.total()),
        status: Set(TimesheetStatus::Active.as_str().to_string()),
        submitted_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    Ok(Timesheet::from(model))
}

/// Overwrite the day fields of a row and recompute its total. Callers go
/// through the additive merge on `TxTimesheetRepository`.
pub(crate) async fn update_hours<C: ConnectionTrait>(
    db: &C,
    id: i32,
    hours: WeekHours,
) -> AppResult<Timesheet> {
    let existing = TimesheetEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found("Timesheet"))?;

    let mut active: timesheet::ActiveModel = existing.into();
    active.sunday = Set(hours.sunday);
    active.monday = Set(hours.monday);
    active.tuesday = Set(hours.tuesday);
    active.wednesday = Set(hours.wednesday);
    active.thursday = Set(hours.thursday);
    active.friday = Set(hours.friday);
    active.saturday = Set(hours.saturday);
    active.total_hours = Set(hours.total());
    active.submitted_at = Set(Utc::now());

    let model = active.update(db).await?;
    Ok(Timesheet::from(model))
}

/// Sum of `total_hours` over the active rows of a (user, project) pair.
/// No rows sum to `0.0`.
pub(crate) async fn sum_active_hours<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    project_id: i32,
) -> AppResult<f64> {
    let rows = TimesheetEntity::find()
        .filter(timesheet::Column::UserId.eq(user_id))
        .filter(timesheet::Column::ProjectId.eq(project_id))
        .filter(timesheet::Column::Status.eq(TimesheetStatus::Active.as_str()))
        .order_by_asc(timesheet::Column::Id)
        .all(db)
        .await?;
    Ok(rows.iter().fold(0.0, |acc, row| acc + row.total_hours))
}

/// Mark every row of a (user, project) pair completed.
pub(crate) async fn archive<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    project_id: i32,
) -> AppResult<u64> {
    let result = TimesheetEntity::update_many()
        .col_expr(
            timesheet::Column::Status,
            Expr::value(TimesheetStatus::Completed.as_str()),
        )
        .filter(timesheet::Column::UserId.eq(user_id))
        .filter(timesheet::Column::ProjectId.eq(project_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub(crate) async fn delete_for_project<C: ConnectionTrait>(db: &C, project_id: i32) -> AppResult<u64> {
    let result = TimesheetEntity::delete_many()
        .filter(timesheet::Column::ProjectId.eq(project_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
