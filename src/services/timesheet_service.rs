//! Timesheet engine - weekly hours, project completion and sync.
//!
//! Every write to a weekly row is an additive merge: manual saves and
//! synced time entries both add to what is already stored.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::domain::{
    aggregate_entries, week_start, AssignmentStatus, CompletionDetails, SyncReport, Timesheet,
    TimesheetDetails, TimesheetFilter, WeekHours,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

const PROJECT_NOT_ACTIVE: &str = "Project is not active for this user";

/// Timesheet engine trait for dependency injection.
#[async_trait]
pub trait TimesheetService: Send + Sync {
    /// Add `hours` to the user's row for the week containing `week_start`.
    async fn save_timesheet(
        &self,
        user_id: i32,
        project_id: i32,
        week_start: NaiveDate,
        hours: WeekHours,
    ) -> AppResult<Timesheet>;

    async fn user_timesheets(
        &self,
        user_id: i32,
        week_start: NaiveDate,
    ) -> AppResult<Vec<TimesheetDetails>>;

    /// Admin listing across users.
    async fn all_timesheets(&self, filter: TimesheetFilter) -> AppResult<Vec<TimesheetDetails>>;

    /// Close out a project for a user and return the hours recorded on
    /// its active timesheets.
    async fn complete_project(&self, user_id: i32, project_id: i32) -> AppResult<f64>;

    /// Withdraw an active project from the user's timesheet.
    async fn remove_project(&self, user_id: i32, project_id: i32) -> AppResult<()>;

    /// Fold completed, not yet synced time entries into weekly rows.
    async fn sync_time_entries(&self) -> AppResult<SyncReport>;

    async fn project_completions(&self) -> AppResult<Vec<CompletionDetails>>;
}

/// Concrete implementation of TimesheetService using Unit of Work.
pub struct TimesheetLedger<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TimesheetLedger<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> TimesheetService for TimesheetLedger<U> {
    async fn save_timesheet(
        &self,
        user_id: i32,
        project_id: i32,
        week: NaiveDate,
        hours: WeekHours,
    ) -> AppResult<Timesheet> {
        let week = week_start(week);

        let timesheet = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    ctx.projects()
                        .find_by_id(project_id)
                        .await?
                        .ok_or_not_found("Project")?;

                    let assigned = ctx
                        .assignments()
                        .find(user_id, project_id)
                        .await?
                        .is_some_and(|a| a.status.is_active());
                    if !assigned {
                        return Err(AppError::Forbidden);
                    }

                    ctx.timesheets().merge(user_id, project_id, week, hours).await
                })
            })
            .await?;

        tracing::info!(
            timesheet_id = timesheet.id,
            user_id,
            project_id,
            week_start = %week,
            total_hours = timesheet.total_hours,
            "Timesheet saved"
        );
        Ok(timesheet)
    }

    async fn user_timesheets(
        &self,
        user_id: i32,
        week: NaiveDate,
    ) -> AppResult<Vec<TimesheetDetails>> {
        self.uow
            .timesheets()
            .list_for_user_week(user_id, week_start(week))
            .await
    }

    async fn all_timesheets(&self, mut filter: TimesheetFilter) -> AppResult<Vec<TimesheetDetails>> {
        filter.week_start = filter.week_start.map(week_start);
        self.uow.timesheets().list(filter).await
    }

    async fn complete_project(&self, user_id: i32, project_id: i32) -> AppResult<f64> {
        let total = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    ctx.assignments()
                        .find(user_id, project_id)
                        .await?
                        .ok_or_not_found("Assignment")?;

                    let total = ctx.timesheets().sum_active_hours(user_id, project_id).await?;
                    ctx.completions().create(user_id, project_id, total).await?;
                    ctx.assignments()
                        .set_status(user_id, project_id, AssignmentStatus::Completed)
                        .await?;
                    ctx.timesheets().archive(user_id, project_id).await?;

                    Ok(total)
                })
            })
            .await?;

        tracing::info!(user_id, project_id, total_hours = total, "Project completed");
        Ok(total)
    }

    async fn remove_project(&self, user_id: i32, project_id: i32) -> AppResult<()> {
        let assignments = self.uow.assignments();

        let assignment = assignments
            .find(user_id, project_id)
            .await?
            .ok_or_not_found("Assignment")?;
        if !assignment.status.is_active() {
            return Err(AppError::invalid_state(PROJECT_NOT_ACTIVE));
        }

        let moved = assignments
            .transition(
                user_id,
                project_id,
                AssignmentStatus::Active,
                AssignmentStatus::Removed,
            )
            .await?;
        if !moved {
            return Err(AppError::invalid_state(PROJECT_NOT_ACTIVE));
        }

        tracing::info!(user_id, project_id, "Project removed from timesheet");
        Ok(())
    }

    async fn sync_time_entries(&self) -> AppResult<SyncReport> {
        let synced_at = Utc::now();

        let report = self
            .uow
            .transaction_serializable(move |ctx| {
                Box::pin(async move {
                    let entries = ctx.time_entries().list_unsynced().await?;
                    let weeks = aggregate_entries(&entries);

                    for (key, hours) in &weeks {
                        ctx.timesheets()
                            .merge(key.user_id, key.project_id, key.week_start, *hours)
                            .await?;
                    }

                    let ids: Vec<i32> = entries.iter().map(|e| e.id).collect();
                    ctx.time_entries().mark_synced(&ids, synced_at).await?;

                    Ok(SyncReport {
                        entries_synced: ids.len(),
                        timesheets_updated: weeks.len(),
                    })
                })
            })
            .await?;

        tracing::info!(
            entries_synced = report.entries_synced,
            timesheets_updated = report.timesheets_updated,
            "Time entries synced"
        );
        Ok(report)
    }

    async fn project_completions(&self) -> AppResult<Vec<CompletionDetails>> {
        self.uow.completions().list().await
    }
}
