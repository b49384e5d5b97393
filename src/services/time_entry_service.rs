//! Time-entry engine - clock-in/clock-out session lifecycle.
//!
//! A user holds at most one open session per project. Clock-in checks and
//! inserts inside a serializable transaction, and the partial unique index
//! on `time_entries` backs that up: a racing insert that slips through is
//! reported as the same conflict.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::domain::{duration_minutes, EntryStatus, TimeEntry, TimeEntryDetails};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

const ALREADY_CLOCKED_IN: &str = "Already clocked in to this project";
const ENTRY_NOT_ACTIVE: &str = "Time entry is not active";

/// Time-entry engine trait for dependency injection.
#[async_trait]
pub trait TimeEntryService: Send + Sync {
    /// Open a session now. Requires an active assignment and no open
    /// session for the same project.
    async fn clock_in(&self, user_id: i32, project_id: i32) -> AppResult<TimeEntry>;

    /// Close the caller's own open session and record its whole-minute duration.
    async fn clock_out(&self, entry_id: i32, user_id: i32) -> AppResult<TimeEntry>;

    async fn active_entries(&self, user_id: i32) -> AppResult<Vec<TimeEntryDetails>>;

    async fn user_time_entries(
        &self,
        user_id: i32,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<TimeEntryDetails>>;
}

/// Concrete implementation of TimeEntryService using Unit of Work.
pub struct TimeTracker<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TimeTracker<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> TimeEntryService for TimeTracker<U> {
    async fn clock_in(&self, user_id: i32, project_id: i32) -> AppResult<TimeEntry> {
        let now = Utc::now();

        let result = self
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

                    if ctx
                        .time_entries()
                        .find_active(user_id, project_id)
                        .await?
                        .is_some()
                    {
                        return Err(AppError::conflict(ALREADY_CLOCKED_IN));
                    }

                    ctx.time_entries().create(user_id, project_id, now).await
                })
            })
            .await;

        match result {
            Ok(entry) => {
                tracing::info!(entry_id = entry.id, user_id, project_id, "Clocked in");
                Ok(entry)
            }
            Err(e) if e.is_unique_violation() => {
                tracing::warn!(user_id, project_id, "Concurrent clock-in rejected by index");
                Err(AppError::conflict(ALREADY_CLOCKED_IN))
            }
            Err(e) => Err(e),
        }
    }

    async fn clock_out(&self, entry_id: i32, user_id: i32) -> AppResult<TimeEntry> {
        let entries = self.uow.time_entries();

        let entry = entries
            .find_by_id(entry_id)
            .await?
            .ok_or_not_found("Time entry")?;

        if entry.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        if !entry.is_active() {
            return Err(AppError::invalid_state(ENTRY_NOT_ACTIVE));
        }

        let clock_out = Utc::now();
        let minutes = duration_minutes(entry.clock_in, clock_out);

        // Conditional on status, so a concurrent clock-out closes it once
        if !entries.complete(entry_id, clock_out, minutes).await? {
            return Err(AppError::invalid_state(ENTRY_NOT_ACTIVE));
        }

        tracing::info!(
            entry_id,
            user_id,
            project_id = entry.project_id,
            duration_minutes = minutes,
            "Clocked out"
        );

        Ok(TimeEntry {
            clock_out: Some(clock_out),
            duration_minutes: Some(minutes),
            status: EntryStatus::Completed,
            ..entry
        })
    }

    async fn active_entries(&self, user_id: i32) -> AppResult<Vec<TimeEntryDetails>> {
        self.uow.time_entries().list_active_for_user(user_id).await
    }

    async fn user_time_entries(
        &self,
        user_id: i32,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<TimeEntryDetails>> {
        self.uow.time_entries().list_for_user(user_id, date).await
    }
}
