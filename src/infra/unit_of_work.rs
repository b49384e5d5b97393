//! Unit of Work pattern implementation.
//!
//! Centralizes access to the repositories and runs multi-step engine
//! operations inside one database transaction, committed on success and
//! rolled back on error.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};

use super::repositories::{
    assignment_repository, completion_repository, project_repository, time_entry_repository,
    timesheet_repository, AssignmentRepository, AssignmentStore, CompletionRepository,
    CompletionStore, ProjectRepository, ProjectStore, TimeEntryRepository, TimeEntryStore,
    TimesheetRepository, TimesheetStore, UserRepository, UserStore,
};
use crate::domain::{
    Assignment, AssignmentStatus, Project, ProjectCompletion, TimeEntry, Timesheet, WeekHours,
};
use crate::errors::AppResult;

/// Boxed future returned by a transaction closure.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic transaction methods. Tests
/// mock the repositories and provide their own implementation.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn projects(&self) -> Arc<dyn ProjectRepository>;

    fn assignments(&self) -> Arc<dyn AssignmentRepository>;

    fn time_entries(&self) -> Arc<dyn TimeEntryRepository>;

    fn timesheets(&self) -> Arc<dyn TimesheetRepository>;

    fn completions(&self) -> Arc<dyn CompletionRepository>;

    /// Execute a closure within a ReadCommitted transaction.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;

    /// Execute a closure within a Serializable transaction.
    ///
    /// Used for check-then-write sequences that must not interleave with a
    /// concurrent writer on the same keys.
    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access scoped to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn projects(&self) -> TxProjectRepository<'_> {
        TxProjectRepository { txn: self.txn }
    }

    pub fn assignments(&self) -> TxAssignmentRepository<'_> {
        TxAssignmentRepository { txn: self.txn }
    }

    pub fn time_entries(&self) -> TxTimeEntryRepository<'_> {
        TxTimeEntryRepository { txn: self.txn }
    }

    pub fn timesheets(&self) -> TxTimesheetRepository<'_> {
        TxTimesheetRepository { txn: self.txn }
    }

    pub fn completions(&self) -> TxCompletionRepository<'_> {
        TxCompletionRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    project_repo: Arc<ProjectStore>,
    assignment_repo: Arc<AssignmentStore>,
    time_entry_repo: Arc<TimeEntryStore>,
    timesheet_repo: Arc<TimesheetStore>,
    completion_repo: Arc<CompletionStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            project_repo: Arc::new(ProjectStore::new(db.clone())),
            assignment_repo: Arc::new(AssignmentStore::new(db.clone())),
            time_entry_repo: Arc::new(TimeEntryStore::new(db.clone())),
            timesheet_repo: Arc::new(TimesheetStore::new(db.clone())),
            completion_repo: Arc::new(CompletionStore::new(db.clone())),
            db,
        }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
            .await?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn projects(&self) -> Arc<dyn ProjectRepository> {
        self.project_repo.clone()
    }

    fn assignments(&self) -> Arc<dyn AssignmentRepository> {
        self.assignment_repo.clone()
    }

    fn time_entries(&self) -> Arc<dyn TimeEntryRepository> {
        self.time_entry_repo.clone()
    }

    fn timesheets(&self) -> Arc<dyn TimesheetRepository> {
        self.timesheet_repo.clone()
    }

    fn completions(&self) -> Arc<dyn CompletionRepository> {
        self.completion_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f)
            .await
    }

    async fn transaction_serializable<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::Serializable, f)
            .await
    }
}

/// Transaction-aware project repository.
pub struct TxProjectRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxProjectRepository<'_> {
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Project>> {
        project_repository::find_by_id(self.txn, id).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        project_repository::delete(self.txn, id).await
    }
}

/// Transaction-aware assignment repository.
pub struct TxAssignmentRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxAssignmentRepository<'_> {
    pub async fn find(&self, user_id: i32, project_id: i32) -> AppResult<Option<Assignment>> {
        assignment_repository::find(self.txn, user_id, project_id).await
    }

    pub async fn set_status(
        &self,
        user_id: i32,
        project_id: i32,
        status: AssignmentStatus,
    ) -> AppResult<u64> {
        assignment_repository::set_status(self.txn, user_id, project_id, status).await
    }

    pub async fn delete_for_project(&self, project_id: i32) -> AppResult<u64> {
        assignment_repository::delete_for_project(self.txn, project_id).await
    }
}

/// Transaction-aware time entry repository.
pub struct TxTimeEntryRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxTimeEntryRepository<'_> {
    pub async fn find_active(&self, user_id: i32, project_id: i32) -> AppResult<Option<TimeEntry>> {
        time_entry_repository::find_active(self.txn, user_id, project_id).await
    }

    pub async fn create(
        &self,
        user_id: i32,
        project_id: i32,
        clock_in: DateTime<Utc>,
    ) -> AppResult<TimeEntry> {
        time_entry_repository::create(self.txn, user_id, project_id, clock_in).await
    }

    pub async fn list_unsynced(&self) -> AppResult<Vec<TimeEntry>> {
        time_entry_repository::list_unsynced(self.txn).await
    }

    pub async fn mark_synced(&self, ids: &[i32], synced_at: DateTime<Utc>) -> AppResult<u64> {
        time_entry_repository::mark_synced(self.txn, ids, synced_at).await
    }

    pub async fn delete_for_project(&self, project_id: i32) -> AppResult<u64> {
        time_entry_repository::delete_for_project(self.txn, project_id).await
    }
}

/// Transaction-aware timesheet repository.
pub struct TxTimesheetRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxTimesheetRepository<'_> {
    pub async fn find_week(
        &self,
        user_id: i32,
        project_id: i32,
        week_start: NaiveDate,
    ) -> AppResult<Option<Timesheet>> {
        timesheet_repository::find_week(self.txn, user_id, project_id, week_start).await
    }

    async fn insert(
        &self,
        user_id: i32,
        project_id: i32,
        week_start: NaiveDate,
        hours: WeekHours,
    ) -> AppResult<Timesheet> {
        timesheet_repository::insert(self.txn, user_id, project_id, week_start, hours).await
    }

    async fn update_hours(&self, id: i32, hours: WeekHours) -> AppResult<Timesheet> {
        timesheet_repository::update_hours(self.txn, id, hours).await
    }

    pub async fn sum_active_hours(&self, user_id: i32, project_id: i32) -> AppResult<f64> {
        timesheet_repository::sum_active_hours(self.txn, user_id, project_id).await
    }

    pub async fn archive(&self, user_id: i32, project_id: i32) -> AppResult<u64> {
        timesheet_repository::archive(self.txn, user_id, project_id).await
    }

    pub async fn delete_for_project(&self, project_id: i32) -> AppResult<u64> {
        timesheet_repository::delete_for_project(self.txn, project_id).await
    }

    /// Additive merge of `hours` into the (user, project, week) row,
    /// inserting the row if it does not exist yet.
    pub async fn merge(
        &self,
        user_id: i32,
        project_id: i32,
        week_start: NaiveDate,
        hours: WeekHours,
    ) -> AppResult<Timesheet> {
        match self.find_week(user_id, project_id, week_start).await? {
            Some(existing) => {
                self.update_hours(existing.id, existing.hours.merged(&hours))
                    .await
            }
            None => self.insert(user_id, project_id, week_start, hours).await,
        }
    }
}

/// Transaction-aware completion repository.
pub struct TxCompletionRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl TxCompletionRepository<'_> {
    pub async fn create(
        &self,
        user_id: i32,
        project_id: i32,
        total_hours_worked: f64,
    ) -> AppResult<ProjectCompletion> {
        completion_repository::create(self.txn, user_id, project_id, total_hours_worked).await
    }
}

