//! Mock-backed Unit of Work for service unit tests.
//!
//! Pool operations go to the mocked repositories. Transactions cannot be
//! mocked and fail with an internal error; transactional paths are covered
//! by the SQLite integration tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::infra::{
    AssignmentRepository, CompletionRepository, MockAssignmentRepository,
    MockCompletionRepository, MockProjectRepository, MockTimeEntryRepository,
    MockTimesheetRepository, MockUserRepository, ProjectRepository, TimeEntryRepository,
    TimesheetRepository, TransactionContext, TxFuture, UnitOfWork, UserRepository,
};

#[derive(Default)]
pub(crate) struct MockRepos {
    pub users: MockUserRepository,
    pub projects: MockProjectRepository,
    pub assignments: MockAssignmentRepository,
    pub time_entries: MockTimeEntryRepository,
    pub timesheets: MockTimesheetRepository,
    pub completions: MockCompletionRepository,
}

impl MockRepos {
    pub fn into_uow(self) -> Arc<TestUnitOfWork> {
        Arc::new(TestUnitOfWork {
            users: Arc::new(self.users),
            projects: Arc::new(self.projects),
            assignments: Arc::new(self.assignments),
            time_entries: Arc::new(self.time_entries),
            timesheets: Arc::new(self.timesheets),
            completions: Arc::new(self.completions),
        })
    }
}

pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    projects: Arc<MockProjectRepository>,
    assignments: Arc<MockAssignmentRepository>,
    time_entries: Arc<MockTimeEntryRepository>,
    timesheets: Arc<MockTimesheetRepository>,
    completions: Arc<MockCompletionRepository>,
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn projects(&self) -> Arc<dyn ProjectRepository> {
        self.projects.clone()
    }

    fn assignments(&self) -> Arc<dyn AssignmentRepository> {
        self.assignments.clone()
    }

    fn time_entries(&self) -> Arc<dyn TimeEntryRepository> {
        self.time_entries.clone()
    }

    fn timesheets(&self) -> Arc<dyn TimesheetRepository> {
        self.timesheets.clone()
    }

    fn completions(&self) -> Arc<dyn CompletionRepository> {
        self.completions.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("transactions are not available in mock tests"))
    }

    async fn transaction_serializable<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        Err(AppError::internal("transactions are not available in mock tests"))
    }
}
