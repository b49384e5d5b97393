//! Infrastructure layer - Persistence concerns
//!
//! - Database connection and migrations
//! - SeaORM entities and repositories
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AssignmentRepository, AssignmentStore, CompletionRepository, CompletionStore,
    ProjectRepository, ProjectStore, TimeEntryRepository, TimeEntryStore, TimesheetRepository,
    TimesheetStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAssignmentRepository, MockCompletionRepository, MockProjectRepository,
    MockTimeEntryRepository, MockTimesheetRepository, MockUserRepository,
};
