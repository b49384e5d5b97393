//! Repository layer - Data access abstraction
//!
//! Each record kind has a mockable repository trait with a pool-backed
//! store. Operations that must also run inside a transaction are generic
//! over `ConnectionTrait` and are reused by the Unit of Work.

pub(crate) mod assignment_repository;
pub(crate) mod completion_repository;
pub(crate) mod entities;
pub(crate) mod project_repository;
pub(crate) mod time_entry_repository;
pub(crate) mod timesheet_repository;
pub(crate) mod user_repository;

pub use assignment_repository::{AssignmentRepository, AssignmentStore};
pub use completion_repository::{CompletionRepository, CompletionStore};
pub use project_repository::{ProjectRepository, ProjectStore};
pub use time_entry_repository::{TimeEntryRepository, TimeEntryStore};
pub use timesheet_repository::{TimesheetRepository, TimesheetStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use assignment_repository::MockAssignmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use completion_repository::MockCompletionRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use project_repository::MockProjectRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use time_entry_repository::MockTimeEntryRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use timesheet_repository::MockTimesheetRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
