//! Application services layer - Use cases and business logic.
//!
//! The time-entry and timesheet engines live here next to the
//! authentication and administration services. Each service depends on the
//! `UnitOfWork` abstraction and is exposed as a trait object.

mod auth_service;
pub mod container;
mod project_service;
mod time_entry_service;
mod timesheet_service;
mod user_service;

#[cfg(test)]
mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use project_service::{ProjectManager, ProjectService};
pub use time_entry_service::{TimeEntryService, TimeTracker};
pub use timesheet_service::{TimesheetLedger, TimesheetService};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
