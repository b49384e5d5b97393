//! Service Container - Centralized service access.
//!
//! Every service shares one `Persistence` Unit of Work over the same
//! connection pool.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, ProjectManager, ProjectService, TimeEntryService, TimeTracker,
    TimesheetLedger, TimesheetService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn projects(&self) -> Arc<dyn ProjectService>;

    /// Clock-in/clock-out engine.
    fn time_entries(&self) -> Arc<dyn TimeEntryService>;

    /// Weekly timesheet engine.
    fn timesheets(&self) -> Arc<dyn TimesheetService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    project_service: Arc<dyn ProjectService>,
    time_entry_service: Arc<dyn TimeEntryService>,
    timesheet_service: Arc<dyn TimesheetService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        project_service: Arc<dyn ProjectService>,
        time_entry_service: Arc<dyn TimeEntryService>,
        timesheet_service: Arc<dyn TimesheetService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            project_service,
            time_entry_service,
            timesheet_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self::new(
            Arc::new(Authenticator::new(uow.clone(), config)),
            Arc::new(UserManager::new(uow.clone())),
            Arc::new(ProjectManager::new(uow.clone())),
            Arc::new(TimeTracker::new(uow.clone())),
            Arc::new(TimesheetLedger::new(uow)),
        )
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn projects(&self) -> Arc<dyn ProjectService> {
        self.project_service.clone()
    }

    fn time_entries(&self) -> Arc<dyn TimeEntryService> {
        self.time_entry_service.clone()
    }

    fn timesheets(&self) -> Arc<dyn TimesheetService> {
        self.timesheet_service.clone()
    }
}
