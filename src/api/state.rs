//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, ProjectService, ServiceContainer, Services, TimeEntryService, TimesheetService,
    UserService,
};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub project_service: Arc<dyn ProjectService>,
    pub time_entry_service: Arc<dyn TimeEntryService>,
    pub timesheet_service: Arc<dyn TimesheetService>,
    /// Database handle, used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Build the production service graph over the database pool.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::new(&container, database)
    }

    /// Create application state from any service container (mocks included).
    pub fn new(container: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            project_service: container.projects(),
            time_entry_service: container.time_entries(),
            timesheet_service: container.timesheets(),
            database,
        }
    }
}
