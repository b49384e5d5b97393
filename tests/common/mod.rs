//! Shared setup for integration tests: an in-memory SQLite database with
//! the real migrations applied, plus seed helpers.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::{ConnectOptions, Database as SeaDatabase};

use timesheet_api::config::Config;
use timesheet_api::domain::{Project, ProjectFields, TimeEntry, User, UserRole};
use timesheet_api::infra::{Database, Persistence, UnitOfWork};
use timesheet_api::services::{ServiceContainer, Services};

pub const TEST_JWT_SECRET: &str = "integration-test-secret-key-32-chars-long";

pub struct TestContext {
    pub db: Arc<Database>,
    pub services: Services,
    pub uow: Persistence,
}

pub fn test_config() -> Config {
    Config::new("sqlite::memory:", TEST_JWT_SECRET).expect("valid test config")
}

/// Fresh in-memory database. One pooled connection so every query sees the
/// same database.
pub async fn setup_db() -> Database {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let connection = SeaDatabase::connect(options)
        .await
        .expect("connect to sqlite");
    let db = Database::from_connection(connection);
    db.run_migrations().await.expect("run migrations");
    db
}

pub async fn setup() -> TestContext {
    let db = setup_db().await;
    let services = Services::from_connection(db.get_connection(), test_config());
    let uow = Persistence::new(db.get_connection());

    TestContext {
        db: Arc::new(db),
        services,
        uow,
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("valid timestamp")
}

impl TestContext {
    pub async fn user(&self, username: &str, role: UserRole) -> User {
        self.services
            .users()
            .create_user(
                username.to_string(),
                "secret123".to_string(),
                "Test User".to_string(),
                role,
            )
            .await
            .expect("create user")
    }

    pub async fn project(&self, name: &str) -> Project {
        self.services
            .projects()
            .create_project(ProjectFields {
                client_name: "Acme Corp".to_string(),
                project_name: name.to_string(),
                work_type: "Development".to_string(),
                location: "Remote".to_string(),
            })
            .await
            .expect("create project")
    }

    /// User with one actively assigned project.
    pub async fn assigned(&self, username: &str) -> (User, Project) {
        let user = self.user(username, UserRole::User).await;
        let project = self.project(&format!("{} project", username)).await;
        self.assign(&user, &project).await;
        (user, project)
    }

    pub async fn assign(&self, user: &User, project: &Project) {
        self.services
            .projects()
            .assign_project(user.id, project.id)
            .await
            .expect("assign project");
    }

    /// Completed session between two fixed instants.
    pub async fn finished_entry(
        &self,
        user: &User,
        project: &Project,
        clock_in: DateTime<Utc>,
        minutes: i32,
    ) -> TimeEntry {
        let entries = self.uow.time_entries();
        let entry = entries
            .create(user.id, project.id, clock_in)
            .await
            .expect("create entry");
        let clock_out = clock_in + chrono::Duration::minutes(i64::from(minutes));
        assert!(entries
            .complete(entry.id, clock_out, minutes)
            .await
            .expect("complete entry"));
        entries
            .find_by_id(entry.id)
            .await
            .expect("reload entry")
            .expect("entry exists")
    }
}
