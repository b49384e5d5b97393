//! Project service - project catalogue and user assignments.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{AssignedProject, AssignmentStatus, Project, ProjectFields};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Project service trait for dependency injection.
#[async_trait]
pub trait ProjectService: Send + Sync {
    async fn list_projects(&self) -> AppResult<Vec<Project>>;

    async fn create_project(&self, fields: ProjectFields) -> AppResult<Project>;

    async fn update_project(&self, id: i32, fields: ProjectFields) -> AppResult<Project>;

    /// Delete a project with its timesheets, time entries and assignments.
    /// Completion records are kept.
    async fn delete_project(&self, id: i32) -> AppResult<()>;

    /// Assign a project to a user. Returns `false` if the user already has
    /// an assignment for it, whatever its state.
    async fn assign_project(&self, user_id: i32, project_id: i32) -> AppResult<bool>;

    /// Projects the user can currently log time against.
    async fn user_projects(&self, user_id: i32) -> AppResult<Vec<AssignedProject>>;
}

/// Concrete implementation of ProjectService using Unit of Work.
pub struct ProjectManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ProjectManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProjectService for ProjectManager<U> {
    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        self.uow.projects().list().await
    }

    async fn create_project(&self, fields: ProjectFields) -> AppResult<Project> {
        let project = self.uow.projects().create(fields.trimmed()).await?;
        tracing::info!(project_id = project.id, "Project created");
        Ok(project)
    }

    async fn update_project(&self, id: i32, fields: ProjectFields) -> AppResult<Project> {
        self.uow
            .projects()
            .update(id, fields.trimmed())
            .await?
            .ok_or_not_found("Project")
    }

    async fn delete_project(&self, id: i32) -> AppResult<()> {
        let (timesheets, entries, assignments) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    ctx.projects().find_by_id(id).await?.ok_or_not_found("Project")?;

                    let timesheets = ctx.timesheets().delete_for_project(id).await?;
                    let entries = ctx.time_entries().delete_for_project(id).await?;
                    let assignments = ctx.assignments().delete_for_project(id).await?;
                    ctx.projects().delete(id).await?;

                    Ok((timesheets, entries, assignments))
                })
            })
            .await?;

        tracing::info!(
            project_id = id,
            timesheets,
            time_entries = entries,
            assignments,
            "Project deleted"
        );
        Ok(())
    }

    async fn assign_project(&self, user_id: i32, project_id: i32) -> AppResult<bool> {
        self.uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;
        self.uow
            .projects()
            .find_by_id(project_id)
            .await?
            .ok_or_not_found("Project")?;

        let created = self.uow.assignments().assign(user_id, project_id).await?;
        if created {
            tracing::info!(user_id, project_id, "Project assigned");
        }
        Ok(created)
    }

    async fn user_projects(&self, user_id: i32) -> AppResult<Vec<AssignedProject>> {
        self.uow
            .assignments()
            .list_for_user(user_id, AssignmentStatus::Active)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserRole};
    use crate::errors::AppError;
    use crate::services::test_support::MockRepos;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn fields() -> ProjectFields {
        ProjectFields {
            client_name: "  Acme Corp ".into(),
            project_name: "Website".into(),
            work_type: "Development".into(),
            location: " Remote".into(),
        }
    }

    fn project(id: i32, fields: ProjectFields) -> Project {
        Project {
            id,
            client_name: fields.client_name,
            project_name: fields.project_name,
            work_type: fields.work_type,
            location: fields.location,
            created_at: Utc::now(),
        }
    }

    fn user(id: i32) -> User {
        User {
            id,
            username: "jdoe".into(),
            password_hash: String::new(),
            name: "John Doe".into(),
            role: UserRole::User,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_project_trims_fields() {
        let mut repos = MockRepos::default();
        repos
            .projects
            .expect_create()
            .withf(|f| f.client_name == "Acme Corp" && f.location == "Remote")
            .times(1)
            .returning(|f| Ok(project(1, f)));

        let service = ProjectManager::new(repos.into_uow());
        let created = service.create_project(fields()).await.unwrap();
        assert_eq!(created.client_name, "Acme Corp");
    }

    #[tokio::test]
    async fn test_update_missing_project_not_found() {
        let mut repos = MockRepos::default();
        repos
            .projects
            .expect_update()
            .with(eq(9), eq(fields().trimmed()))
            .returning(|_, _| Ok(None));

        let service = ProjectManager::new(repos.into_uow());
        let result = service.update_project(9, fields()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_assign_unknown_user_not_found() {
        let mut repos = MockRepos::default();
        repos.users.expect_find_by_id().returning(|_| Ok(None));
        repos.assignments.expect_assign().never();

        let service = ProjectManager::new(repos.into_uow());
        let result = service.assign_project(5, 1).await;
        assert!(matches!(result, Err(AppError::NotFound(ref m)) if m == "User"));
    }

    #[tokio::test]
    async fn test_assign_unknown_project_not_found() {
        let mut repos = MockRepos::default();
        repos.users.expect_find_by_id().returning(|id| Ok(Some(user(id))));
        repos.projects.expect_find_by_id().returning(|_| Ok(None));
        repos.assignments.expect_assign().never();

        let service = ProjectManager::new(repos.into_uow());
        let result = service.assign_project(5, 1).await;
        assert!(matches!(result, Err(AppError::NotFound(ref m)) if m == "Project"));
    }

    #[tokio::test]
    async fn test_assign_reports_duplicate() {
        let mut repos = MockRepos::default();
        repos.users.expect_find_by_id().returning(|id| Ok(Some(user(id))));
        repos
            .projects
            .expect_find_by_id()
            .returning(|id| Ok(Some(project(id, fields()))));
        repos
            .assignments
            .expect_assign()
            .with(eq(5), eq(1))
            .returning(|_, _| Ok(false));

        let service = ProjectManager::new(repos.into_uow());
        assert!(!service.assign_project(5, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_user_projects_lists_active_only() {
        let mut repos = MockRepos::default();
        repos
            .assignments
            .expect_list_for_user()
            .with(eq(3), eq(AssignmentStatus::Active))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = ProjectManager::new(repos.into_uow());
        assert!(service.user_projects(3).await.unwrap().is_empty());
    }
}
