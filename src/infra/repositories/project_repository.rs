//! Project repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryOrder, Set,
};

use super::entities::project::{self, Entity as ProjectEntity};
use crate::domain::{Project, ProjectFields};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Project repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Project>>;

    /// All projects ordered by client then project name.
    async fn list(&self) -> AppResult<Vec<Project>>;

    async fn create(&self, fields: ProjectFields) -> AppResult<Project>;

    /// Replace the editable fields. Returns `None` when the project does not exist.
    async fn update(&self, id: i32, fields: ProjectFields) -> AppResult<Option<Project>>;
}

/// Concrete implementation of ProjectRepository
pub struct ProjectStore {
    db: DatabaseConnection,
}

impl ProjectStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProjectRepository for ProjectStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Project>> {
        find_by_id(&self.db, id).await
    }

    async fn list(&self) -> AppResult<Vec<Project>> {
        let models = ProjectEntity::find()
            .order_by_asc(project::Column::ClientName)
            .order_by_asc(project::Column::ProjectName)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Project::from).collect())
    }

    async fn create(&self, fields: ProjectFields) -> AppResult<Project> {
        let model = project::ActiveModel {
            id: NotSet,
            client_name: Set(fields.client_name),
            project_name: Set(fields.project_name),
            work_type: Set(fields.work_type),
            location: Set(fields.location),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(Project::from(model))
    }

    async fn update(&self, id: i32, fields: ProjectFields) -> AppResult<Option<Project>> {
        let Some(existing) = ProjectEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: project::ActiveModel = existing.into();
        active.client_name = Set(fields.client_name);
        active.project_name = Set(fields.project_name);
        active.work_type = Set(fields.work_type);
        active.location = Set(fields.location);

        let model = active.update(&self.db).await?;
        Ok(Some(Project::from(model)))
    }
}

pub(crate) async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Project>> {
    Ok(ProjectEntity::find_by_id(id).one(db).await?.map(Project::from))
}

/// Delete the project row itself. Dependent rows must already be gone.
pub(crate) async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bool> {
    let result = ProjectEntity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
