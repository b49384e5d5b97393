//! Project completion audit repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryOrder, Set,
};

use super::entities::{
    project,
    project_completion::{self, Entity as CompletionEntity},
};
use super::timesheet_repository::user_names;
use crate::domain::{CompletionDetails, ProjectCompletion};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Completion repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CompletionRepository: Send + Sync {
    /// All completion records, newest first.
    async fn list(&self) -> AppResult<Vec<CompletionDetails>>;
}

/// Concrete implementation of CompletionRepository
pub struct CompletionStore {
    db: DatabaseConnection,
}

impl CompletionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CompletionRepository for CompletionStore {
    async fn list(&self) -> AppResult<Vec<CompletionDetails>> {
        let rows = CompletionEntity::find()
            .order_by_desc(project_completion::Column::CompletionDate)
            .order_by_desc(project_completion::Column::Id)
            .find_also_related(project::Entity)
            .all(&self.db)
            .await?;

        let names = user_names(&self.db, rows.iter().map(|(c, _)| c.user_id).collect()).await?;

        Ok(rows
            .into_iter()
            .map(|(completion, project)| CompletionDetails {
                user_name: names.get(&completion.user_id).cloned(),
                client_name: project.as_ref().map(|p| p.client_name.clone()),
                project_name: project.map(|p| p.project_name),
                completion: ProjectCompletion::from(completion),
            })
            .collect())
    }
}

pub(crate) async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    project_id: i32,
    total_hours_worked: f64,
) -> AppResult<ProjectCompletion> {
    let model = project_completion::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        project_id: Set(project_id),
        completion_date: Set(Utc::now()),
        total_hours_worked: Set(total_hours_worked),
    }
    .insert(db)
    .await?;

    Ok(ProjectCompletion::from(model))
}
