//! User-project assignment repository.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::{
    project,
    user_project::{self, Entity as AssignmentEntity},
};
use crate::domain::{AssignedProject, Assignment, AssignmentStatus, Project};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Assignment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn find(&self, user_id: i32, project_id: i32) -> AppResult<Option<Assignment>>;

    /// Create an active assignment. Returns `false` if the pair already
    /// exists, in any status.
    async fn assign(&self, user_id: i32, project_id: i32) -> AppResult<bool>;

    /// Move the assignment from `from` to `to`. Returns `false` when no
    /// assignment in state `from` exists.
    async fn transition(
        &self,
        user_id: i32,
        project_id: i32,
        from: AssignmentStatus,
        to: AssignmentStatus,
    ) -> AppResult<bool>;

    /// Projects assigned to a user in the given state, by project name.
    async fn list_for_user(
        &self,
        user_id: i32,
        status: AssignmentStatus,
    ) -> AppResult<Vec<AssignedProject>>;
}

/// Concrete implementation of AssignmentRepository
pub struct AssignmentStore {
    db: DatabaseConnection,
}

impl AssignmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AssignmentRepository for AssignmentStore {
    async fn find(&self, user_id: i32, project_id: i32) -> AppResult<Option<Assignment>> {
        find(&self.db, user_id, project_id).await
    }

    async fn assign(&self, user_id: i32, project_id: i32) -> AppResult<bool> {
        if find(&self.db, user_id, project_id).await?.is_some() {
            return Ok(false);
        }

        let inserted = user_project::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            project_id: Set(project_id),
            status: Set(AssignmentStatus::Active.as_str().to_string()),
            assigned_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await;

        match inserted.map_err(AppError::from) {
            Ok(_) => Ok(true),
            // Lost a race with a concurrent assign of the same pair
            Err(e) if e.is_unique_violation() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn transition(
        &self,
        user_id: i32,
        project_id: i32,
        from: AssignmentStatus,
        to: AssignmentStatus,
    ) -> AppResult<bool> {
        let result = AssignmentEntity::update_many()
            .col_expr(user_project::Column::Status, Expr::value(to.as_str()))
            .filter(user_project::Column::UserId.eq(user_id))
            .filter(user_project::Column::ProjectId.eq(project_id))
            .filter(user_project::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_for_user(
        &self,
        user_id: i32,
        status: AssignmentStatus,
    ) -> AppResult<Vec<AssignedProject>> {
        let rows = AssignmentEntity::find()
            .filter(user_project::Column::UserId.eq(user_id))
            .filter(user_project::Column::Status.eq(status.as_str()))
            .find_also_related(project::Entity)
            .order_by_asc(project::Column::ClientName)
            .order_by_asc(project::Column::ProjectName)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(assignment, project)| {
                let assignment = Assignment::from(assignment);
                project.map(|p| AssignedProject {
                    project: Project::from(p),
                    status: assignment.status,
                    assigned_at: assignment.assigned_at,
                })
            })
            .collect())
    }
}

pub(crate) async fn find<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    project_id: i32,
) -> AppResult<Option<Assignment>> {
    let model = AssignmentEntity::find()
        .filter(user_project::Column::UserId.eq(user_id))
        .filter(user_project::Column::ProjectId.eq(project_id))
        .one(db)
        .await?;
    Ok(model.map(Assignment::from))
}

/// Unconditionally set the status of a (user, project) assignment.
pub(crate) async fn set_status<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    project_id: i32,
    status: AssignmentStatus,
) -> AppResult<u64> {
    let result = AssignmentEntity::update_many()
        .col_expr(user_project::Column::Status, Expr::value(status.as_str()))
        .filter(user_project::Column::UserId.eq(user_id))
        .filter(user_project::Column::ProjectId.eq(project_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub(crate) async fn delete_for_project<C: ConnectionTrait>(db: &C, project_id: i32) -> AppResult<u64> {
    let result = AssignmentEntity::delete_many()
        .filter(user_project::Column::ProjectId.eq(project_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
