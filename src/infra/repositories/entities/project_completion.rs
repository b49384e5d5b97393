//! Project completion audit entity.
//!
//! Rows outlive the project they refer to, so there is no foreign key on
//! `project_id`.

use sea_orm::entity::prelude::*;

use crate::domain::ProjectCompletion;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "project_completions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub project_id: i32,
    pub completion_date: DateTimeUtc,
    pub total_hours_worked: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProjectCompletion {
    fn from(model: Model) -> Self {
        ProjectCompletion {
            id: model.id,
            user_id: model.user_id,
            project_id: model.project_id,
            completion_date: model.completion_date,
            total_hours_worked: model.total_hours_worked,
        }
    }
}
