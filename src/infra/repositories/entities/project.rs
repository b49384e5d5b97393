//! Project database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Project;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub client_name: String,
    pub project_name: String,
    pub work_type: String,
    pub location: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_project::Entity")]
    UserProject,
    #[sea_orm(has_many = "super::time_entry::Entity")]
    TimeEntry,
    #[sea_orm(has_many = "super::timesheet::Entity")]
    Timesheet,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Project {
    fn from(model: Model) -> Self {
        Project {
            id: model.id,
            client_name: model.client_name,
            project_name: model.project_name,
            work_type: model.work_type,
            location: model.location,
            created_at: model.created_at,
        }
    }
}
