//! Time entry (clock session) entity.

use sea_orm::entity::prelude::*;

use crate::domain::{EntryStatus, TimeEntry};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "time_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub project_id: i32,
    pub clock_in: DateTimeUtc,
    pub clock_out: Option<DateTimeUtc>,
    pub duration_minutes: Option<i32>,
    pub date: Date,
    pub status: String,
    /// NULL until the entry has been folded into a timesheet
    pub synced_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
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

impl From<Model> for TimeEntry {
    fn from(model: Model) -> Self {
        TimeEntry {
            id: model.id,
            user_id: model.user_id,
            project_id: model.project_id,
            clock_in: model.clock_in,
            clock_out: model.clock_out,
            duration_minutes: model.duration_minutes,
            date: model.date,
            status: EntryStatus::from(model.status.as_str()),
            synced_at: model.synced_at,
            created_at: model.created_at,
        }
    }
}
