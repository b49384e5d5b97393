//! Weekly timesheet entity.

use sea_orm::entity::prelude::*;

use crate::domain::{Timesheet, TimesheetStatus, WeekHours};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "timesheets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub project_id: i32,
    pub week_start: Date,
    pub sunday: f64,
    pub monday: f64,
    pub tuesday: f64,
    pub wednesday: f64,
    pub thursday: f64,
    pub friday: f64,
    pub saturday: f64,
    pub total_hours: f64,
    pub status: String,
    pub submitted_at: DateTimeUtc,
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

impl Model {
    pub fn hours(&self) -> WeekHours {
        WeekHours {
            sunday: self.sunday,
            monday: self.monday,
            tuesday: self.tuesday,
            wednesday: self.wednesday,
            thursday: self.thursday,
            friday: self.friday,
            saturday: self.saturday,
        }
    }
}

impl From<Model> for Timesheet {
    fn from(model: Model) -> Self {
        Timesheet {
            id: model.id,
            user_id: model.user_id,
            project_id: model.project_id,
            week_start: model.week_start,
            hours: model.hours(),
            total_hours: model.total_hours,
            status: TimesheetStatus::from(model.status.as_str()),
            submitted_at: model.submitted_at,
        }
    }
}
