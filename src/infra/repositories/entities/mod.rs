//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod project;
pub mod project_completion;
pub mod time_entry;
pub mod timesheet;
pub mod user;
pub mod user_project;
