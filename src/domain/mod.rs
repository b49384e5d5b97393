//! Domain layer - Core business entities and rules.
//!
//! Records of the timesheet system plus the pure rules that operate on
//! them (week bucketing, additive merge, duration truncation). Nothing here
//! touches the database.

pub mod password;
pub mod project;
pub mod time_entry;
pub mod timesheet;
pub mod user;

pub use password::Password;
pub use project::{AssignedProject, Assignment, AssignmentStatus, Project, ProjectFields};
pub use time_entry::{duration_minutes, entry_date, EntryStatus, TimeEntry, TimeEntryDetails};
pub use timesheet::{
    aggregate_entries, week_start, CompletionDetails, DayHours, ProjectCompletion, SyncReport,
    Timesheet, TimesheetDetails, TimesheetFilter, TimesheetStatus, WeekHours, WeekKey,
};
pub use user::{NewUser, User, UserResponse, UserRole};
