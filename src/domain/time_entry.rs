//! Clock-in/clock-out sessions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{STATUS_ACTIVE, STATUS_COMPLETED};

/// State of a time entry. An entry is `Active` while the session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Active,
    Completed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Active => STATUS_ACTIVE,
            EntryStatus::Completed => STATUS_COMPLETED,
        }
    }
}

impl From<&str> for EntryStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_COMPLETED => EntryStatus::Completed,
            _ => EntryStatus::Active,
        }
    }
}

/// One clock session of a user on a project.
///
/// `date` is the UTC calendar day of `clock_in` and is never moved, so a
/// session that crosses midnight counts towards the day it started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeEntry {
    #[schema(example = 42)]
    pub id: i32,
    pub user_id: i32,
    pub project_id: i32,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    #[schema(example = 95)]
    pub duration_minutes: Option<i32>,
    #[schema(value_type = String, format = Date, example = "2024-03-13")]
    pub date: NaiveDate,
    pub status: EntryStatus,
    /// Set once the entry has been folded into a timesheet.
    pub synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TimeEntry {
    pub fn is_active(&self) -> bool {
        self.status == EntryStatus::Active
    }
}

/// Time entry joined with its project's display fields.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimeEntryDetails {
    #[serde(flatten)]
    pub entry: TimeEntry,
    pub project_name: String,
    pub client_name: String,
}

/// Whole minutes between two instants. The partial final minute is dropped.
///
/// A `clock_out` earlier than `clock_in` (clock skew) yields zero.
pub fn duration_minutes(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> i32 {
    let seconds = (clock_out - clock_in).num_seconds().max(0);
    i32::try_from(seconds / 60).unwrap_or(i32::MAX)
}

/// Calendar day an entry is attributed to.
pub fn entry_date(clock_in: DateTime<Utc>) -> NaiveDate {
    clock_in.date_naive()
}
