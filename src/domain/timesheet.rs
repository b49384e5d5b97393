//! Weekly timesheets and the rules that fill them.
//!
//! A week is identified by its Sunday. Hours are kept per weekday and the
//! row total is always recomputed from the seven day fields.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::time_entry::TimeEntry;
use crate::config::{MINUTES_PER_HOUR, STATUS_ACTIVE, STATUS_COMPLETED};

/// Sunday that begins the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// Archival state of a timesheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimesheetStatus {
    Active,
    Completed,
}

impl TimesheetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimesheetStatus::Active => STATUS_ACTIVE,
            TimesheetStatus::Completed => STATUS_COMPLETED,
        }
    }
}

impl From<&str> for TimesheetStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_COMPLETED => TimesheetStatus::Completed,
            _ => TimesheetStatus::Active,
        }
    }
}

/// Hours for each day of one week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeekHours {
    pub sunday: f64,
    pub monday: f64,
    pub tuesday: f64,
    pub wednesday: f64,
    pub thursday: f64,
    pub friday: f64,
    pub saturday: f64,
}

impl WeekHours {
    /// Sum of the seven day fields, always in Sunday..Saturday order.
    pub fn total(&self) -> f64 {
        self.sunday
            + self.monday
            + self.tuesday
            + self.wednesday
            + self.thursday
            + self.friday
            + self.saturday
    }

    pub fn day_mut(&mut self, weekday: Weekday) -> &mut f64 {
        match weekday {
            Weekday::Sun => &mut self.sunday,
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
        }
    }

    /// Add hours to one weekday bucket.
    pub fn add(&mut self, weekday: Weekday, hours: f64) {
        *self.day_mut(weekday) += hours;
    }

    /// Additive merge: every day of `other` is added to this week.
    pub fn merge(&mut self, other: &WeekHours) {
        self.sunday += other.sunday;
        self.monday += other.monday;
        self.tuesday += other.tuesday;
        self.wednesday += other.wednesday;
        self.thursday += other.thursday;
        self.friday += other.friday;
        self.saturday += other.saturday;
    }

    /// Copy of this week with `other` merged in.
    pub fn merged(mut self, other: &WeekHours) -> WeekHours {
        self.merge(other);
        self
    }
}

/// Partial per-day hours as submitted by a user. Missing days count as zero.
///
/// Values may arrive as JSON numbers or numeric strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct DayHours {
    #[serde(default, deserialize_with = "lenient_hours")]
    #[validate(range(min = 0.0, max = 24.0, message = "Invalid hours for sunday: must be between 0 and 24"))]
    #[schema(example = 0.0)]
    pub sunday: Option<f64>,
    #[serde(default, deserialize_with = "lenient_hours")]
    #[validate(range(min = 0.0, max = 24.0, message = "Invalid hours for monday: must be between 0 and 24"))]
    #[schema(example = 8.0)]
    pub monday: Option<f64>,
    #[serde(default, deserialize_with = "lenient_hours")]
    #[validate(range(min = 0.0, max = 24.0, message = "Invalid hours for tuesday: must be between 0 and 24"))]
    pub tuesday: Option<f64>,
    #[serde(default, deserialize_with = "lenient_hours")]
    #[validate(range(min = 0.0, max = 24.0, message = "Invalid hours for wednesday: must be between 0 and 24"))]
    pub wednesday: Option<f64>,
    #[serde(default, deserialize_with = "lenient_hours")]
    #[validate(range(min = 0.0, max = 24.0, message = "Invalid hours for thursday: must be between 0 and 24"))]
    pub thursday: Option<f64>,
    #[serde(default, deserialize_with = "lenient_hours")]
    #[validate(range(min = 0.0, max = 24.0, message = "Invalid hours for friday: must be between 0 and 24"))]
    pub friday: Option<f64>,
    #[serde(default, deserialize_with = "lenient_hours")]
    #[validate(range(min = 0.0, max = 24.0, message = "Invalid hours for saturday: must be between 0 and 24"))]
    pub saturday: Option<f64>,
}

impl From<DayHours> for WeekHours {
    fn from(hours: DayHours) -> Self {
        Self {
            sunday: hours.sunday.unwrap_or(0.0),
            monday: hours.monday.unwrap_or(0.0),
            tuesday: hours.tuesday.unwrap_or(0.0),
            wednesday: hours.wednesday.unwrap_or(0.0),
            thursday: hours.thursday.unwrap_or(0.0),
            friday: hours.friday.unwrap_or(0.0),
            saturday: hours.saturday.unwrap_or(0.0),
        }
    }
}

fn lenient_hours<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Option::<Raw>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("hours must be a number, got {:?}", s)))?,
    };

    if !value.is_finite() {
        return Err(de::Error::custom("hours must be a finite number"));
    }
    Ok(Some(value))
}

/// One weekly row for a (user, project, week) triple.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Timesheet {
    #[schema(example = 12)]
    pub id: i32,
    pub user_id: i32,
    pub project_id: i32,
    #[schema(value_type = String, format = Date, example = "2024-03-10")]
    pub week_start: NaiveDate,
    #[serde(flatten)]
    pub hours: WeekHours,
    #[schema(example = 8.0)]
    pub total_hours: f64,
    pub status: TimesheetStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Timesheet joined with project display fields (and the user's name on
/// admin listings).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimesheetDetails {
    #[serde(flatten)]
    pub timesheet: Timesheet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub client_name: String,
    pub project_name: String,
    pub work_type: String,
    pub location: String,
}

/// Exact-match filters for the admin timesheet listing. All optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TimesheetFilter {
    #[validate(range(min = 1, message = "User ID must be a positive integer"))]
    pub user_id: Option<i32>,
    #[param(value_type = Option<String>, format = Date)]
    pub week_start: Option<NaiveDate>,
    #[validate(range(min = 1, message = "Project ID must be a positive integer"))]
    pub project_id: Option<i32>,
}

/// Immutable audit record written when a user completes a project.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProjectCompletion {
    pub id: i32,
    pub user_id: i32,
    pub project_id: i32,
    pub completion_date: DateTime<Utc>,
    #[schema(example = 12.5)]
    pub total_hours_worked: f64,
}

/// Completion record with the names an admin report shows.
///
/// Project fields are absent once the project itself has been deleted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompletionDetails {
    #[serde(flatten)]
    pub completion: ProjectCompletion,
    pub user_name: Option<String>,
    pub client_name: Option<String>,
    pub project_name: Option<String>,
}

/// Outcome of folding completed time entries into timesheets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SyncReport {
    /// Time entries folded and stamped as synced.
    pub entries_synced: usize,
    /// Timesheet rows inserted or updated.
    pub timesheets_updated: usize,
}

/// Key of a timesheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    pub user_id: i32,
    pub project_id: i32,
    pub week_start: NaiveDate,
}

/// Bucket completed entries into per-(user, project, week) day hours.
///
/// Entries without a positive duration are skipped. Minutes become hours by
/// real division.
pub fn aggregate_entries<'a, I>(entries: I) -> BTreeMap<WeekKey, WeekHours>
where
    I: IntoIterator<Item = &'a TimeEntry>,
{
    let mut weeks: BTreeMap<WeekKey, WeekHours> = BTreeMap::new();

    for entry in entries {
        let minutes = match entry.duration_minutes {
            Some(m) if m > 0 => m,
            _ => continue,
        };
        let key = WeekKey {
            user_id: entry.user_id,
            project_id: entry.project_id,
            week_start: week_start(entry.date),
        };
        weeks
            .entry(key)
            .or_default()
            .add(entry.date.weekday(), f64::from(minutes) / MINUTES_PER_HOUR);
    }

    weeks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn completed_entry(id: i32, user_id: i32, project_id: i32, day: NaiveDate, minutes: Option<i32>) -> TimeEntry {
        let clock_in = day.and_hms_opt(9, 0, 0).unwrap().and_utc();
        TimeEntry {
            id,
            user_id,
            project_id,
            clock_in,
            clock_out: minutes.map(|m| clock_in + Duration::minutes(i64::from(m))),
            duration_minutes: minutes,
            date: day,
            status: EntryStatus::Completed,
            synced_at: None,
            created_at: clock_in,
        }
    }

    #[test]
    fn test_week_start_of_wednesday_is_previous_sunday() {
        assert_eq!(week_start(date(2024, 3, 13)), date(2024, 3, 10));
    }

    #[test]
    fn test_week_start_of_sunday_is_itself() {
        assert_eq!(week_start(date(2024, 3, 10)), date(2024, 3, 10));
    }

    #[test]
    fn test_week_start_of_saturday_and_year_boundary() {
        assert_eq!(week_start(date(2024, 3, 16)), date(2024, 3, 10));
        // Wednesday 2025-01-01 belongs to the week of Sunday 2024-12-29
        assert_eq!(week_start(date(2025, 1, 1)), date(2024, 12, 29));
    }

    #[test]
    fn test_merge_is_additive() {
        let first = WeekHours::from(DayHours {
            monday: Some(3.0),
            ..Default::default()
        });
        let second = WeekHours::from(DayHours {
            monday: Some(2.0),
            tuesday: Some(1.0),
            ..Default::default()
        });

        let merged = first.merged(&second);

        assert_eq!(merged.monday, 5.0);
        assert_eq!(merged.tuesday, 1.0);
        assert_eq!(merged.total(), 6.0);
    }

    #[test]
    fn test_total_sums_all_seven_days() {
        let week = WeekHours {
            sunday: 1.0,
            monday: 2.0,
            tuesday: 3.0,
            wednesday: 4.0,
            thursday: 5.0,
            friday: 6.0,
            saturday: 7.0,
        };
        assert_eq!(week.total(), 28.0);
    }

    #[test]
    fn test_day_hours_accepts_numeric_strings() {
        let hours: DayHours =
            serde_json::from_str(r#"{"monday": "7.5", "friday": 2, "sunday": ""}"#).unwrap();

        assert_eq!(hours.monday, Some(7.5));
        assert_eq!(hours.friday, Some(2.0));
        assert_eq!(hours.sunday, None);
        assert_eq!(hours.tuesday, None);
    }

    #[test]
    fn test_day_hours_rejects_non_numeric() {
        let result: Result<DayHours, _> = serde_json::from_str(r#"{"monday": "lots"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_day_hours_range_validation() {
        let too_many = DayHours {
            wednesday: Some(24.5),
            ..Default::default()
        };
        let negative = DayHours {
            monday: Some(-1.0),
            ..Default::default()
        };
        let boundary = DayHours {
            sunday: Some(0.0),
            saturday: Some(24.0),
            ..Default::default()
        };

        assert!(too_many.validate().is_err());
        assert!(negative.validate().is_err());
        assert!(boundary.validate().is_ok());
    }

    #[test]
    fn test_aggregate_buckets_by_week_and_weekday() {
        let wednesday = date(2024, 3, 13);
        let thursday = date(2024, 3, 14);
        let next_monday = date(2024, 3, 18);
        let entries = vec![
            completed_entry(1, 1, 10, wednesday, Some(90)),
            completed_entry(2, 1, 10, wednesday, Some(30)),
            completed_entry(3, 1, 10, thursday, Some(45)),
            completed_entry(4, 1, 10, next_monday, Some(60)),
            completed_entry(5, 2, 10, wednesday, Some(120)),
        ];

        let weeks = aggregate_entries(&entries);

        assert_eq!(weeks.len(), 3);
        let first = weeks[&WeekKey {
            user_id: 1,
            project_id: 10,
            week_start: date(2024, 3, 10),
        }];
        assert_eq!(first.wednesday, 2.0);
        assert_eq!(first.thursday, 0.75);
        assert_eq!(first.total(), 2.75);

        let second = weeks[&WeekKey {
            user_id: 1,
            project_id: 10,
            week_start: date(2024, 3, 17),
        }];
        assert_eq!(second.monday, 1.0);
    }

    #[test]
    fn test_aggregate_skips_zero_and_missing_durations() {
        let day = date(2024, 3, 13);
        let entries = vec![
            completed_entry(1, 1, 10, day, Some(0)),
            completed_entry(2, 1, 10, day, None),
        ];

        assert!(aggregate_entries(&entries).is_empty());
    }

    #[test]
    fn test_timesheet_serializes_days_flat() {
        let sheet = Timesheet {
            id: 1,
            user_id: 2,
            project_id: 3,
            week_start: date(2024, 3, 10),
            hours: WeekHours {
                monday: 4.0,
                ..Default::default()
            },
            total_hours: 4.0,
            status: TimesheetStatus::Active,
            submitted_at: Utc::now(),
        };

        let value = serde_json::to_value(&sheet).unwrap();
        assert_eq!(value["monday"], 4.0);
        assert_eq!(value["week_start"], "2024-03-10");
        assert_eq!(value["status"], "active");
    }
}
