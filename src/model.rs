//! Internal normalized reminder model.
//!
//! These types mirror what the storage backend holds, not what crosses the
//! wire: priority is the backend's 0-9 scale, alarm offsets are negative
//! seconds, and dates keep the offset they were written with. Conversions to
//! and from the wire shapes live in [`crate::mapping`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A reminder list. Exactly one list in a store is the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

impl ReminderList {
    /// Wire form used by `listLists` and `createList`.
    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "isDefault": self.is_default,
        })
    }

    pub fn name_matches(&self, name: &str) -> bool {
        list_names_match(&self.name, name)
    }
}

/// Case-insensitive list name comparison, Unicode-aware and ignoring
/// surrounding whitespace.
pub fn list_names_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// A single reminder as held by the storage backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub list_id: String,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Backend priority, 0 (none) through 9.
    #[serde(default)]
    pub priority: u8,
    #[serde(default)]
    pub due_date: Option<DateTime<FixedOffset>>,
    /// `false` for date-only due dates.
    #[serde(default)]
    pub due_date_includes_time: bool,
    #[serde(default)]
    pub completion_date: Option<DateTime<FixedOffset>>,
    /// Backend-assigned.
    #[serde(default)]
    pub creation_date: Option<DateTime<FixedOffset>>,
    /// Backend-assigned.
    #[serde(default)]
    pub last_modified: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alarms: Vec<Alarm>,
    #[serde(default)]
    pub recurrence_rules: Vec<RecurrenceRule>,
}

impl Reminder {
    /// A blank, incomplete reminder in `list_id`.
    pub fn draft(id: impl Into<String>, list_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            list_id: list_id.into(),
            title: String::new(),
            notes: None,
            priority: 0,
            due_date: None,
            due_date_includes_time: false,
            completion_date: None,
            creation_date: None,
            last_modified: None,
            url: None,
            alarms: Vec::new(),
            recurrence_rules: Vec::new(),
        }
    }

    /// Completion is derived from the presence of a completion timestamp.
    pub fn is_completed(&self) -> bool {
        self.completion_date.is_some()
    }
}

/// A reminder alarm: either a fixed instant or an offset relative to the due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alarm {
    Absolute(DateTime<FixedOffset>),
    /// Seconds relative to the due date; negative means before.
    Relative(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

/// A weekday within a recurrence, optionally pinned to a week of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceDay {
    pub day: DayOfWeek,
    /// 0 = every week; 1..=5 from the start of the period; -1..=-4 from the end.
    #[serde(default)]
    pub week_number: i8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceEnd {
    Count(u32),
    Date(DateTime<FixedOffset>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u32,
    #[serde(default)]
    pub days_of_week: Vec<RecurrenceDay>,
    /// 1..=31, or -1..=-31 counting back from the end of the month.
    #[serde(default)]
    pub days_of_month: Vec<i8>,
    /// 1..=12.
    #[serde(default)]
    pub months_of_year: Vec<u8>,
    #[serde(default)]
    pub end: Option<RecurrenceEnd>,
}
