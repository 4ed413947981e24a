//! Mapping between wire representations and the internal model.
//!
//! Everything that crosses the boundary passes through here exactly once:
//! request fields are parsed into [`crate::model`] types before any engine
//! logic runs, and stored reminders are rendered back to JSON by
//! [`reminder_to_wire`].

pub mod alarm;
pub mod dates;
pub mod priority;
pub mod recurrence;

pub use alarm::AlarmWire;
pub use dates::{ParsedDate, format_date, parse_date, parse_range_bound};
pub use priority::Priority;
pub use recurrence::RecurrenceWire;

use serde_json::{Map, Value, json};

use crate::error::{RemkitError, Result};
use crate::model::Reminder;

/// Render a reminder with the full field set.
///
/// Every key is present; absent optional values are `null`. `list_name` is
/// looked up by the caller because the reminder only stores the list id.
pub fn reminder_to_wire(reminder: &Reminder, list_name: Option<&str>) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("id".into(), json!(reminder.id));
    out.insert("title".into(), json!(reminder.title));
    out.insert("notes".into(), json!(reminder.notes));
    out.insert("listId".into(), json!(reminder.list_id));
    out.insert("listName".into(), json!(list_name));
    out.insert("isCompleted".into(), json!(reminder.is_completed()));
    out.insert(
        "priority".into(),
        json!(Priority::from_internal(reminder.priority).as_str()),
    );
    out.insert(
        "dueDate".into(),
        json!(reminder.due_date.as_ref().map(format_date)),
    );
    out.insert(
        "dueDateIncludesTime".into(),
        json!(reminder.due_date.is_some() && reminder.due_date_includes_time),
    );
    out.insert(
        "completionDate".into(),
        json!(reminder.completion_date.as_ref().map(format_date)),
    );
    out.insert(
        "creationDate".into(),
        json!(reminder.creation_date.as_ref().map(format_date)),
    );
    out.insert(
        "lastModifiedDate".into(),
        json!(reminder.last_modified.as_ref().map(format_date)),
    );
    out.insert("url".into(), json!(reminder.url));
    out.insert(
        "alarms".into(),
        Value::Array(reminder.alarms.iter().map(alarm::alarm_to_wire).collect()),
    );
    // Only the first rule is surfaced; the wire schema carries a single recurrence.
    out.insert(
        "recurrence".into(),
        reminder
            .recurrence_rules
            .first()
            .map(recurrence::rule_to_wire)
            .unwrap_or(Value::Null),
    );
    out
}

/// Validate that `input` is an absolute URL. The caller's text is kept as-is.
pub fn parse_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    url::Url::parse(trimmed)
        .map(|_| trimmed.to_owned())
        .map_err(|e| RemkitError::Validation(format!("invalid url '{trimmed}': {e}")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::model::Alarm;

    #[test]
    fn full_wire_shape_has_every_key() {
        let r = Reminder::draft("rem-1", "list-1");
        let wire = reminder_to_wire(&r, Some("Personal"));
        for key in [
            "id",
            "title",
            "notes",
            "listId",
            "listName",
            "isCompleted",
            "priority",
            "dueDate",
            "dueDateIncludesTime",
            "completionDate",
            "creationDate",
            "lastModifiedDate",
            "url",
            "alarms",
            "recurrence",
        ] {
            assert!(wire.contains_key(key), "missing {key}");
        }
        assert_eq!(wire["notes"], Value::Null);
        assert_eq!(wire["priority"], "none");
        assert_eq!(wire["isCompleted"], false);
        assert_eq!(wire["listName"], "Personal");
    }

    #[test]
    fn wire_dates_use_numeric_offset() {
        let mut r = Reminder::draft("rem-1", "list-1");
        r.due_date = Some(parse_date("2026-03-01T09:00:00Z").unwrap().value);
        r.due_date_includes_time = true;
        let wire = reminder_to_wire(&r, None);
        assert_eq!(wire["dueDate"], "2026-03-01T09:00:00+00:00");
        assert_eq!(wire["dueDateIncludesTime"], true);
    }

    #[test]
    fn relative_alarm_renders_positive_offset() {
        let mut r = Reminder::draft("rem-1", "list-1");
        r.alarms.push(Alarm::Relative(-3600));
        let wire = reminder_to_wire(&r, None);
        assert_eq!(wire["alarms"][0]["offset"], 3600);
        assert_eq!(wire["alarms"][0]["type"], "relative");
    }

    #[test]
    fn parse_url_accepts_absolute_urls() {
        assert_eq!(
            parse_url(" https://example.com/a ").unwrap(),
            "https://example.com/a"
        );
        assert!(matches!(
            parse_url("not a url"),
            Err(RemkitError::Validation(_))
        ));
    }
}
