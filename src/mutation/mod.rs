//! Batch create, update and delete.
//!
//! Every item in a batch is parsed, checked against the write policy and
//! persisted on its own. A failing item is reported next to the successes
//! and never stops the rest of the batch.

pub mod patch;
pub mod policy;

pub use patch::Patch;
pub use policy::{AllowAll, SandboxPolicy, WritePolicy};

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{RemkitError, Result};
use crate::mapping::alarm::alarms_from_wire;
use crate::mapping::{AlarmWire, Priority, RecurrenceWire, parse_date, parse_url, reminder_to_wire};
use crate::model::{Reminder, ReminderList};
use crate::query::list_names;
use crate::resolver::{ListSelector, resolve_for_write};
use crate::store::{ReminderStore, now};

/// One item of a create batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub list: Option<ListSelector>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alarms: Option<Vec<AlarmWire>>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceWire>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// One item of an update batch. Each [`Patch`] field is absent, `null` or a
/// value on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub id: String,
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub notes: Patch<String>,
    /// Destination list for a move.
    #[serde(default)]
    pub list: Option<ListSelector>,
    #[serde(default)]
    pub priority: Patch<String>,
    #[serde(default)]
    pub due_date: Patch<String>,
    #[serde(default)]
    pub url: Patch<String>,
    #[serde(default)]
    pub alarms: Patch<Vec<AlarmWire>>,
    #[serde(default)]
    pub recurrence: Patch<RecurrenceWire>,
    #[serde(default)]
    pub completed: Option<bool>,
    /// Overrides `completed` when present, including as `null`.
    #[serde(default)]
    pub completion_date: Patch<String>,
}

/// Per-item outcome of a batch: successes plus keyed failures.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: Vec<Value>,
    pub failed: Vec<Value>,
}

impl BatchOutcome {
    fn fail(&mut self, key: &str, at: Value, err: &RemkitError) {
        self.failed.push(json!({
            key: at,
            "error": err.to_string(),
            "code": err.code(),
        }));
    }

    /// Bare array of successes when nothing failed, else
    /// `{<label>: [...], failed: [...]}`.
    pub fn into_wire(self, label: &str) -> Value {
        if self.failed.is_empty() {
            Value::Array(self.succeeded)
        } else {
            self.into_object(label)
        }
    }

    /// Always `{<label>: [...], failed: [...]}`.
    pub fn into_object(self, label: &str) -> Value {
        json!({
            label: self.succeeded,
            "failed": self.failed,
        })
    }
}

/// Applies batch writes through a store, gated by a write policy.
pub struct MutationEngine {
    store: Arc<dyn ReminderStore>,
    policy: Arc<dyn WritePolicy>,
}

impl MutationEngine {
    pub fn new(store: Arc<dyn ReminderStore>, policy: Arc<dyn WritePolicy>) -> Self {
        Self { store, policy }
    }

    /// Create each item in `items`. Failures are keyed by input index.
    pub fn create_many(&self, items: Vec<Value>) -> Result<BatchOutcome> {
        let names = list_names(&self.store.lists()?);
        let mut outcome = BatchOutcome::default();

        for (index, raw) in items.into_iter().enumerate() {
            match self.create_one(raw) {
                Ok((reminder, list)) => {
                    tracing::info!(index, id = %reminder.id, list = %list.name, "created reminder");
                    let name = names
                        .get(&reminder.list_id)
                        .map(String::as_str)
                        .unwrap_or(list.name.as_str());
                    outcome
                        .succeeded
                        .push(Value::Object(reminder_to_wire(&reminder, Some(name))));
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "reminder create failed");
                    outcome.fail("index", json!(index), &e);
                }
            }
        }
        Ok(outcome)
    }

    fn create_one(&self, raw: Value) -> Result<(Reminder, ReminderList)> {
        let item: CreateItem = parse_item(raw)?;
        let title = item.title.trim();
        if title.is_empty() {
            return Err(RemkitError::Validation("title cannot be empty".into()));
        }

        let list = resolve_for_write(self.store.as_ref(), item.list.as_ref())?;
        self.check_policy(&list.name)?;

        let mut reminder = self.store.new_reminder(&list)?;
        reminder.title = title.to_owned();
        reminder.notes = item.notes;
        if let Some(p) = item.priority {
            reminder.priority = p.parse::<Priority>()?.to_internal();
        }
        if let Some(due) = item.due_date {
            let parsed = parse_date(&due)?;
            reminder.due_date = Some(parsed.value);
            reminder.due_date_includes_time = parsed.includes_time;
        }
        if let Some(url) = item.url {
            reminder.url = Some(parse_url(&url)?);
        }
        if let Some(alarms) = item.alarms {
            reminder.alarms = alarms_from_wire(alarms)?;
        }
        if let Some(rule) = item.recurrence {
            reminder.recurrence_rules = vec![rule.into_rule()?];
        }
        if item.completed == Some(true) {
            reminder.completion_date = Some(now());
        }

        let saved = self.store.save(&reminder)?;
        Ok((saved, list))
    }

    /// Apply each patch in `items`. Failures are keyed by reminder id.
    pub fn update_many(&self, items: Vec<Value>) -> Result<BatchOutcome> {
        let names = list_names(&self.store.lists()?);
        let mut outcome = BatchOutcome::default();

        for raw in items {
            let id = raw.get("id").cloned().unwrap_or(Value::Null);
            match self.update_one(raw, &names) {
                Ok(reminder) => {
                    tracing::info!(id = %reminder.id, "updated reminder");
                    let name = names.get(&reminder.list_id).map(String::as_str);
                    outcome
                        .succeeded
                        .push(Value::Object(reminder_to_wire(&reminder, name)));
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "reminder update failed");
                    outcome.fail("id", id, &e);
                }
            }
        }
        Ok(outcome)
    }

    fn update_one(&self, raw: Value, names: &HashMap<String, String>) -> Result<Reminder> {
        let item: UpdateItem = parse_item(raw)?;
        let mut reminder = self
            .store
            .get(&item.id)?
            .ok_or_else(|| RemkitError::ReminderNotFound(item.id.clone()))?;

        self.check_policy(current_list_name(names, &reminder))?;

        // An empty selector on update leaves the reminder where it is.
        if let Some(selector) = item.list.as_ref().filter(|s| !s.is_unset()) {
            let destination = resolve_for_write(self.store.as_ref(), Some(selector))?;
            if destination.id != reminder.list_id {
                self.check_policy(&destination.name)?;
                reminder.list_id = destination.id;
            }
        }

        match item.title {
            Patch::Omitted => {}
            Patch::Clear => {
                return Err(RemkitError::Validation("title cannot be cleared".into()));
            }
            Patch::Value(title) => {
                let title = title.trim();
                if title.is_empty() {
                    return Err(RemkitError::Validation("title cannot be empty".into()));
                }
                reminder.title = title.to_owned();
            }
        }

        item.notes.apply_to(&mut reminder.notes);

        match item.priority {
            Patch::Omitted => {}
            Patch::Clear => reminder.priority = Priority::None.to_internal(),
            Patch::Value(p) => reminder.priority = p.parse::<Priority>()?.to_internal(),
        }

        match item.due_date.try_map(|s| parse_date(&s))? {
            Patch::Omitted => {}
            Patch::Clear => {
                reminder.due_date = None;
                reminder.due_date_includes_time = false;
            }
            Patch::Value(parsed) => {
                reminder.due_date = Some(parsed.value);
                reminder.due_date_includes_time = parsed.includes_time;
            }
        }

        item.url
            .try_map(|u| parse_url(&u))?
            .apply_to(&mut reminder.url);

        match item.alarms {
            Patch::Omitted => {}
            Patch::Clear => reminder.alarms.clear(),
            Patch::Value(alarms) => reminder.alarms = alarms_from_wire(alarms)?,
        }

        match item.recurrence {
            Patch::Omitted => {}
            Patch::Clear => reminder.recurrence_rules.clear(),
            Patch::Value(rule) => reminder.recurrence_rules = vec![rule.into_rule()?],
        }

        if item.completion_date.is_omitted() {
            match item.completed {
                Some(true) if !reminder.is_completed() => reminder.completion_date = Some(now()),
                Some(false) => reminder.completion_date = None,
                _ => {}
            }
        } else {
            item.completion_date
                .try_map(|s| parse_date(&s).map(|d| d.value))?
                .apply_to(&mut reminder.completion_date);
        }

        Ok(self.store.save(&reminder)?)
    }

    /// Delete each id in `ids`. Failures are keyed by id.
    pub fn delete_many(&self, ids: Vec<String>) -> Result<BatchOutcome> {
        let names = list_names(&self.store.lists()?);
        let mut outcome = BatchOutcome::default();

        for id in ids {
            match self.delete_one(&id, &names) {
                Ok(()) => {
                    tracing::info!(id = %id, "deleted reminder");
                    outcome.succeeded.push(json!(id));
                }
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "reminder delete failed");
                    outcome.fail("id", json!(id), &e);
                }
            }
        }
        Ok(outcome)
    }

    fn delete_one(&self, id: &str, names: &HashMap<String, String>) -> Result<()> {
        let reminder = self
            .store
            .get(id)?
            .ok_or_else(|| RemkitError::ReminderNotFound(id.to_owned()))?;
        self.check_policy(current_list_name(names, &reminder))?;
        Ok(self.store.delete(&reminder)?)
    }

    fn check_policy(&self, list_name: &str) -> Result<()> {
        if self.policy.allows(list_name) {
            Ok(())
        } else {
            Err(RemkitError::PolicyViolation(format!(
                "writes to list '{list_name}' are not permitted"
            )))
        }
    }
}

/// Name of the list a stored reminder lives in. An orphaned reminder is
/// checked under an empty name, which restrictive policies reject.
fn current_list_name<'a>(names: &'a HashMap<String, String>, reminder: &Reminder) -> &'a str {
    names.get(&reminder.list_id).map(String::as_str).unwrap_or("")
}

fn parse_item<T: for<'de> Deserialize<'de>>(raw: Value) -> Result<T> {
    serde_json::from_value(raw).map_err(|e| RemkitError::Validation(format!("invalid item: {e}")))
}
