//! Storage contract for reminder lists and reminders.
//!
//! The engines only ever talk to a [`ReminderStore`]. Two implementations
//! exist:
//! - [`FileReminderStore`] in [`file`], the live backend persisting a JSON
//!   document on disk
//! - [`MockReminderStore`] in [`mock`], an in-memory double for tests
//!
//! Both share the list/reminder bookkeeping in [`StoreSnapshot`] so they
//! agree on default-list handling, timestamps and not-found behavior.

pub mod file;
pub mod mock;

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Reminder, ReminderList};

pub use file::FileReminderStore;
pub use mock::MockReminderStore;

/// Which reminders a fetch returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Incomplete,
    Completed,
    All,
}

impl FetchStatus {
    pub fn matches(self, reminder: &Reminder) -> bool {
        match self {
            FetchStatus::Incomplete => !reminder.is_completed(),
            FetchStatus::Completed => reminder.is_completed(),
            FetchStatus::All => true,
        }
    }
}

/// Error type for reminder store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reminder with the given identifier was not found.
    NotFound(String),
    /// The store rejected the input (unknown list, duplicate list name).
    InvalidInput(String),
    /// Unexpected error from the underlying store.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "reminder not found: {id}"),
            StoreError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            StoreError::Backend(msg) => write!(f, "store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Abstraction over the reminders backend.
///
/// Implementations must keep exactly one default list once any list exists,
/// stamp `creation_date` on first save and `last_modified` on every save.
pub trait ReminderStore: Send + Sync {
    /// All lists, in backend order.
    fn lists(&self) -> Result<Vec<ReminderList>, StoreError>;

    /// The default list, if the store has one.
    fn default_list(&self) -> Result<Option<ReminderList>, StoreError>;

    /// Create a new list. Names are unique case-insensitively.
    fn create_list(&self, name: &str) -> Result<ReminderList, StoreError>;

    /// Reminders in any of `lists` matching `status`.
    fn fetch(
        &self,
        lists: &[ReminderList],
        status: FetchStatus,
    ) -> Result<Vec<Reminder>, StoreError>;

    /// A single reminder by identifier.
    fn get(&self, id: &str) -> Result<Option<Reminder>, StoreError>;

    /// An unsaved reminder with a fresh identifier, owned by `list`.
    fn new_reminder(&self, list: &ReminderList) -> Result<Reminder, StoreError>;

    /// Insert or replace `reminder`, returning the stored record.
    fn save(&self, reminder: &Reminder) -> Result<Reminder, StoreError>;

    /// Permanently remove `reminder`.
    fn delete(&self, reminder: &Reminder) -> Result<(), StoreError>;
}

/// Current time as stored by the backends.
pub(crate) fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

/// Lists and reminders held by a backend, with the shared bookkeeping rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub lists: Vec<ReminderList>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

impl StoreSnapshot {
    pub fn default_list(&self) -> Option<&ReminderList> {
        self.lists.iter().find(|l| l.is_default)
    }

    /// Add a list with identifier `id`. The first list becomes the default.
    pub fn create_list(&mut self, id: String, name: &str) -> Result<ReminderList, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput(
                "list name cannot be empty".to_owned(),
            ));
        }
        if self.lists.iter().any(|l| l.name_matches(name)) {
            return Err(StoreError::InvalidInput(format!(
                "a list named '{name}' already exists"
            )));
        }
        let list = ReminderList {
            id,
            name: name.to_owned(),
            is_default: self.default_list().is_none(),
        };
        self.lists.push(list.clone());
        Ok(list)
    }

    pub fn fetch(&self, lists: &[ReminderList], status: FetchStatus) -> Vec<Reminder> {
        self.reminders
            .iter()
            .filter(|r| lists.iter().any(|l| l.id == r.list_id))
            .filter(|r| status.matches(r))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Reminder> {
        self.reminders.iter().find(|r| r.id == id).cloned()
    }

    /// Insert or replace, stamping backend-owned timestamps.
    pub fn upsert(
        &mut self,
        reminder: &Reminder,
        at: DateTime<FixedOffset>,
    ) -> Result<Reminder, StoreError> {
        if !self.lists.iter().any(|l| l.id == reminder.list_id) {
            return Err(StoreError::InvalidInput(format!(
                "unknown list id '{}'",
                reminder.list_id
            )));
        }

        let mut stored = reminder.clone();
        stored.last_modified = Some(at);

        match self.reminders.iter_mut().find(|r| r.id == reminder.id) {
            Some(existing) => {
                // Creation time is backend-owned and never rewritten by callers.
                stored.creation_date = existing.creation_date.or(Some(at));
                *existing = stored.clone();
            }
            None => {
                stored.creation_date = stored.creation_date.or(Some(at));
                self.reminders.push(stored.clone());
            }
        }
        Ok(stored)
    }

    pub fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.id != id);
        if self.reminders.len() == before {
            return Err(StoreError::NotFound(id.to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn snapshot_with_list() -> StoreSnapshot {
        let mut snap = StoreSnapshot::default();
        snap.create_list("list-1".into(), "Personal").unwrap();
        snap
    }

    #[test]
    fn first_list_becomes_default() {
        let mut snap = snapshot_with_list();
        let second = snap.create_list("list-2".into(), "Work").unwrap();
        assert!(!second.is_default);
        assert_eq!(snap.default_list().unwrap().id, "list-1");
        assert_eq!(snap.lists.iter().filter(|l| l.is_default).count(), 1);
    }

    #[test]
    fn duplicate_list_names_rejected() {
        let mut snap = snapshot_with_list();
        let err = snap.create_list("list-2".into(), "personal").unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
    }

    #[test]
    fn duplicate_non_ascii_list_names_rejected() {
        let mut snap = snapshot_with_list();
        snap.create_list("list-2".into(), "Éphémères").unwrap();
        let err = snap.create_list("list-3".into(), "ÉPHÉMÈRES").unwrap_err();
        assert!(matches!(err, StoreError::InvalidInput(_)));
        assert_eq!(snap.lists.len(), 2);
    }

    #[test]
    fn upsert_stamps_timestamps_and_keeps_creation() {
        let mut snap = snapshot_with_list();
        let t1 = DateTime::parse_from_rfc3339("2026-01-01T00:00:00+00:00").unwrap();
        let t2 = DateTime::parse_from_rfc3339("2026-01-02T00:00:00+00:00").unwrap();

        let mut r = Reminder::draft("rem-1", "list-1");
        r.title = "Buy milk".into();
        let stored = snap.upsert(&r, t1).unwrap();
        assert_eq!(stored.creation_date, Some(t1));
        assert_eq!(stored.last_modified, Some(t1));

        let mut edited = stored.clone();
        edited.creation_date = None;
        edited.title = "Buy oat milk".into();
        let stored = snap.upsert(&edited, t2).unwrap();
        assert_eq!(stored.creation_date, Some(t1));
        assert_eq!(stored.last_modified, Some(t2));
        assert_eq!(snap.reminders.len(), 1);
    }

    #[test]
    fn upsert_into_unknown_list_fails() {
        let mut snap = snapshot_with_list();
        let r = Reminder::draft("rem-1", "nope");
        assert!(matches!(
            snap.upsert(&r, now()),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn fetch_filters_by_list_and_status() {
        let mut snap = snapshot_with_list();
        let work = snap.create_list("list-2".into(), "Work").unwrap();
        let mut open = Reminder::draft("rem-1", "list-1");
        open.title = "open".into();
        let mut done = Reminder::draft("rem-2", "list-1");
        done.completion_date = Some(now());
        let other = Reminder::draft("rem-3", "list-2");
        for r in [&open, &done, &other] {
            snap.upsert(r, now()).unwrap();
        }

        let personal = snap.lists[0].clone();
        let incomplete = snap.fetch(std::slice::from_ref(&personal), FetchStatus::Incomplete);
        assert_eq!(incomplete.len(), 1);
        assert_eq!(incomplete[0].id, "rem-1");

        let completed = snap.fetch(std::slice::from_ref(&personal), FetchStatus::Completed);
        assert_eq!(completed.len(), 1);

        let everything = snap.fetch(&[personal, work], FetchStatus::All);
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let mut snap = snapshot_with_list();
        assert_eq!(
            snap.remove("ghost"),
            Err(StoreError::NotFound("ghost".into()))
        );
    }
}
