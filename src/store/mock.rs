//! In-memory implementation of [`ReminderStore`].
//!
//! Used by tests and by the host when `store.backend = "memory"`. All state
//! lives behind a single mutex; identifiers are deterministic.

use std::sync::{Mutex, MutexGuard};

use crate::model::{Reminder, ReminderList};

use super::{FetchStatus, ReminderStore, StoreError, StoreSnapshot, now};

#[derive(Debug)]
struct MockState {
    snapshot: StoreSnapshot,
    next_id: u64,
    /// Saves of reminders with this title fail with a backend error.
    failing_title: Option<String>,
}

/// An in-memory reminder store for unit testing.
///
/// The seeded lists and reminders are taken verbatim, so a store without a
/// default list can be built to exercise that error path.
#[derive(Debug)]
pub struct MockReminderStore {
    state: Mutex<MockState>,
}

impl MockReminderStore {
    /// Create a mock store seeded with `lists` and `reminders`.
    pub fn new(lists: Vec<ReminderList>, reminders: Vec<Reminder>) -> Self {
        Self {
            state: Mutex::new(MockState {
                snapshot: StoreSnapshot { lists, reminders },
                next_id: 1000,
                failing_title: None,
            }),
        }
    }

    /// An empty store holding a single default list named `name`.
    pub fn with_default_list(name: &str) -> Self {
        Self::new(
            vec![ReminderList {
                id: "mock-list-1".to_owned(),
                name: name.to_owned(),
                is_default: true,
            }],
            vec![],
        )
    }

    /// Make every save of a reminder titled `title` fail, to exercise
    /// per-item backend failures.
    pub fn with_failing_title(self, title: &str) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.failing_title = Some(title.to_owned());
        }
        self
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> Result<StoreSnapshot, StoreError> {
        Ok(self.lock()?.snapshot.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MockState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("mock lock poisoned".to_owned()))
    }
}

impl MockState {
    fn next_id(&mut self, prefix: &str) -> String {
        let id = format!("{prefix}-{}", self.next_id);
        self.next_id += 1;
        id
    }
}

impl ReminderStore for MockReminderStore {
    fn lists(&self) -> Result<Vec<ReminderList>, StoreError> {
        Ok(self.lock()?.snapshot.lists.clone())
    }

    fn default_list(&self) -> Result<Option<ReminderList>, StoreError> {
        Ok(self.lock()?.snapshot.default_list().cloned())
    }

    fn create_list(&self, name: &str) -> Result<ReminderList, StoreError> {
        let mut state = self.lock()?;
        let id = state.next_id("mock-list");
        state.snapshot.create_list(id, name)
    }

    fn fetch(
        &self,
        lists: &[ReminderList],
        status: FetchStatus,
    ) -> Result<Vec<Reminder>, StoreError> {
        Ok(self.lock()?.snapshot.fetch(lists, status))
    }

    fn get(&self, id: &str) -> Result<Option<Reminder>, StoreError> {
        Ok(self.lock()?.snapshot.get(id))
    }

    fn new_reminder(&self, list: &ReminderList) -> Result<Reminder, StoreError> {
        let mut state = self.lock()?;
        let id = state.next_id("mock-rem");
        Ok(Reminder::draft(id, list.id.clone()))
    }

    fn save(&self, reminder: &Reminder) -> Result<Reminder, StoreError> {
        let mut state = self.lock()?;
        if state.failing_title.as_deref() == Some(reminder.title.as_str()) {
            return Err(StoreError::Backend(format!(
                "simulated save failure for '{}'",
                reminder.title
            )));
        }
        state.snapshot.upsert(reminder, now())
    }

    fn delete(&self, reminder: &Reminder) -> Result<(), StoreError> {
        self.lock()?.snapshot.remove(&reminder.id)
    }
}
