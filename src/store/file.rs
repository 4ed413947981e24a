//! JSON-file implementation of [`ReminderStore`].
//!
//! The whole store is one versioned JSON document. Every call reads the
//! document, applies the operation and, for mutations, writes it back through
//! a temp file and rename so a crash never leaves a half-written store. A
//! missing file is an empty store that gets seeded with the configured
//! default list on first access.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{Reminder, ReminderList};

use super::{FetchStatus, ReminderStore, StoreError, StoreSnapshot, now};

/// Current on-disk document version.
const STORE_VERSION: u8 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default = "default_store_version")]
    version: u8,
    #[serde(flatten)]
    snapshot: StoreSnapshot,
}

fn default_store_version() -> u8 {
    STORE_VERSION
}

/// A reminder store persisted as a JSON document at `path`.
#[derive(Debug, Clone)]
pub struct FileReminderStore {
    path: PathBuf,
    default_list_name: String,
}

impl FileReminderStore {
    pub fn new(path: impl Into<PathBuf>, default_list_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            default_list_name: default_list_name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoreSnapshot, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return self.seeded(StoreSnapshot::default());
            }
            Err(e) => {
                return Err(StoreError::Backend(format!(
                    "cannot read reminder store {}: {e}",
                    self.path.display()
                )));
            }
        };

        let document: StoreDocument = serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::Backend(format!(
                "cannot parse reminder store {}: {e}",
                self.path.display()
            ))
        })?;
        if document.version > STORE_VERSION {
            return Err(StoreError::Backend(format!(
                "reminder store {} has version {}; this build understands up to {STORE_VERSION}",
                self.path.display(),
                document.version
            )));
        }
        self.seeded(document.snapshot)
    }

    /// Give an empty store its default list and write it out, so the list id
    /// is stable across calls.
    fn seeded(&self, mut snapshot: StoreSnapshot) -> Result<StoreSnapshot, StoreError> {
        if snapshot.lists.is_empty() {
            tracing::info!(
                path = %self.path.display(),
                list = %self.default_list_name,
                "seeding empty reminder store with default list"
            );
            snapshot.create_list(new_id(), &self.default_list_name)?;
            self.persist(&snapshot)?;
        }
        Ok(snapshot)
    }

    fn persist(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Backend(format!("cannot create reminder store directory: {e}"))
            })?;
        }

        let document = StoreDocument {
            version: STORE_VERSION,
            snapshot: snapshot.clone(),
        };
        let json = serde_json::to_vec_pretty(&document)
            .map_err(|e| StoreError::Backend(format!("cannot serialize reminder store: {e}")))?;

        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, json).map_err(|e| {
            StoreError::Backend(format!("cannot write reminder store temp file: {e}"))
        })?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| StoreError::Backend(format!("cannot finalize reminder store: {e}")))?;
        Ok(())
    }

    /// Load, apply `op`, and persist if it succeeded.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut StoreSnapshot) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut snapshot = self.load()?;
        let out = op(&mut snapshot)?;
        self.persist(&snapshot)?;
        Ok(out)
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().to_uppercase()
}

impl ReminderStore for FileReminderStore {
    fn lists(&self) -> Result<Vec<ReminderList>, StoreError> {
        Ok(self.load()?.lists)
    }

    fn default_list(&self) -> Result<Option<ReminderList>, StoreError> {
        Ok(self.load()?.default_list().cloned())
    }

    fn create_list(&self, name: &str) -> Result<ReminderList, StoreError> {
        self.mutate(|snapshot| snapshot.create_list(new_id(), name))
    }

    fn fetch(
        &self,
        lists: &[ReminderList],
        status: FetchStatus,
    ) -> Result<Vec<Reminder>, StoreError> {
        Ok(self.load()?.fetch(lists, status))
    }

    fn get(&self, id: &str) -> Result<Option<Reminder>, StoreError> {
        Ok(self.load()?.get(id))
    }

    fn new_reminder(&self, list: &ReminderList) -> Result<Reminder, StoreError> {
        Ok(Reminder::draft(new_id(), list.id.clone()))
    }

    fn save(&self, reminder: &Reminder) -> Result<Reminder, StoreError> {
        self.mutate(|snapshot| snapshot.upsert(reminder, now()))
    }

    fn delete(&self, reminder: &Reminder) -> Result<(), StoreError> {
        self.mutate(|snapshot| snapshot.remove(&reminder.id))
    }
}
