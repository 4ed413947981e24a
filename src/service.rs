//! The operations exposed to tool-calling clients.
//!
//! Requests and results are plain JSON values so a transport only has to
//! route them.

use std::sync::Arc;

use serde_json::Value;

use crate::config::{RemkitConfig, StoreBackend};
use crate::error::{RemkitError, Result};
use crate::mutation::{MutationEngine, WritePolicy};
use crate::query::{QueryEngine, QueryLimits, QueryRequest};
use crate::store::{FileReminderStore, MockReminderStore, ReminderStore};

/// Query, list and batch-mutation operations over one reminder store.
pub struct RemindersService {
    store: Arc<dyn ReminderStore>,
    policy: Arc<dyn WritePolicy>,
    query: QueryEngine,
    mutation: MutationEngine,
}

impl RemindersService {
    pub fn new(
        store: Arc<dyn ReminderStore>,
        policy: Arc<dyn WritePolicy>,
        limits: QueryLimits,
    ) -> Self {
        Self {
            query: QueryEngine::new(Arc::clone(&store), limits),
            mutation: MutationEngine::new(Arc::clone(&store), Arc::clone(&policy)),
            store,
            policy,
        }
    }

    /// Build the service described by `config`, opening its store backend.
    pub fn from_config(config: &RemkitConfig) -> Result<Self> {
        config.validate()?;
        let store: Arc<dyn ReminderStore> = match config.store.backend {
            StoreBackend::File => {
                let path = config.store.resolved_path();
                tracing::info!(path = %path.display(), "using file reminder store");
                Arc::new(FileReminderStore::new(
                    path,
                    config.store.default_list_name.as_str(),
                ))
            }
            StoreBackend::Memory => {
                tracing::info!("using in-memory reminder store");
                Arc::new(MockReminderStore::with_default_list(
                    &config.store.default_list_name,
                ))
            }
        };
        Ok(Self::new(store, config.policy.build(), config.query.limits()))
    }

    /// Run a read request (`list`, `status`, `search`, `dateFrom`, `dateTo`,
    /// `query`, `sortBy`, `limit`, `outputDetail`).
    pub fn query(&self, request: Value) -> Result<Value> {
        let request: QueryRequest = match request {
            Value::Null => QueryRequest::default(),
            other => serde_json::from_value(other)
                .map_err(|e| RemkitError::Validation(format!("invalid query request: {e}")))?,
        };
        self.query.run(&request)
    }

    /// Every list as `{id, name, isDefault}`.
    pub fn list_lists(&self) -> Result<Value> {
        let lists = self.store.lists()?;
        Ok(Value::Array(lists.iter().map(|l| l.to_wire()).collect()))
    }

    /// Create a list. The write policy applies to the new name.
    pub fn create_list(&self, name: &str) -> Result<Value> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RemkitError::Validation("list name cannot be empty".into()));
        }
        if !self.policy.allows(name) {
            return Err(RemkitError::PolicyViolation(format!(
                "creating list '{name}' is not permitted"
            )));
        }
        let list = self.store.create_list(name)?;
        tracing::info!(id = %list.id, name = %list.name, "created list");
        Ok(list.to_wire())
    }

    /// Bare array when every item succeeded, else `{created, failed}`.
    pub fn create_many(&self, items: Vec<Value>) -> Result<Value> {
        Ok(self.mutation.create_many(items)?.into_wire("created"))
    }

    /// Bare array when every item succeeded, else `{updated, failed}`.
    pub fn update_many(&self, items: Vec<Value>) -> Result<Value> {
        Ok(self.mutation.update_many(items)?.into_wire("updated"))
    }

    /// Always `{deleted, failed}`.
    pub fn delete_many(&self, ids: Vec<String>) -> Result<Value> {
        Ok(self.mutation.delete_many(ids)?.into_object("deleted"))
    }
}
