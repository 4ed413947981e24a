//! remkit: a query-and-mutation engine over a reminder store.
//!
//! Tool-calling clients read and write reminders through a small set of
//! JSON operations exposed by [`RemindersService`]:
//!
//! - **Reads** resolve a list selector, fetch by status, filter by text and
//!   date range, then either evaluate a jq projection or sort, limit and
//!   shape the results.
//! - **Writes** create, update (with tri-state fields) and delete reminders in
//!   batches, reporting per-item failures without aborting the batch.
//!
//! Storage sits behind the [`store::ReminderStore`] trait; the
//! `remkit-host` binary serves the operations over newline-delimited JSON on
//! stdin/stdout.

pub mod config;
pub mod error;
pub mod host;
pub mod mapping;
pub mod model;
pub mod mutation;
pub mod query;
pub mod remkit_dirs;
pub mod resolver;
pub mod service;
pub mod store;

pub use config::RemkitConfig;
pub use error::{RemkitError, Result};
pub use service::RemindersService;
