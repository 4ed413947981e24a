//! Read pipeline: resolve → fetch → text filter → date filter → projection or
//! sort/limit/shape.

pub mod projection;
pub mod shape;

pub use shape::{OutputDetail, ShapeContext};

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RemkitError, Result};
use crate::mapping::{Priority, parse_range_bound, reminder_to_wire};
use crate::model::{Reminder, ReminderList};
use crate::resolver::{ListSelector, resolve_for_read};
use crate::store::{FetchStatus, ReminderStore};

/// Result ordering when no projection expression is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Creation time, newest first.
    #[default]
    Newest,
    /// Creation time, oldest first.
    Oldest,
    /// High, medium, low, none.
    Priority,
    /// Soonest due first; undated last.
    DueDate,
}

/// A read request as it arrives on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRequest {
    pub list: Option<ListSelector>,
    pub status: FetchStatus,
    pub search: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// jq projection expression evaluated over the full field set.
    pub query: Option<String>,
    pub sort_by: SortBy,
    pub limit: Option<i64>,
    pub output_detail: OutputDetail,
}

/// Result-size bounds applied to every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 200,
        }
    }
}

impl QueryLimits {
    /// Effective limit for a request: the default when absent, capped at
    /// `max_limit`. Non-positive limits are rejected.
    pub fn effective(&self, requested: Option<i64>) -> Result<usize> {
        match requested {
            None => Ok(self.default_limit.min(self.max_limit)),
            Some(n) if n < 1 => Err(RemkitError::Validation(format!(
                "limit must be at least 1, got {n}"
            ))),
            Some(n) => Ok(usize::try_from(n)
                .unwrap_or(usize::MAX)
                .min(self.max_limit)),
        }
    }
}

/// Inclusive date window; either side may be open.
#[derive(Debug, Clone, Copy, Default)]
struct DateRange {
    from: Option<DateTime<FixedOffset>>,
    to: Option<DateTime<FixedOffset>>,
}

impl DateRange {
    fn parse(from: Option<&str>, to: Option<&str>) -> Result<Option<Self>> {
        let from = non_blank(from);
        let to = non_blank(to);
        if from.is_none() && to.is_none() {
            return Ok(None);
        }
        Ok(Some(Self {
            from: from.map(|s| parse_range_bound(s, false)).transpose()?,
            to: to.map(|s| parse_range_bound(s, true)).transpose()?,
        }))
    }

    /// Due date for open items, completion date for completed ones. Items
    /// without the relevant date never match.
    fn contains(&self, reminder: &Reminder) -> bool {
        let relevant = if reminder.is_completed() {
            reminder.completion_date
        } else {
            reminder.due_date
        };
        let Some(at) = relevant else {
            return false;
        };
        self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at <= to)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Executes read requests against a reminder store.
pub struct QueryEngine {
    store: Arc<dyn ReminderStore>,
    limits: QueryLimits,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn ReminderStore>, limits: QueryLimits) -> Self {
        Self { store, limits }
    }

    /// Run `request` and return the shaped items, or the projection result.
    pub fn run(&self, request: &QueryRequest) -> Result<Value> {
        let limit = self.limits.effective(request.limit)?;
        let range = DateRange::parse(request.date_from.as_deref(), request.date_to.as_deref())?;

        let lists = resolve_for_read(self.store.as_ref(), request.list.as_ref())?;
        let names: HashMap<&str, &str> = lists
            .iter()
            .map(|l| (l.id.as_str(), l.name.as_str()))
            .collect();

        let mut items = self.store.fetch(&lists, request.status)?;
        tracing::debug!(
            list_count = lists.len(),
            fetched = items.len(),
            status = ?request.status,
            "query fetched reminders"
        );

        if let Some(needle) = non_blank(request.search.as_deref()) {
            let needle = needle.to_lowercase();
            items.retain(|r| matches_text(r, &needle));
            tracing::debug!(remaining = items.len(), "query applied text filter");
        }

        if let Some(range) = range {
            items.retain(|r| range.contains(r));
            tracing::debug!(remaining = items.len(), "query applied date filter");
        }

        if let Some(expression) = non_blank(request.query.as_deref()) {
            return self.project(expression, &items, &names, limit);
        }

        sort_reminders(&mut items, request.sort_by);
        items.truncate(limit);

        let ctx = ShapeContext {
            include_list_name: request.list.as_ref().is_some_and(ListSelector::is_all),
            include_completion: request.status == FetchStatus::All,
        };
        let shaped = items
            .iter()
            .map(|r| {
                let full = reminder_to_wire(r, list_name(&names, r));
                shape::shape(full, request.output_detail, ctx)
            })
            .collect();
        Ok(Value::Array(shaped))
    }

    fn project(
        &self,
        expression: &str,
        items: &[Reminder],
        names: &HashMap<&str, &str>,
        limit: usize,
    ) -> Result<Value> {
        let input = Value::Array(
            items
                .iter()
                .map(|r| Value::Object(reminder_to_wire(r, list_name(names, r))))
                .collect(),
        );
        let mut out = projection::evaluate(expression, input, limit)?;
        if let Value::Array(values) = &mut out {
            values.truncate(limit);
        }
        Ok(out)
    }
}

fn list_name<'a>(names: &HashMap<&str, &'a str>, reminder: &Reminder) -> Option<&'a str> {
    names.get(reminder.list_id.as_str()).copied()
}

fn matches_text(reminder: &Reminder, needle_lower: &str) -> bool {
    reminder.title.to_lowercase().contains(needle_lower)
        || reminder
            .notes
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(needle_lower))
}

/// Stable sort by the requested key.
pub fn sort_reminders(items: &mut [Reminder], sort_by: SortBy) {
    match sort_by {
        SortBy::Newest => items.sort_by(|a, b| b.creation_date.cmp(&a.creation_date)),
        SortBy::Oldest => items.sort_by(|a, b| a.creation_date.cmp(&b.creation_date)),
        SortBy::Priority => items.sort_by_key(|r| Priority::from_internal(r.priority).rank()),
        SortBy::DueDate => items.sort_by(|a, b| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }),
    }
}

/// Name lookup for a set of lists, used by callers rendering reminders
/// outside a query.
pub fn list_names(lists: &[ReminderList]) -> HashMap<String, String> {
    lists
        .iter()
        .map(|l| (l.id.clone(), l.name.clone()))
        .collect()
}
