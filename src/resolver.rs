//! List selector resolution.
//!
//! A selector names lists by `id`, by `name` (case-insensitive exact match) or
//! with `all: true`. Reads accept any one of the three; writes accept `id` or
//! `name` only. No selector, or one with nothing set, means the default list.

use serde::{Deserialize, Serialize};

use crate::error::{RemkitError, Result};
use crate::model::ReminderList;
use crate::store::ReminderStore;

/// Wire selector: `{"id": ...}`, `{"name": ...}` or `{"all": true}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSelector {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub all: bool,
}

/// A selector after the exclusivity check.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target<'a> {
    Default,
    All,
    Id(&'a str),
    Name(&'a str),
}

impl ListSelector {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// `true` when the selector targets every list.
    pub fn is_all(&self) -> bool {
        self.all
    }

    /// `true` when no field is set once blanks are ignored.
    pub fn is_unset(&self) -> bool {
        matches!(self.target(), Ok(Target::Default))
    }

    fn target(&self) -> Result<Target<'_>> {
        let id = self.id.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let name = self.name.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let set = usize::from(id.is_some()) + usize::from(name.is_some()) + usize::from(self.all);
        if set > 1 {
            return Err(RemkitError::AmbiguousSelector(
                "list selector must set only one of id, name or all".to_owned(),
            ));
        }

        Ok(match (id, name, self.all) {
            (Some(id), _, _) => Target::Id(id),
            (_, Some(name), _) => Target::Name(name),
            (_, _, true) => Target::All,
            _ => Target::Default,
        })
    }
}

/// Resolve a read selector to one or more lists.
pub fn resolve_for_read(
    store: &dyn ReminderStore,
    selector: Option<&ListSelector>,
) -> Result<Vec<ReminderList>> {
    let target = match selector {
        Some(selector) => selector.target()?,
        None => Target::Default,
    };
    match target {
        Target::All => Ok(store.lists()?),
        other => resolve_single(store, other).map(|list| vec![list]),
    }
}

/// Resolve a write selector to exactly one list.
pub fn resolve_for_write(
    store: &dyn ReminderStore,
    selector: Option<&ListSelector>,
) -> Result<ReminderList> {
    let target = match selector {
        Some(selector) => selector.target()?,
        None => Target::Default,
    };
    if target == Target::All {
        return Err(RemkitError::InvalidSelector(
            "cannot target all lists for a write; select a list by id or name".to_owned(),
        ));
    }
    resolve_single(store, target)
}

fn resolve_single(store: &dyn ReminderStore, target: Target<'_>) -> Result<ReminderList> {
    match target {
        Target::Default => store.default_list()?.ok_or(RemkitError::NoDefaultList),
        Target::Id(id) => {
            let lists = store.lists()?;
            match lists.iter().find(|l| l.id == id) {
                Some(list) => Ok(list.clone()),
                None => Err(not_found(format!("id '{id}'"), &lists)),
            }
        }
        Target::Name(name) => {
            let lists = store.lists()?;
            match lists.iter().find(|l| l.name_matches(name)) {
                Some(list) => Ok(list.clone()),
                None => Err(not_found(format!("name '{name}'"), &lists)),
            }
        }
        Target::All => Err(RemkitError::InvalidSelector(
            "expected a single list".to_owned(),
        )),
    }
}

fn not_found(query: String, lists: &[ReminderList]) -> RemkitError {
    RemkitError::ListNotFound {
        query,
        available: lists.iter().map(|l| l.name.clone()).collect(),
    }
}
