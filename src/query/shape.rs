//! Output field-set presets for query results.
//!
//! Projection expressions bypass this module entirely and always see the full
//! field set.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field-set preset selected by `outputDetail`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputDetail {
    Minimal,
    #[default]
    Compact,
    Full,
}

const MINIMAL_FIELDS: &[&str] = &["id", "title"];

const COMPACT_FIELDS: &[&str] = &[
    "id",
    "title",
    "notes",
    "dueDate",
    "priority",
    "creationDate",
    "lastModifiedDate",
];

/// Which context-dependent fields a read still needs to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeContext {
    /// The read spanned every list, so each item's list is not implied.
    pub include_list_name: bool,
    /// The read mixed completed and incomplete items.
    pub include_completion: bool,
}

/// Reduce a full-field reminder object to the requested preset.
///
/// `minimal` and `compact` drop null values and the context-dependent fields
/// the caller already knows; `full` returns every key, nulls included.
pub fn shape(full: Map<String, Value>, detail: OutputDetail, ctx: ShapeContext) -> Value {
    let base = match detail {
        OutputDetail::Full => return Value::Object(full),
        OutputDetail::Minimal => MINIMAL_FIELDS,
        OutputDetail::Compact => COMPACT_FIELDS,
    };

    let mut keep: Vec<&str> = base.to_vec();
    if ctx.include_list_name {
        keep.push("listName");
    }
    if ctx.include_completion {
        keep.push("isCompleted");
    }

    let mut full = full;
    let mut out = Map::new();
    for key in keep {
        if let Some(value) = full.remove(key)
            && !value.is_null()
        {
            out.insert(key.to_owned(), value);
        }
    }
    Value::Object(out)
}
