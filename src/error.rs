//! Error types for the remkit engine.
//!
//! Each error variant carries a stable error code (SCREAMING_SNAKE_CASE)
//! that is included in the Display output and accessible via [`RemkitError::code()`].
//! Codes are part of the wire contract: batch failure entries and host
//! responses expose them so callers can branch without parsing messages.

use crate::store::StoreError;

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// More than one of `id`/`name`/`all` set on a list selector.
    pub const AMBIGUOUS_SELECTOR: &str = "AMBIGUOUS_SELECTOR";

    /// Selector is well-formed but not allowed here (e.g. `all` on a write).
    pub const INVALID_SELECTOR: &str = "INVALID_SELECTOR";

    /// No list matched the selector.
    pub const LIST_NOT_FOUND: &str = "LIST_NOT_FOUND";

    /// No reminder with the given identifier.
    pub const REMINDER_NOT_FOUND: &str = "REMINDER_NOT_FOUND";

    /// A field has the wrong shape or an out-of-range value.
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

    /// A date or projection expression could not be parsed.
    pub const PARSE_ERROR: &str = "PARSE_ERROR";

    /// The injected write policy rejected the target list.
    pub const POLICY_VIOLATION: &str = "POLICY_VIOLATION";

    /// The store has no default list.
    pub const NO_DEFAULT_LIST: &str = "NO_DEFAULT_LIST";

    /// Opaque failure from the storage backend.
    pub const BACKEND_ERROR: &str = "BACKEND_ERROR";

    /// Invalid or unreadable configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// Filesystem or stdio failure.
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// Errors produced by the query and mutation engines.
///
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, thiserror::Error)]
pub enum RemkitError {
    #[error("[{}] {}", error_codes::AMBIGUOUS_SELECTOR, .0)]
    AmbiguousSelector(String),

    #[error("[{}] {}", error_codes::INVALID_SELECTOR, .0)]
    InvalidSelector(String),

    /// `available` lists every list name so the caller can retry.
    #[error(
        "[{}] no list matches {query}; available lists: {}",
        error_codes::LIST_NOT_FOUND,
        format_available(.available)
    )]
    ListNotFound {
        query: String,
        available: Vec<String>,
    },

    #[error("[{}] no reminder with id '{}'", error_codes::REMINDER_NOT_FOUND, .0)]
    ReminderNotFound(String),

    #[error("[{}] {}", error_codes::VALIDATION_ERROR, .0)]
    Validation(String),

    /// `input` is the offending text, echoed back verbatim.
    #[error("[{}] cannot parse '{input}': {reason}", error_codes::PARSE_ERROR)]
    Parse { input: String, reason: String },

    #[error("[{}] {}", error_codes::POLICY_VIOLATION, .0)]
    PolicyViolation(String),

    #[error("[{}] no default reminder list is configured", error_codes::NO_DEFAULT_LIST)]
    NoDefaultList,

    #[error("[{}] {}", error_codes::BACKEND_ERROR, .0)]
    Backend(String),

    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    Config(String),

    #[error("[{}] {}", error_codes::IO_ERROR, .0)]
    Io(#[from] std::io::Error),
}

fn format_available(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_owned()
    } else {
        names
            .iter()
            .map(|n| format!("'{n}'"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl RemkitError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AmbiguousSelector(_) => error_codes::AMBIGUOUS_SELECTOR,
            Self::InvalidSelector(_) => error_codes::INVALID_SELECTOR,
            Self::ListNotFound { .. } => error_codes::LIST_NOT_FOUND,
            Self::ReminderNotFound(_) => error_codes::REMINDER_NOT_FOUND,
            Self::Validation(_) => error_codes::VALIDATION_ERROR,
            Self::Parse { .. } => error_codes::PARSE_ERROR,
            Self::PolicyViolation(_) => error_codes::POLICY_VIOLATION,
            Self::NoDefaultList => error_codes::NO_DEFAULT_LIST,
            Self::Backend(_) => error_codes::BACKEND_ERROR,
            Self::Config(_) => error_codes::CONFIG_INVALID,
            Self::Io(_) => error_codes::IO_ERROR,
        }
    }

    /// Shorthand for a [`RemkitError::Parse`] error.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Render as the `{code, message}` object used in batch failure entries
    /// and host responses.
    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
        })
    }
}

impl From<StoreError> for RemkitError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => RemkitError::ReminderNotFound(id),
            StoreError::InvalidInput(msg) => RemkitError::Validation(msg),
            StoreError::Backend(msg) => RemkitError::Backend(msg),
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, RemkitError>;
