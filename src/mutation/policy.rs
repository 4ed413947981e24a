//! Write policy: which lists a mutation may touch.

use crate::model::list_names_match;

/// A pure predicate over the target list name, consulted before every write.
pub trait WritePolicy: Send + Sync {
    fn allows(&self, list_name: &str) -> bool;
}

/// Permits writes to every list.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl WritePolicy for AllowAll {
    fn allows(&self, _list_name: &str) -> bool {
        true
    }
}

/// Permits writes only to the named lists (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct SandboxPolicy {
    allowed: Vec<String>,
}

impl SandboxPolicy {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed
                .into_iter()
                .map(|s| s.into().trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }
}

impl WritePolicy for SandboxPolicy {
    fn allows(&self, list_name: &str) -> bool {
        self.allowed.iter().any(|a| list_names_match(a, list_name))
    }
}

impl<F> WritePolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn allows(&self, list_name: &str) -> bool {
        self(list_name)
    }
}
