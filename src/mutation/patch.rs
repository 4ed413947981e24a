//! Tri-state update fields.

use serde::{Deserialize, Deserializer};

/// An update field: key absent, explicit `null`, or a value.
///
/// Use with `#[serde(default)]` so a missing key stays [`Patch::Omitted`];
/// serde only calls [`Deserialize`] when the key is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Omitted,
    Clear,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_omitted(&self) -> bool {
        matches!(self, Patch::Omitted)
    }

    /// Convert the carried value, keeping the tri-state.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Patch<U>, E> {
        Ok(match self {
            Patch::Omitted => Patch::Omitted,
            Patch::Clear => Patch::Clear,
            Patch::Value(v) => Patch::Value(f(v)?),
        })
    }

    /// Apply to an optional slot: omit keeps, clear empties, value replaces.
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Patch::Omitted => {}
            Patch::Clear => *slot = None,
            Patch::Value(v) => *slot = Some(v),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            None => Patch::Clear,
            Some(v) => Patch::Value(v),
        })
    }
}
