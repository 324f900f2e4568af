//! Per-document extraction output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Canonical "field not determined" marker shared by every extraction path.
pub const NOT_MENTIONED: &str = "Not Mentioned";

/// Whether a field value still needs resolving.
///
/// Absent, empty and the sentinel are all equivalent.
#[must_use]
pub fn is_unresolved(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => v.trim().is_empty() || v == NOT_MENTIONED,
    }
}

/// Ordered mapping from field name to value.
///
/// Iteration and serialization follow field declaration order, and the
/// whole thing serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    fields: IndexMap<String, String>,
}

impl ExtractionResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field's value, keeping the original position if it already
    /// exists.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn is_resolved(&self, name: &str) -> bool {
        !is_unresolved(self.get(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Names of fields whose value is still unresolved, in order.
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, v)| is_unresolved(Some(*v)))
            .map(|(k, _)| k)
    }
}

impl FromIterator<(String, String)> for ExtractionResult {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
