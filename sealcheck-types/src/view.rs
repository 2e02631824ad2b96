//! Public views: the externally visible attributes of an instance.
//!
//! Any holder of the instance may read and mutate these. The whole point of
//! the verifier is that nothing in here ever grants a path to the private
//! record.

use crate::record::FieldMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Externally visible attributes of an instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicView {
    fields: FieldMap,
}

impl PublicView {
    /// Creates a view over the given fields.
    #[must_use]
    pub fn new(fields: FieldMap) -> Self {
        Self { fields }
    }

    /// Returns a public field, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Sets or replaces a public field.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Returns true if the field is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the visible field names in stable order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of visible fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<FieldMap> for PublicView {
    fn from(fields: FieldMap) -> Self {
        Self::new(fields)
    }
}
