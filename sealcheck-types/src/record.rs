//! Private records: the hidden half of an instance.
//!
//! A record is a map of private fields plus the private methods that may
//! touch them. Methods receive the mutable field map as implicit context,
//! so the identity of the owning instance never has to be threaded through.
//!
//! Inheritance is modeled as composition: a derived record embeds its base
//! record and forwards unknown method calls downward. A base method only
//! ever sees base fields; the derived level cannot reach into them either.

use crate::{AccessError, AccessResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Named dynamic fields, ordered for stable enumeration.
pub type FieldMap = BTreeMap<String, Value>;

/// A private method bound to a record level.
///
/// The first argument is the field map of the level that defined the
/// method; the second is the caller-supplied argument list.
pub type PrivateMethod =
    Arc<dyn Fn(&mut FieldMap, &[Value]) -> AccessResult<Value> + Send + Sync>;

/// Private state owned by exactly one instance.
#[derive(Clone, Default)]
pub struct PrivateRecord {
    fields: FieldMap,
    methods: BTreeMap<String, PrivateMethod>,
    base: Option<Box<PrivateRecord>>,
}

impl PrivateRecord {
    /// Creates a record over the given fields, with no methods and no base.
    #[must_use]
    pub fn new(fields: FieldMap) -> Self {
        Self {
            fields,
            methods: BTreeMap::new(),
            base: None,
        }
    }

    /// Returns a field of this level.
    pub fn field(&self, name: &str) -> AccessResult<&Value> {
        self.fields
            .get(name)
            .ok_or_else(|| AccessError::UnknownField(name.to_string()))
    }

    /// Sets or replaces a field of this level.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Returns the field names of this level in stable order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Registers a private method on this level, replacing any previous
    /// method with the same name.
    pub fn insert_method(&mut self, name: impl Into<String>, method: PrivateMethod) {
        self.methods.insert(name.into(), method);
    }

    /// Returns the method names of this level in stable order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Invokes a method by name.
    ///
    /// Resolution walks this level first, then the base chain, so a derived
    /// method shadows a base method of the same name. Fails with
    /// [`AccessError::UnknownAccessor`] when no level defines the name.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> AccessResult<Value> {
        if let Some(method) = self.methods.get(name).cloned() {
            return method(&mut self.fields, args);
        }
        match &mut self.base {
            Some(base) => base.invoke(name, args),
            None => Err(AccessError::UnknownAccessor(name.to_string())),
        }
    }

    /// Attaches a base record, replacing any existing one.
    pub fn set_base(&mut self, base: PrivateRecord) {
        self.base = Some(Box::new(base));
    }

    /// Returns the base record, if any.
    #[must_use]
    pub fn base(&self) -> Option<&PrivateRecord> {
        self.base.as_deref()
    }

    /// Total number of fields across this level and every base level.
    #[must_use]
    pub fn depth_field_count(&self) -> usize {
        self.fields.len() + self.base.as_ref().map_or(0, |b| b.depth_field_count())
    }
}

impl fmt::Debug for PrivateRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateRecord")
            .field("fields", &self.fields)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("base", &self.base)
            .finish()
    }
}
