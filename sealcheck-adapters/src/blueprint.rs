//! Class-like definitions shared by every strategy adapter.
//!
//! A [`Blueprint`] describes what instances of a definition look like: how
//! constructor arguments become private fields, which accessors exist, and
//! which base definition (if any) the definition derives from. Adapters
//! differ only in *where* they hide the private fields; the blueprint is
//! the strategy-independent part.

use sealcheck_types::{AccessError, AccessResult, FieldMap, PrivateMethod, PrivateRecord};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Maps constructor private args to one level's initial private fields.
pub type PrivateInit = Arc<dyn Fn(&FieldMap) -> FieldMap + Send + Sync>;

/// A named accessor: the public method through which private state is
/// reached.
#[derive(Clone)]
pub struct AccessorDef {
    name: String,
    body: PrivateMethod,
}

impl AccessorDef {
    /// Creates an accessor with a free-form body.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut FieldMap, &[Value]) -> AccessResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            body: Arc::new(body),
        }
    }

    /// Creates a read accessor returning the named private field.
    pub fn getter(name: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(name, move |fields, _args| {
            fields
                .get(&field)
                .cloned()
                .ok_or_else(|| AccessError::UnknownField(field.clone()))
        })
    }

    /// Creates a write accessor storing its first argument into the named
    /// private field.
    pub fn setter(name: impl Into<String>, field: impl Into<String>) -> Self {
        let name = name.into();
        let field = field.into();
        let accessor = name.clone();
        Self::new(name, move |fields, args| {
            let value = args.first().cloned().ok_or_else(|| {
                AccessError::MissingArgument {
                    accessor: accessor.clone(),
                    index: 0,
                }
            })?;
            fields.insert(field.clone(), value);
            Ok(Value::Null)
        })
    }

    /// The accessor's public name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A shared handle to the accessor body.
    #[must_use]
    pub fn body(&self) -> PrivateMethod {
        Arc::clone(&self.body)
    }
}

impl fmt::Debug for AccessorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorDef").field("name", &self.name).finish()
    }
}

/// A class-like definition: private-field initializer, accessor set, and
/// an optional base definition.
#[derive(Clone)]
pub struct Blueprint {
    name: String,
    init: Option<PrivateInit>,
    accessors: Vec<AccessorDef>,
    base: Option<Arc<Blueprint>>,
}

impl Blueprint {
    /// Creates an empty definition. Without an initializer, constructor
    /// private args become this level's private fields unchanged.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            init: None,
            accessors: Vec::new(),
            base: None,
        }
    }

    /// Sets the private-field initializer for this level.
    #[must_use]
    pub fn with_init<F>(mut self, init: F) -> Self
    where
        F: Fn(&FieldMap) -> FieldMap + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(init));
        self
    }

    /// Adds an accessor to this level.
    #[must_use]
    pub fn with_accessor(mut self, accessor: AccessorDef) -> Self {
        self.accessors.push(accessor);
        self
    }

    /// Sets the base definition this one derives from.
    #[must_use]
    pub fn with_base(mut self, base: Arc<Blueprint>) -> Self {
        self.base = Some(base);
        self
    }

    /// The definition's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accessors declared on this level.
    #[must_use]
    pub fn accessors(&self) -> &[AccessorDef] {
        &self.accessors
    }

    /// The base definition, if any.
    #[must_use]
    pub fn base(&self) -> Option<&Arc<Blueprint>> {
        self.base.as_ref()
    }

    /// The definition chain, base-first.
    #[must_use]
    pub fn levels(&self) -> Vec<&Blueprint> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(level) = current {
            chain.push(level);
            current = level.base.as_deref();
        }
        chain.reverse();
        chain
    }

    /// Computes this level's initial private fields from constructor args.
    #[must_use]
    pub fn init_fields(&self, private_args: &FieldMap) -> FieldMap {
        match &self.init {
            Some(init) => init(private_args),
            None => private_args.clone(),
        }
    }

    /// Builds the layered private record for one instance: this level's
    /// fields and methods, with the base chain embedded beneath.
    #[must_use]
    pub fn instantiate(&self, private_args: &FieldMap) -> PrivateRecord {
        let mut record = PrivateRecord::new(self.init_fields(private_args));
        for accessor in &self.accessors {
            record.insert_method(accessor.name(), accessor.body());
        }
        if let Some(base) = &self.base {
            record.set_base(base.instantiate(private_args));
        }
        record
    }
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("name", &self.name)
            .field("accessors", &self.accessors.iter().map(AccessorDef::name).collect::<Vec<_>>())
            .field("base", &self.base.as_ref().map(|b| b.name()))
            .finish()
    }
}
