//! Closure-captured private state.
//!
//! Construction binds each level's accessor bodies to that level's field
//! map behind shared-ownership closures, then drops every other handle to
//! the map. The accessors are the only remaining reference path: external
//! code can call them and enumerate their names, and nothing else. When the
//! instance drops, the closures drop, and the captured state goes with
//! them.

use crate::blueprint::Blueprint;
use crate::capability::{Exposure, PrivateCapable};
use sealcheck_types::{
    AccessError, AccessResult, FieldMap, Identity, PublicView, WeakIdentity,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

type BoundAccessor = Box<dyn Fn(&[Value]) -> AccessResult<Value> + Send + Sync>;

/// Strategy adapter hiding private state in closure captures.
#[derive(Debug)]
pub struct ClosureAdapter {
    blueprint: Arc<Blueprint>,
}

impl ClosureAdapter {
    #[must_use]
    pub fn new(blueprint: Arc<Blueprint>) -> Self {
        Self { blueprint }
    }
}

/// An instance whose private state is reachable only through the bound
/// accessors captured at construction time.
pub struct ClosureInstance {
    identity: Identity,
    public: Mutex<PublicView>,
    accessors: BTreeMap<String, BoundAccessor>,
}

impl ClosureInstance {
    /// Names of the callable accessors, the only hidden-state surface an
    /// external holder can enumerate.
    pub fn accessor_names(&self) -> impl Iterator<Item = &str> {
        self.accessors.keys().map(String::as_str)
    }
}

impl PrivateCapable for ClosureAdapter {
    type Instance = ClosureInstance;

    fn construct(
        &self,
        public_args: FieldMap,
        private_args: FieldMap,
    ) -> AccessResult<Self::Instance> {
        let mut accessors: BTreeMap<String, BoundAccessor> = BTreeMap::new();

        // Base-first so a derived accessor with the same name replaces the
        // base binding. Each level captures its own state; a base accessor
        // can never see derived fields and vice versa.
        for level in self.blueprint.levels() {
            let state = Arc::new(Mutex::new(level.init_fields(&private_args)));
            for accessor in level.accessors() {
                let state = Arc::clone(&state);
                let body = accessor.body();
                accessors.insert(
                    accessor.name().to_string(),
                    Box::new(move |args| {
                        let mut fields =
                            state.lock().expect("closure state lock poisoned");
                        body(&mut fields, args)
                    }),
                );
            }
        }

        Ok(ClosureInstance {
            identity: Identity::new(),
            public: Mutex::new(PublicView::new(public_args)),
            accessors,
        })
    }

    fn read_public(&self, instance: &Self::Instance, field: &str) -> AccessResult<Value> {
        instance
            .public
            .lock()
            .expect("public view lock poisoned")
            .get(field)
            .cloned()
            .ok_or_else(|| AccessError::UnknownPublicField(field.to_string()))
    }

    fn write_public(
        &self,
        instance: &Self::Instance,
        field: &str,
        value: Value,
    ) -> AccessResult<()> {
        instance
            .public
            .lock()
            .expect("public view lock poisoned")
            .set(field, value);
        Ok(())
    }

    fn invoke_accessor(
        &self,
        instance: &Self::Instance,
        name: &str,
        args: &[Value],
    ) -> AccessResult<Value> {
        match instance.accessors.get(name) {
            Some(bound) => bound(args),
            None => Err(AccessError::UnknownAccessor(name.to_string())),
        }
    }

    fn attempt_external_read(&self, instance: &Self::Instance, field: &str) -> Exposure {
        // External paths: the public view, and the accessor name listing.
        // Accessor names reveal no values, and no reference to the captured
        // field maps exists outside the closures.
        let public = instance.public.lock().expect("public view lock poisoned");
        match public.get(field) {
            Some(value) => Exposure::Leaked(value.clone()),
            None => Exposure::Denied,
        }
    }

    fn leak_probe(&self, instance: &Self::Instance) -> WeakIdentity {
        instance.identity.downgrade()
    }
}
