//! Per-instance weak association.
//!
//! Each constructed instance owns an [`AssociationStore`] scoped to itself,
//! keyed by its own identity. External code receives the instance but never
//! the store reference, so the private record has no external path. When
//! the instance drops, the store drops and the record is reclaimed with it.

use crate::blueprint::Blueprint;
use crate::capability::{Exposure, PrivateCapable};
use sealcheck_assoc::AssociationStore;
use sealcheck_types::{
    AccessError, AccessResult, FieldMap, Identity, PrivateRecord, PublicView, WeakIdentity,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Strategy adapter associating private records per instance.
#[derive(Debug)]
pub struct PerInstanceAssociationAdapter {
    blueprint: Arc<Blueprint>,
}

impl PerInstanceAssociationAdapter {
    #[must_use]
    pub fn new(blueprint: Arc<Blueprint>) -> Self {
        Self { blueprint }
    }
}

/// An instance owning its private association table.
pub struct AssociatedInstance {
    identity: Identity,
    public: Mutex<PublicView>,
    // Scoped to this instance; never handed out.
    store: AssociationStore<PrivateRecord>,
}

impl PrivateCapable for PerInstanceAssociationAdapter {
    type Instance = AssociatedInstance;

    fn construct(
        &self,
        public_args: FieldMap,
        private_args: FieldMap,
    ) -> AccessResult<Self::Instance> {
        let identity = Identity::new();
        let store = AssociationStore::new();
        store.set(&identity, self.blueprint.instantiate(&private_args));

        Ok(AssociatedInstance {
            identity,
            public: Mutex::new(PublicView::new(public_args)),
            store,
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
        instance
            .store
            .update(&instance.identity, |record| record.invoke(name, args))
            .map_err(AccessError::from)?
    }

    fn attempt_external_read(&self, instance: &Self::Instance, field: &str) -> Exposure {
        // The store is a private field of the instance; the public view is
        // the only enumerable surface.
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
