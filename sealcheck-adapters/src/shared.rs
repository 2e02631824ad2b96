//! Shared association table.
//!
//! One [`AssociationStore`] serves every instance of the definition, the
//! way a module-level table would in a dynamic language. Records are keyed
//! by identity, so instances never see each other's state, and the weak
//! owners keep the table from pinning dropped instances in memory the way
//! a naive global table would.

use crate::blueprint::Blueprint;
use crate::capability::{Exposure, PrivateCapable};
use sealcheck_assoc::AssociationStore;
use sealcheck_types::{
    AccessError, AccessResult, FieldMap, Identity, PrivateRecord, PublicView, WeakIdentity,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Strategy adapter backing all instances with one shared table.
#[derive(Debug)]
pub struct SharedAssociationAdapter {
    blueprint: Arc<Blueprint>,
    store: Arc<AssociationStore<PrivateRecord>>,
}

impl SharedAssociationAdapter {
    #[must_use]
    pub fn new(blueprint: Arc<Blueprint>) -> Self {
        Self {
            blueprint,
            store: Arc::new(AssociationStore::new()),
        }
    }

    /// Live records in the shared table (dropped instances excluded).
    #[must_use]
    pub fn live_records(&self) -> usize {
        self.store.len()
    }

    /// Reclaims table entries whose instance is gone; returns the count.
    pub fn reclaim(&self) -> usize {
        self.store.prune()
    }
}

/// An instance whose private record lives in the definition's shared table.
pub struct SharedInstance {
    identity: Identity,
    public: Mutex<PublicView>,
}

impl PrivateCapable for SharedAssociationAdapter {
    type Instance = SharedInstance;

    fn construct(
        &self,
        public_args: FieldMap,
        private_args: FieldMap,
    ) -> AccessResult<Self::Instance> {
        let identity = Identity::new();
        self.store
            .set(&identity, self.blueprint.instantiate(&private_args));

        Ok(SharedInstance {
            identity,
            public: Mutex::new(PublicView::new(public_args)),
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
        self.store
            .update(&instance.identity, |record| record.invoke(name, args))
            .map_err(AccessError::from)?
    }

    fn attempt_external_read(&self, instance: &Self::Instance, field: &str) -> Exposure {
        // The table is owned by the adapter and keyed by identity; holding
        // an instance exposes the public view only.
        let public = instance.public.lock().expect("public view lock poisoned");
        match public.get(field) {
            Some(value) => Exposure::Leaked(value.clone()),
            None => Exposure::Denied,
        }
    }

    fn leak_probe(&self, instance: &Self::Instance) -> WeakIdentity {
        instance.identity.downgrade()
    }

    fn retained_records(&self) -> Option<usize> {
        Some(self.store.len())
    }
}
