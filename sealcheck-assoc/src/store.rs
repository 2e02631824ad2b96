//! The identity-keyed association table.
//!
//! Maps an owning [`Identity`] to a record of private data. The table holds
//! only [`WeakIdentity`] owners, so it is never the reason an instance stays
//! reachable: once every strong handle to an identity drops, its entry stops
//! being observable and is reclaimed by the next mutation or [`prune`].
//!
//! [`prune`]: AssociationStore::prune

use crate::error::{AssocError, AssocResult};
use sealcheck_types::{HandleId, Identity, WeakIdentity};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

struct Entry<R> {
    owner: WeakIdentity,
    record: R,
}

/// An identity-keyed table of private records with weak-owner semantics.
///
/// Interior mutability via a [`Mutex`] keeps the table `Sync`, so distinct
/// identities may be associated concurrently without interfering (map
/// semantics keyed by identity equality).
pub struct AssociationStore<R> {
    entries: Mutex<HashMap<HandleId, Entry<R>>>,
}

impl<R> AssociationStore<R> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<HandleId, Entry<R>>> {
        self.entries.lock().expect("association table lock poisoned")
    }

    /// Creates or replaces the record for `owner`.
    ///
    /// Each identity maps to at most one record; a second `set` replaces
    /// the first. Expired entries are reclaimed on the way.
    pub fn set(&self, owner: &Identity, record: R) {
        let mut entries = self.lock();
        entries.retain(|_, entry| entry.owner.is_reachable());
        entries.insert(
            owner.id(),
            Entry {
                owner: owner.downgrade(),
                record,
            },
        );
    }

    /// Returns a copy of the record for `identity`.
    pub fn get(&self, identity: &Identity) -> AssocResult<R>
    where
        R: Clone,
    {
        let entries = self.lock();
        entries
            .get(&identity.id())
            .filter(|entry| entry.owner.is_reachable())
            .map(|entry| entry.record.clone())
            .ok_or(AssocError::NotFound(identity.id()))
    }

    /// Runs `f` against the record for `identity` in place.
    pub fn update<F, T>(&self, identity: &Identity, f: F) -> AssocResult<T>
    where
        F: FnOnce(&mut R) -> T,
    {
        let mut entries = self.lock();
        match entries.get_mut(&identity.id()) {
            Some(entry) if entry.owner.is_reachable() => Ok(f(&mut entry.record)),
            _ => Err(AssocError::NotFound(identity.id())),
        }
    }

    /// Returns true if a record is associated with `identity`.
    #[must_use]
    pub fn has(&self, identity: &Identity) -> bool {
        self.lock()
            .get(&identity.id())
            .is_some_and(|entry| entry.owner.is_reachable())
    }

    /// Removes the association for `identity`.
    ///
    /// Idempotent: deleting a missing association is a no-op.
    pub fn delete(&self, identity: &Identity) {
        let mut entries = self.lock();
        entries.remove(&identity.id());
        entries.retain(|_, entry| entry.owner.is_reachable());
    }

    /// Number of live associations (entries whose owner is still reachable).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|entry| entry.owner.is_reachable())
            .count()
    }

    /// Returns true if no live association exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reclaims entries whose owner is no longer reachable.
    ///
    /// Returns the number of entries removed.
    pub fn prune(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.owner.is_reachable());
        before - entries.len()
    }

    /// Total entries physically present, including expired ones awaiting
    /// reclamation. Diagnostic only.
    #[must_use]
    pub fn raw_len(&self) -> usize {
        self.lock().len()
    }
}

impl<R> Default for AssociationStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for AssociationStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssociationStore")
            .field("live", &self.len())
            .field("raw", &self.raw_len())
            .finish()
    }
}
