//! Identity handles for instances under verification.
//!
//! Uses UUID v7 for time-ordered, globally unique handle IDs. An `Identity`
//! is an opaque reference: it distinguishes one instance from another and
//! serves as a lookup key, nothing more. The strong/weak handle pair is what
//! lets association tables avoid keeping instances alive on their own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Unique identifier carried by an identity handle.
/// Uses UUID v7 which embeds a timestamp for natural ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(Uuid);

impl HandleId {
    /// Creates a new handle ID with the current timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a handle ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses a handle ID from a string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for HandleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HandleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The shared allocation behind an identity. Reachability of this cell is
/// what "the instance is still referenced" means.
#[derive(Debug)]
struct IdentityCell {
    id: HandleId,
}

/// A strong, cloneable handle denoting one instance.
///
/// Cloning copies the reference, never the identity: all clones compare
/// equal and keep the same cell reachable. Equality and hashing go through
/// the [`HandleId`].
#[derive(Debug, Clone)]
pub struct Identity {
    cell: Arc<IdentityCell>,
}

impl Identity {
    /// Creates a fresh identity, distinct from every other.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: Arc::new(IdentityCell { id: HandleId::new() }),
        }
    }

    /// Returns the handle ID used as the lookup key.
    #[must_use]
    pub fn id(&self) -> HandleId {
        self.cell.id
    }

    /// Creates a weak handle that does not keep the identity reachable.
    #[must_use]
    pub fn downgrade(&self) -> WeakIdentity {
        WeakIdentity {
            cell: Arc::downgrade(&self.cell),
            id: self.cell.id,
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A weak handle to an identity.
///
/// Keeps the [`HandleId`] (so lookups and diagnostics work after the
/// instance is gone) but does not keep the instance reachable. This is the
/// reachability proxy used by leak checks: once every strong holder drops,
/// [`WeakIdentity::is_reachable`] turns false.
#[derive(Debug, Clone)]
pub struct WeakIdentity {
    cell: Weak<IdentityCell>,
    id: HandleId,
}

impl WeakIdentity {
    /// Returns the handle ID this weak handle refers to.
    #[must_use]
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// Attempts to recover a strong handle.
    #[must_use]
    pub fn upgrade(&self) -> Option<Identity> {
        self.cell.upgrade().map(|cell| Identity { cell })
    }

    /// Returns true while at least one strong handle exists.
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.cell.strong_count() > 0
    }
}

impl fmt::Display for WeakIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
