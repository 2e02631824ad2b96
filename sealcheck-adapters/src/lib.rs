//! Strategy adapters for sealcheck.
//!
//! Four ways of keeping an instance's private state out of external reach,
//! all implementing the same capability set ([`PrivateCapable`]):
//!
//! - [`ClosureAdapter`] — state captured by accessor closures at
//!   construction time
//! - [`PerInstanceAssociationAdapter`] — a private association table per
//!   instance
//! - [`SharedAssociationAdapter`] — one weak association table per
//!   definition
//! - [`UniqueTokenAdapter`] — token-keyed slots on the public record
//!
//! Instances of a definition are described once as a [`Blueprint`] and
//! constructed through whichever adapter is under test; the verifier
//! compares the adapters' observable behavior, not their internals.

mod blueprint;
mod capability;
mod closure;
mod per_instance;
mod shared;
mod unique_token;

pub use blueprint::{AccessorDef, Blueprint};
pub use capability::{Exposure, PrivateCapable};
pub use closure::{ClosureAdapter, ClosureInstance};
pub use per_instance::{AssociatedInstance, PerInstanceAssociationAdapter};
pub use shared::{SharedAssociationAdapter, SharedInstance};
pub use unique_token::{TokenInstance, TokenKey, UniqueTokenAdapter};
