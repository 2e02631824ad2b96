//! Core type definitions for sealcheck.
//!
//! This crate defines the fundamental, strategy-agnostic types used by the
//! encapsulation verifier:
//! - Identity handles (strong and weak, UUID v7 keyed)
//! - Field maps and private records (fields + private methods)
//! - Public views (the externally visible face of an instance)
//!
//! Strategy-specific machinery (association stores, adapters, scenarios)
//! belongs in the downstream crates, not here.

mod ids;
mod record;
mod view;

pub use ids::{HandleId, Identity, WeakIdentity};
pub use record::{FieldMap, PrivateMethod, PrivateRecord};
pub use view::PublicView;

/// Result type alias using the crate's error type.
pub type AccessResult<T> = std::result::Result<T, AccessError>;

/// Errors raised when the surface of an instance is misused.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("unknown private field: {0}")]
    UnknownField(String),

    #[error("unknown public field: {0}")]
    UnknownPublicField(String),

    #[error("unknown accessor: {0}")]
    UnknownAccessor(String),

    #[error("accessor {accessor} expects an argument at position {index}")]
    MissingArgument { accessor: String, index: usize },

    #[error("no private record associated with identity {0}")]
    NoAssociation(HandleId),
}
