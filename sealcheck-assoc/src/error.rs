//! Error types for the association layer.

use sealcheck_types::HandleId;
use thiserror::Error;

/// Result type for association operations.
pub type AssocResult<T> = Result<T, AssocError>;

/// Errors that can occur in association operations.
#[derive(Debug, Error)]
pub enum AssocError {
    /// No record is associated with the identity (never set, deleted, or
    /// the owner is no longer reachable).
    #[error("no record associated with identity: {0}")]
    NotFound(HandleId),
}

impl From<AssocError> for sealcheck_types::AccessError {
    fn from(err: AssocError) -> Self {
        match err {
            AssocError::NotFound(id) => Self::NoAssociation(id),
        }
    }
}
