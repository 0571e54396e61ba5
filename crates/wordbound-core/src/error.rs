//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Nothing in the narrative core treats an error as fatal: every failure
/// path degrades to "no narrative progression this tick".
#[derive(Debug, Error)]
pub enum DomainError {
    /// A catalog document was missing or malformed.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// A validation error in domain logic (malformed or duplicate input).
    #[error("validation error: {0}")]
    Validation(String),

    /// No persisted snapshot exists for the session.
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
