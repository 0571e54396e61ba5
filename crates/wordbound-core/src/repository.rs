//! Session snapshot repository abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of a session progress snapshot.
#[derive(Debug, Clone)]
pub struct StoredSnapshot {
    /// Session this snapshot belongs to.
    pub session_id: Uuid,
    /// Serialized progress payload.
    pub payload: serde_json::Value,
    /// Timestamp of the write.
    pub saved_at: DateTime<Utc>,
}

/// Repository trait for loading and saving session snapshots.
///
/// The backing store is a collaborator concern — save-file transport is
/// out of scope here; the core only defines the seam it talks through.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Load the latest snapshot for a session, if one exists.
    async fn load_snapshot(&self, session_id: Uuid)
    -> Result<Option<StoredSnapshot>, DomainError>;

    /// Persist `snapshot` as the latest for its session.
    async fn save_snapshot(&self, snapshot: StoredSnapshot) -> Result<(), DomainError>;
}
