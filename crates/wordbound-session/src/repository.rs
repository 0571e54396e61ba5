//! Persistence helpers over the snapshot repository seam.
//!
//! The session payload is written on every meaningful change and read
//! once on load; the backing store is chosen by the host application.

use uuid::Uuid;
use wordbound_core::clock::Clock;
use wordbound_core::error::DomainError;
use wordbound_core::repository::{SnapshotRepository, StoredSnapshot};

use crate::progress::SessionProgress;

/// Persists `progress` as the latest snapshot for `session_id`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository write fails.
pub async fn save_progress(
    repo: &dyn SnapshotRepository,
    session_id: Uuid,
    progress: &SessionProgress,
    clock: &dyn Clock,
) -> Result<(), DomainError> {
    let snapshot = StoredSnapshot {
        session_id,
        payload: progress.to_payload(),
        saved_at: clock.now(),
    };
    repo.save_snapshot(snapshot).await
}

/// Loads the latest snapshot for `session_id`.
///
/// # Errors
///
/// Returns `DomainError::SessionNotFound` if no snapshot exists, or
/// `DomainError::Infrastructure` if the payload cannot be deserialized.
pub async fn load_progress(
    repo: &dyn SnapshotRepository,
    session_id: Uuid,
) -> Result<SessionProgress, DomainError> {
    let stored = repo
        .load_snapshot(session_id)
        .await?
        .ok_or(DomainError::SessionNotFound(session_id))?;
    SessionProgress::from_payload(stored.payload)
}
