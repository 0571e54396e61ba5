//! Test repositories — deterministic `SnapshotRepository` doubles.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;
use wordbound_core::error::DomainError;
use wordbound_core::repository::{SnapshotRepository, StoredSnapshot};

/// A repository that never holds a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct EmptySnapshotRepository;

#[async_trait]
impl SnapshotRepository for EmptySnapshotRepository {
    async fn load_snapshot(
        &self,
        _session_id: Uuid,
    ) -> Result<Option<StoredSnapshot>, DomainError> {
        Ok(None)
    }

    async fn save_snapshot(&self, _snapshot: StoredSnapshot) -> Result<(), DomainError> {
        Ok(())
    }
}

/// A repository whose operations always fail, for error-path tests.
#[derive(Debug, Clone, Copy)]
pub struct FailingSnapshotRepository;

#[async_trait]
impl SnapshotRepository for FailingSnapshotRepository {
    async fn load_snapshot(
        &self,
        _session_id: Uuid,
    ) -> Result<Option<StoredSnapshot>, DomainError> {
        Err(DomainError::Infrastructure(
            "simulated load failure".to_owned(),
        ))
    }

    async fn save_snapshot(&self, _snapshot: StoredSnapshot) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure(
            "simulated save failure".to_owned(),
        ))
    }
}

/// An in-memory repository that records every save and serves the most
/// recent snapshot per session.
#[derive(Debug, Default)]
pub struct RecordingSnapshotRepository {
    snapshots: Mutex<BTreeMap<Uuid, StoredSnapshot>>,
}

impl RecordingSnapshotRepository {
    /// Creates an empty recording repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with one stored snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: StoredSnapshot) -> Self {
        let repo = Self::new();
        repo.snapshots
            .lock()
            .expect("repository mutex poisoned")
            .insert(snapshot.session_id, snapshot);
        repo
    }

    /// The most recently saved snapshot for `session_id`, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn saved(&self, session_id: Uuid) -> Option<StoredSnapshot> {
        self.snapshots
            .lock()
            .expect("repository mutex poisoned")
            .get(&session_id)
            .cloned()
    }
}

#[async_trait]
impl SnapshotRepository for RecordingSnapshotRepository {
    async fn load_snapshot(&self, session_id: Uuid) -> Result<Option<StoredSnapshot>, DomainError> {
        Ok(self
            .snapshots
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("repository mutex poisoned: {e}")))?
            .get(&session_id)
            .cloned())
    }

    async fn save_snapshot(&self, snapshot: StoredSnapshot) -> Result<(), DomainError> {
        self.snapshots
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("repository mutex poisoned: {e}")))?
            .insert(snapshot.session_id, snapshot);
        Ok(())
    }
}
