use async_trait::async_trait;
use quiz_core::model::SessionStateError;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::json_file::JsonFileStore;
use crate::snapshot::SessionSnapshot;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    InvalidState(#[from] SessionStateError),
}

/// Single-record store for the session snapshot.
///
/// Every save overwrites the whole record; there is no partial update.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist `snapshot`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn save_snapshot(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError>;

    /// Fetch the current record, `None` if nothing has been saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the record exists but cannot be
    /// parsed, or other storage errors.
    async fn load_snapshot(&self) -> Result<Option<SessionSnapshot>, StorageError>;

    /// Delete the record. Deleting a missing record succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if an existing record cannot be removed.
    async fn clear_snapshot(&self) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySnapshotStore {
    record: Arc<Mutex<Option<SessionSnapshot>>>,
}

impl InMemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Peek at the stored record without going through the async contract.
    #[must_use]
    pub fn current(&self) -> Option<SessionSnapshot> {
        self.record
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn save_snapshot(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(snapshot.clone());
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        let guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn clear_snapshot(&self) -> Result<(), StorageError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Snapshot backend behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub snapshots: Arc<dyn SnapshotStore>,
}

impl Storage {
    /// Storage backed by a JSON file at `path`.
    #[must_use]
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self {
            snapshots: Arc::new(JsonFileStore::new(path)),
        }
    }
}
