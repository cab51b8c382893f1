use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::repository::{SnapshotStore, StorageError};
use crate::snapshot::SessionSnapshot;

/// Snapshot stored as a pretty-printed JSON document on disk.
///
/// Writes go straight to the target path; atomicity is whatever the filesystem
/// gives a single `write`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn save_snapshot(&self, snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|err| StorageError::Io(err.to_string()))?;
        tracing::trace!(path = %self.path.display(), step = snapshot.step, "snapshot written");
        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StorageError::Io(err.to_string())),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn clear_snapshot(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::Io(err.to_string())),
        }
    }
}
