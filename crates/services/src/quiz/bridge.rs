use std::sync::Arc;

use quiz_core::model::SessionState;
use storage::{SessionSnapshot, SnapshotStore};
use tracing::{debug, warn};

use crate::Clock;

/// Whether a best-effort storage operation went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Persisted,
    Failed,
}

/// Best-effort persistence of the live session.
///
/// Nothing here returns an error: write failures are logged and dropped, and
/// an unreadable or invalid snapshot is reported as absent so the caller
/// starts a fresh session.
#[derive(Clone)]
pub struct PersistenceBridge {
    clock: Clock,
    store: Arc<dyn SnapshotStore>,
}

impl PersistenceBridge {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn SnapshotStore>) -> Self {
        Self { clock, store }
    }

    /// Overwrite the stored snapshot with `state`.
    pub async fn save(&self, state: &SessionState) -> PersistOutcome {
        match self
            .store
            .save_snapshot(&SessionSnapshot::from_state(state))
            .await
        {
            Ok(()) => PersistOutcome::Persisted,
            Err(err) => {
                warn!(error = %err, step = state.step(), "failed to persist session snapshot");
                PersistOutcome::Failed
            }
        }
    }

    /// Restore the stored session, if there is a usable one.
    pub async fn load(&self) -> Option<SessionState> {
        let snapshot = match self.store.load_snapshot().await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!("no session snapshot to resume");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "discarding unreadable session snapshot");
                return None;
            }
        };

        match snapshot.into_state(self.clock.now()) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(error = %err, "discarding invalid session snapshot");
                None
            }
        }
    }

    /// Delete the stored snapshot.
    pub async fn clear(&self) -> PersistOutcome {
        match self.store.clear_snapshot().await {
            Ok(()) => PersistOutcome::Persisted,
            Err(err) => {
                warn!(error = %err, "failed to delete session snapshot");
                PersistOutcome::Failed
            }
        }
    }
}
