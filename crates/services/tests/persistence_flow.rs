use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{QuizDefinition, SessionState, StepId};
use quiz_core::time::{fixed_clock, fixed_now};
use services::{PersistOutcome, PersistenceBridge, QuizLoopService, SubmitOutcome};
use storage::{JsonFileStore, SessionSnapshot, SnapshotStore, StorageError};
use tempfile::TempDir;

/// Store whose disk is always full.
struct BrokenStore;

#[async_trait]
impl SnapshotStore for BrokenStore {
    async fn save_snapshot(&self, _snapshot: &SessionSnapshot) -> Result<(), StorageError> {
        Err(StorageError::Io("no space left on device".into()))
    }

    async fn load_snapshot(&self) -> Result<Option<SessionSnapshot>, StorageError> {
        Err(StorageError::Io("permission denied".into()))
    }

    async fn clear_snapshot(&self) -> Result<(), StorageError> {
        Err(StorageError::Io("permission denied".into()))
    }
}

fn step(index: u8) -> StepId {
    StepId::new(index).unwrap()
}

#[tokio::test]
async fn storage_failures_never_block_the_quiz() {
    let service =
        QuizLoopService::new(fixed_clock(), QuizDefinition::builtin(), Arc::new(BrokenStore))
            .unwrap();

    let mut state = service.open_fresh().await;
    service.start(&mut state).await;
    let outcome = service.submit_answer(&mut state, step(1), "Atina").await;
    assert!(matches!(outcome, SubmitOutcome::Incorrect { attempts: 1, .. }));
    service.request_hint(&mut state, step(1)).await;
    service.submit_answer(&mut state, step(1), "Pescara").await;

    assert_eq!(state.step(), 2);
    assert_eq!(state.hints_used(), 1);
    assert_eq!(service.bridge().save(&state).await, PersistOutcome::Failed);
    assert_eq!(service.bridge().clear().await, PersistOutcome::Failed);
    assert_eq!(service.resume().await.step(), 0);
}

#[tokio::test]
async fn corrupted_snapshot_starts_fresh() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("quiz_state.json");
    std::fs::write(&path, "{{{ definitely not json").expect("write");

    let service = QuizLoopService::new(
        fixed_clock(),
        QuizDefinition::builtin(),
        Arc::new(JsonFileStore::new(&path)),
    )
    .unwrap();

    let state = service.resume().await;
    assert_eq!(state, SessionState::fresh(fixed_now()));
}

#[tokio::test]
async fn out_of_range_snapshot_starts_fresh() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("quiz_state.json");
    std::fs::write(&path, r#"{"step": 42}"#).expect("write");

    let bridge = PersistenceBridge::new(fixed_clock(), Arc::new(JsonFileStore::new(&path)));
    assert!(bridge.load().await.is_none());
}

#[tokio::test]
async fn bridge_round_trips_reachable_states() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("quiz_state.json");
    let store = Arc::new(JsonFileStore::new(&path));
    let bridge = PersistenceBridge::new(fixed_clock(), store.clone());
    let service =
        QuizLoopService::new(fixed_clock(), QuizDefinition::builtin(), store).unwrap();

    let mut state = service.open_fresh().await;
    let mut checkpoints = vec![state.clone()];
    service.start(&mut state).await;
    checkpoints.push(state.clone());
    service.submit_answer(&mut state, step(1), "Vasto").await;
    checkpoints.push(state.clone());
    service.submit_answer(&mut state, step(1), "Pescara").await;
    service.request_hint(&mut state, step(2)).await;
    checkpoints.push(state.clone());
    service
        .submit_answer(&mut state, step(2), "Oceanografico")
        .await;
    checkpoints.push(state.clone());

    for checkpoint in checkpoints {
        assert_eq!(bridge.save(&checkpoint).await, PersistOutcome::Persisted);
        assert_eq!(bridge.load().await, Some(checkpoint));
    }

    assert_eq!(bridge.clear().await, PersistOutcome::Persisted);
    assert!(!path.exists());
    assert!(bridge.load().await.is_none());
}
