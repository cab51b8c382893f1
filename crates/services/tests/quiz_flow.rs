use std::sync::Arc;

use chrono::Duration;
use quiz_core::model::{
    ClosingTone, QuizDefinition, ScoreBanner, SessionState, StepId, StepPosition,
};
use quiz_core::time::fixed_now;
use services::{Clock, QuizLoopService, Screen, SubmitOutcome};
use storage::{InMemorySnapshotStore, SessionSnapshot};

fn step(index: u8) -> StepId {
    StepId::new(index).unwrap()
}

fn correct_answer(step: StepId) -> &'static str {
    match step.index() {
        1 | 3 => "Pescara",
        2 => "Oceanografico",
        4 => "Poldo",
        5 => "100",
        6 => "Botolo",
        7 => "ma duro che duri!",
        8 => "  Amore ",
        9 => "Piccola tippete dove sei andata - Il botolo",
        _ => unreachable!(),
    }
}

fn service_with(clock: Clock) -> (QuizLoopService, InMemorySnapshotStore) {
    let store = InMemorySnapshotStore::new();
    let service =
        QuizLoopService::new(clock, QuizDefinition::builtin(), Arc::new(store.clone())).unwrap();
    (service, store)
}

fn assert_persisted(store: &InMemorySnapshotStore, state: &SessionState) {
    assert_eq!(store.current(), Some(SessionSnapshot::from_state(state)));
}

async fn answer_correctly(service: &QuizLoopService, state: &mut SessionState, id: StepId) {
    match service.submit_answer(state, id, correct_answer(id)).await {
        SubmitOutcome::Advanced { .. } => {}
        SubmitOutcome::Revealed { .. } => {
            service.continue_after_reveal(state, id).await.unwrap();
        }
        other => panic!("{id}: unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn two_wrong_then_right_on_first_step() {
    let (service, store) = service_with(Clock::fixed(fixed_now()));
    let mut state = service.open_fresh().await;
    service.start(&mut state).await;

    for _ in 0..2 {
        let outcome = service.submit_answer(&mut state, step(1), "Vasto").await;
        assert!(matches!(outcome, SubmitOutcome::Incorrect { .. }));
        assert_persisted(&store, &state);
    }
    let outcome = service.submit_answer(&mut state, step(1), "Pescara").await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Advanced { position: StepPosition::Question(id), .. } if id == step(2)
    ));

    assert_eq!(state.attempts_for(step(1)), 2);
    assert!(!state.perfect_score());
    assert_eq!(state.step(), 2);
    assert_persisted(&store, &state);
}

#[tokio::test]
async fn incorrect_count_survives_correct_answers() {
    let (service, _store) = service_with(Clock::fixed(fixed_now()));
    let mut state = service.open_fresh().await;
    service.start(&mut state).await;

    service.submit_answer(&mut state, step(1), "Atina").await;
    answer_correctly(&service, &mut state, step(1)).await;
    // Late answers for a finished step change nothing.
    service.submit_answer(&mut state, step(1), "Chieti").await;

    assert_eq!(state.attempts_for(step(1)), 1);
    assert_eq!(state.attempts_for(step(2)), 0);
}

#[tokio::test]
async fn repeated_hint_requests_count_once() {
    let (service, store) = service_with(Clock::fixed(fixed_now()));
    let mut state = service.open_fresh().await;
    service.start(&mut state).await;
    answer_correctly(&service, &mut state, step(1)).await;
    answer_correctly(&service, &mut state, step(2)).await;

    for _ in 0..3 {
        let hint = service.request_hint(&mut state, step(3)).await;
        assert_eq!(hint.as_deref(), Some("Non Padova..."));
    }
    assert_eq!(state.hints_used(), 1);
    assert!(state.hint_shown(step(3)));
    assert_persisted(&store, &state);

    service.request_hint(&mut state, step(4)).await;
    service.request_hint(&mut state, step(6)).await;
    assert_eq!(state.hints_used(), 3);
}

#[tokio::test]
async fn perfect_run_reaches_perfect_finale() {
    let mut clock = Clock::fixed(fixed_now());
    let (service, store) = service_with(clock);
    let mut state = service.open_fresh().await;
    assert!(matches!(service.screen(&state), Screen::Welcome(_)));

    service.start(&mut state).await;
    for id in StepId::all() {
        assert_eq!(service.progress(&state).unwrap().step, id.index());
        answer_correctly(&service, &mut state, id).await;
    }

    assert_eq!(state.position(), StepPosition::Finale);
    assert!(service.progress(&state).is_none());
    assert!(state.perfect_score());
    assert_persisted(&store, &state);

    clock.advance(Duration::seconds(125));
    let (later, _) = service_with(clock);
    let summary = later.finale_summary(&state).unwrap();
    assert_eq!(summary.banner(), ScoreBanner::Perfect);
    assert_eq!(summary.closing(), ClosingTone::Perfect);
    assert_eq!((summary.minutes(), summary.seconds()), (2, 5));

    match later.screen(&state) {
        Screen::Finale(finale) => {
            assert_eq!(finale.closing, later.definition().finale.closing.perfect);
        }
        other => panic!("expected finale, got {other:?}"),
    }
}

#[tokio::test]
async fn sloppy_run_shows_error_banner() {
    let (service, _store) = service_with(Clock::fixed(fixed_now()));
    let mut state = service.open_fresh().await;
    service.start(&mut state).await;

    for id in StepId::all() {
        if id.index() % 2 == 1 {
            let wrong = match id.index() {
                5 => "40",
                8 => "password",
                _ => service.definition().step(id).unwrap().rule.options()[0].as_str(),
            };
            let outcome = service.submit_answer(&mut state, id, wrong).await;
            assert!(matches!(outcome, SubmitOutcome::Incorrect { .. }), "{id}");
        }
        answer_correctly(&service, &mut state, id).await;
    }

    let summary = service.finale_summary(&state).unwrap();
    assert_eq!(summary.banner(), ScoreBanner::Errors(5));
    assert_eq!(summary.closing(), ClosingTone::ManyErrors);
}

#[tokio::test]
async fn step_never_decreases_until_restart() {
    let (service, _store) = service_with(Clock::fixed(fixed_now()));
    let mut state = service.open_fresh().await;
    let mut last = state.step();

    service.start(&mut state).await;
    for id in StepId::all() {
        service.submit_answer(&mut state, id, "").await;
        assert!(state.step() >= last);
        last = state.step();
        service.request_hint(&mut state, id).await;
        answer_correctly(&service, &mut state, id).await;
        assert!(state.step() > last);
        last = state.step();
    }
    service.advance(&mut state).await;
    assert_eq!(state.step(), 10);

    service.restart(&mut state).await;
    assert_eq!(state.step(), 0);
    assert!(state.perfect_score());
    assert_eq!(state.hints_used(), 0);
}

#[tokio::test]
async fn resume_picks_up_where_the_player_left() {
    let (service, store) = service_with(Clock::fixed(fixed_now()));
    let mut state = service.open_fresh().await;
    service.start(&mut state).await;
    service.submit_answer(&mut state, step(1), "Chieti").await;
    answer_correctly(&service, &mut state, step(1)).await;
    service
        .submit_answer(&mut state, step(2), "Oceanografico")
        .await;
    service.request_hint(&mut state, step(2)).await;

    let reloaded = service.resume().await;
    assert_eq!(reloaded, state);
    assert!(reloaded.is_revealed(step(2)));

    // A fresh process start throws the snapshot away.
    let fresh = service.open_fresh().await;
    assert_eq!(fresh.step(), 0);
    assert!(store.current().is_none());
    assert_eq!(service.resume().await.step(), 0);
}
