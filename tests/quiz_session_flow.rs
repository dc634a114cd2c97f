//! End-to-end play flow: gate, quiz open, wrong/correct answers, retries,
//! and error recovery around the submit path.

mod common;

use common::{play_config, three_stage_quest, FakeBackend};
use geoquest::geo::{Coordinate, UserPosition};
use geoquest::play::{ClearOutcome, InteractionState, PlayError, PlaySession, QuizAnswer, SubmitResult};

fn at_stage_one() -> UserPosition {
    UserPosition::live(Coordinate::new(35.1595454, 126.8526012).unwrap())
}

#[tokio::test]
async fn full_scenario_at_stage_one() {
    let backend = FakeBackend::new(three_stage_quest(), 3);
    let mut session = PlaySession::start(backend, "q1", &play_config()).await.unwrap();
    let position = at_stage_one();

    // Stage 1 is at the user's feet; stage 2 is ~1.1km north.
    let detail = session.open_stage("s1", Some(&position)).await.unwrap();
    assert_eq!(detail.stage_name, "Stage 1");
    assert!(session.state().is_quiz_open());

    // Wrong answer: quiz stays open, nothing cleared, no reopening needed.
    session.select_answer(QuizAnswer::X).unwrap();
    let result = session.submit().await.unwrap();
    assert_eq!(result, SubmitResult::Incorrect);
    assert!(session.state().is_quiz_open());
    assert!(!session.progress().stage("s1").unwrap().cleared);

    // Correct answer straight away, without re-opening the stage.
    session.select_answer(QuizAnswer::O).unwrap();
    let result = session.submit().await.unwrap();
    match result {
        SubmitResult::Correct(outcome) => {
            // Two stages remain and the lifetime count (3) is not a
            // milestone member.
            assert_eq!(outcome, ClearOutcome::Progress);
        }
        other => panic!("expected correct, got {other:?}"),
    }
    assert!(session.progress().stage("s1").unwrap().cleared);
    assert!(session.state().is_closed());
    assert!(!session.progress().all_cleared());
}

#[tokio::test]
async fn too_far_stage_is_rejected_without_network() {
    let backend = FakeBackend::new(three_stage_quest(), 0);
    let mut session = PlaySession::start(backend, "q1", &play_config()).await.unwrap();
    let position = at_stage_one();

    let err = session.open_stage("s2", Some(&position)).await.unwrap_err();
    match err {
        PlayError::TooFar { distance_m, threshold_m } => {
            assert!(distance_m > 1000.0);
            assert_eq!(threshold_m, 50.0);
        }
        other => panic!("expected TooFar, got {other:?}"),
    }
    assert!(session.state().is_closed());
}

#[tokio::test]
async fn no_position_yet_is_surfaced_distinctly() {
    let backend = FakeBackend::new(three_stage_quest(), 0);
    let mut session = PlaySession::start(backend, "q1", &play_config()).await.unwrap();

    let err = session.open_stage("s1", None).await.unwrap_err();
    assert!(matches!(err, PlayError::PositionPending));
}

#[tokio::test]
async fn server_proximity_rejection_surfaces_like_local_gate() {
    let backend = FakeBackend::new(three_stage_quest(), 0);
    backend.fail_next_detail(PlayError::TooFar {
        distance_m: f64::INFINITY,
        threshold_m: 0.0,
    });
    let mut session = PlaySession::start(backend, "q1", &play_config()).await.unwrap();

    let err = session.open_stage("s1", Some(&at_stage_one())).await.unwrap_err();
    assert!(matches!(err, PlayError::TooFar { .. }));
    assert!(session.state().is_closed());
}

#[tokio::test]
async fn malformed_detail_aborts_to_closed() {
    let backend = FakeBackend::new(three_stage_quest(), 0);
    backend.fail_next_detail(PlayError::MalformedPayload("missing quizContent".into()));
    let mut session = PlaySession::start(backend, "q1", &play_config()).await.unwrap();

    let err = session.open_stage("s1", Some(&at_stage_one())).await.unwrap_err();
    assert!(matches!(err, PlayError::MalformedPayload(_)));
    assert!(session.state().is_closed());

    // Prior state untouched: the stage can be opened again cleanly.
    session.open_stage("s1", Some(&at_stage_one())).await.unwrap();
    assert!(session.state().is_quiz_open());
}

#[tokio::test]
async fn network_failure_mid_submit_preserves_state() {
    let backend = FakeBackend::new(three_stage_quest(), 0);
    let mut session = PlaySession::start(backend, "q1", &play_config()).await.unwrap();
    session.open_stage("s1", Some(&at_stage_one())).await.unwrap();
    session.select_answer(QuizAnswer::O).unwrap();

    // Drop the next submit on the floor.
    session.backend().fail_next_submit(PlayError::Timeout { seconds: 10 });
    let err = session.submit().await.unwrap_err();
    assert!(err.is_transient());

    // Quiz still open, selection preserved, nothing cleared.
    match session.state() {
        InteractionState::QuizOpen { selected, .. } => {
            assert_eq!(*selected, Some(QuizAnswer::O));
        }
        other => panic!("unexpected state {other:?}"),
    }
    assert!(!session.progress().stage("s1").unwrap().cleared);

    // Resubmission succeeds once the network recovers.
    let result = session.submit().await.unwrap();
    assert!(matches!(result, SubmitResult::Correct(_)));
    assert!(session.progress().stage("s1").unwrap().cleared);
}

#[tokio::test]
async fn submit_without_selection_is_a_misuse_error() {
    let backend = FakeBackend::new(three_stage_quest(), 0);
    let mut session = PlaySession::start(backend, "q1", &play_config()).await.unwrap();
    session.open_stage("s1", Some(&at_stage_one())).await.unwrap();

    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, PlayError::NoOpenQuiz));
    // The open quiz survives the misuse.
    assert!(session.state().is_quiz_open());
}

#[tokio::test]
async fn close_discards_without_side_effects() {
    let backend = FakeBackend::new(three_stage_quest(), 0);
    let mut session = PlaySession::start(backend, "q1", &play_config()).await.unwrap();
    session.open_stage("s1", Some(&at_stage_one())).await.unwrap();
    session.select_answer(QuizAnswer::O).unwrap();

    session.close();
    assert!(session.state().is_closed());
    assert!(!session.progress().stage("s1").unwrap().cleared);
    assert!(matches!(
        session.submit().await.unwrap_err(),
        PlayError::NoOpenQuiz
    ));
}

#[tokio::test]
async fn marker_click_routes_through_the_gate() {
    let backend = FakeBackend::new(three_stage_quest(), 0);
    let mut session = PlaySession::start(backend, "q1", &play_config()).await.unwrap();

    let err = session
        .handle_marker_click("s3", Some(&at_stage_one()))
        .await
        .unwrap_err();
    assert!(matches!(err, PlayError::TooFar { .. }));

    session
        .handle_marker_click("s1", Some(&at_stage_one()))
        .await
        .unwrap();
    assert!(session.state().is_quiz_open());
}

#[tokio::test]
async fn unknown_stage_is_an_error() {
    let backend = FakeBackend::new(three_stage_quest(), 0);
    let mut session = PlaySession::start(backend, "q1", &play_config()).await.unwrap();
    let err = session
        .open_stage("nope", Some(&at_stage_one()))
        .await
        .unwrap_err();
    assert!(matches!(err, PlayError::UnknownStage(_)));
}
