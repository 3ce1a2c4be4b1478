use eyetrainer::config::TrainerConfig;
use eyetrainer::feedback::Feedback;
use eyetrainer::grid::GridSize;
use eyetrainer::history::{MemoryStore, SessionStore};
use eyetrainer::runtime::{spawn_session, SessionInput};
use eyetrainer::session::SessionController;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

mod common;
use common::mock_feedback::RecordingFeedback;
use common::mock_transport::MockTransport;
use common::{word_for, wrong_for};

fn controller(
    duration_secs: u32,
    feedback: &RecordingFeedback,
    store: &Arc<MemoryStore>,
    transport: MockTransport,
) -> SessionController {
    let mut config = TrainerConfig::default();
    config.session.duration_secs = duration_secs;
    config.session.grid_rows = 3;
    config.session.grid_cols = 4;
    SessionController::new(&config)
        .unwrap()
        .with_feedback(Arc::new(feedback.clone()))
        .with_store(store.clone())
        .with_transport(Arc::new(transport))
        .with_seed(5)
}

#[tokio::test(start_paused = true)]
async fn test_spoken_answers_through_the_runner() {
    let feedback = RecordingFeedback::new();
    let store = Arc::new(MemoryStore::new());
    let (tx, handle) = spawn_session(controller(30, &feedback, &store, MockTransport::new()));

    sleep(Duration::from_millis(10)).await;
    for _ in 0..3 {
        let target = feedback.last_target().expect("a cell is active");
        tx.send(SessionInput::Transcript(Some(word_for(target).to_string())))
            .await
            .unwrap();
        sleep(Duration::from_millis(1100)).await;
    }

    // Wrong answer, then the same transcript redelivered
    let target = feedback.last_target().unwrap();
    let wrong = word_for(wrong_for(target)).to_string();
    tx.send(SessionInput::Transcript(Some(wrong.clone())))
        .await
        .unwrap();
    tx.send(SessionInput::Transcript(Some(wrong))).await.unwrap();
    sleep(Duration::from_millis(100)).await;

    tx.send(SessionInput::Stop).await.unwrap();
    let result = handle.await.unwrap().unwrap();

    assert_eq!(result.correct_answers, 3);
    assert_eq!(result.total_attempts, 4);
    assert_eq!(result.accuracy, 75);
    assert_eq!(result.duration_seconds, 3);
    assert_eq!(store.history().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_ends_the_session() {
    let feedback = RecordingFeedback::new();
    let store = Arc::new(MemoryStore::new());
    let (tx, handle) = spawn_session(controller(4, &feedback, &store, MockTransport::new()));

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.duration_seconds, 4);
    assert_eq!(result.accuracy, 0);
    assert_eq!(
        feedback.count(|e| matches!(e, Feedback::Tick { .. })),
        4
    );
    assert_eq!(
        feedback.count(|e| matches!(e, Feedback::SessionEnded(_))),
        1
    );
    assert!(tx.is_closed());
}

#[tokio::test(start_paused = true)]
async fn test_manual_mode_through_the_runner() {
    let feedback = RecordingFeedback::new();
    let store = Arc::new(MemoryStore::new());
    let (tx, handle) = spawn_session(controller(
        30,
        &feedback,
        &store,
        MockTransport::failing(),
    ));

    sleep(Duration::from_millis(10)).await;
    let target = feedback.last_target().unwrap();
    tx.send(SessionInput::Direction(target)).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    drop(tx);

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.correct_answers, 1);
    assert_eq!(
        feedback.count(|e| matches!(e, Feedback::ManualMode { .. })),
        1
    );
}

#[tokio::test(start_paused = true)]
async fn test_layout_input_rebuilds_grid() {
    let feedback = RecordingFeedback::new();
    let store = Arc::new(MemoryStore::new());
    let (tx, handle) = spawn_session(controller(30, &feedback, &store, MockTransport::new()));

    sleep(Duration::from_millis(10)).await;
    tx.send(SessionInput::Layout(GridSize::new(2, 2)))
        .await
        .unwrap();
    // Invalid layouts are logged and ignored
    tx.send(SessionInput::Layout(GridSize::new(0, 2)))
        .await
        .unwrap();
    sleep(Duration::from_millis(10)).await;

    let activations: Vec<String> = feedback
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Feedback::CellActivated { cell_id, .. } => Some(cell_id),
            _ => None,
        })
        .collect();
    assert_eq!(activations.len(), 2);
    let (row, col) = activations[1].split_once('-').unwrap();
    assert!(row.parse::<usize>().unwrap() < 2);
    assert!(col.parse::<usize>().unwrap() < 2);

    tx.send(SessionInput::Stop).await.unwrap();
    assert!(handle.await.unwrap().is_ok());
}
