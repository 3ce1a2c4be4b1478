//! Async session runner
//!
//! Drives a [`SessionController`] on a single tokio task. Inputs and timer
//! deadlines are multiplexed with `select!`, so the controller is only ever
//! touched from one place and inputs are handled one at a time.

use crate::direction::Direction;
use crate::error::TrainerResult;
use crate::grid::GridSize;
use crate::session::{SessionController, SessionPhase, SessionResult};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Input channel capacity for [`spawn_session`]
pub const INPUT_BUFFER: usize = 32;

/// Something for the session to act on
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    /// Final transcript from the speech transport; `None` for an empty result
    Transcript(Option<String>),
    /// Direct direction input
    Direction(Direction),
    /// The viewport changed; rebuild the grid
    Layout(GridSize),
    Stop,
}

/// Start the session on a new task. Dropping every sender ends it.
pub fn spawn_session(
    controller: SessionController,
) -> (
    mpsc::Sender<SessionInput>,
    JoinHandle<TrainerResult<SessionResult>>,
) {
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    let handle = tokio::spawn(run_session(controller, rx));
    (tx, handle)
}

/// Run until the countdown expires, `Stop` arrives or the channel closes
pub async fn run_session(
    mut controller: SessionController,
    mut inputs: mpsc::Receiver<SessionInput>,
) -> TrainerResult<SessionResult> {
    if controller.phase() == SessionPhase::Idle {
        controller.start()?;
    }

    while controller.phase() != SessionPhase::Ended {
        let deadline = controller.next_deadline();

        tokio::select! {
            biased;

            input = inputs.recv() => match input {
                Some(SessionInput::Stop) => {
                    info!("🛑 Stop requested");
                    break;
                }
                None => {
                    debug!("Input channel closed");
                    break;
                }
                Some(input) => handle_input(&mut controller, input),
            },

            _ = wait_until(deadline) => {
                controller.run_due();
            }
        }
    }

    controller.end()
}

fn handle_input(controller: &mut SessionController, input: SessionInput) {
    let outcome = match input {
        SessionInput::Transcript(text) => controller.submit_utterance(text.as_deref()),
        SessionInput::Direction(direction) => controller.submit_direction(direction),
        SessionInput::Layout(size) => {
            if let Err(e) = controller.regenerate_grid(size) {
                warn!("⚠️ Ignoring layout {}: {}", size, e);
            }
            return;
        }
        SessionInput::Stop => return,
    };

    match outcome {
        Ok(outcome) => debug!("Submission: {:?}", outcome),
        Err(e) => warn!("⚠️ Submission failed: {}", e),
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainerConfig;
    use std::time::Duration;

    fn controller(duration_secs: u32) -> SessionController {
        let mut config = TrainerConfig::default();
        config.session.duration_secs = duration_secs;
        SessionController::new(&config).unwrap().with_seed(11)
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_on_its_own() {
        let (_tx, handle) = spawn_session(controller(5));
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.duration_seconds, 5);
        assert_eq!(result.total_attempts, 0);
        assert_eq!(result.accuracy, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_early() {
        let (tx, handle) = spawn_session(controller(60));
        tokio::time::sleep(Duration::from_millis(3500)).await;
        tx.send(SessionInput::Stop).await.unwrap();
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.duration_seconds, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closing_channel_ends_session() {
        let (tx, handle) = spawn_session(controller(60));
        tx.send(SessionInput::Transcript(Some("hello".into())))
            .await
            .unwrap();
        drop(tx);
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.total_attempts, 0);
        assert_eq!(result.duration_seconds, 0);
    }
}
