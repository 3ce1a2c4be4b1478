//! Feedback Module
//!
//! Events the session emits toward the presentation layer (display,
//! audio cues, spoken prompts). Sinks must not block; the controller
//! calls them inline.

use crate::direction::Direction;
use crate::session::SessionResult;
use tracing::{debug, info, warn};

/// Something the user should see or hear
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    /// A new target cell is active
    CellActivated { cell_id: String, direction: Direction },
    /// Answer matched the target
    Correct { direction: Direction },
    /// Answer was a valid direction but not the target
    Incorrect {
        answered: Direction,
        expected: Direction,
    },
    /// Transcript did not resolve to a direction
    PleaseRepeat,
    /// The transient error highlight on the active cell went away
    ErrorCleared,
    /// Countdown update, whole seconds left
    Tick { remaining_secs: u32 },
    /// Speech capture is unavailable; answers come from direct input
    ManualMode { reason: String },
    SessionEnded(SessionResult),
}

/// Receiver for session feedback
pub trait FeedbackSink: Send + Sync {
    fn notify(&self, event: Feedback);

    /// Get the sink name
    fn name(&self) -> &str;
}

/// Writes feedback to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn notify(&self, event: Feedback) {
        match event {
            Feedback::CellActivated { cell_id, direction } => {
                info!("👁️ Next cell {} ({})", cell_id, direction.chinese())
            }
            Feedback::Correct { direction } => info!("✅ Correct: {}", direction),
            Feedback::Incorrect { answered, expected } => {
                info!("❌ Heard {}, expected {}", answered, expected)
            }
            Feedback::PleaseRepeat => info!("🔁 Please repeat"),
            Feedback::ErrorCleared => debug!("Error highlight cleared"),
            Feedback::Tick { remaining_secs } => debug!("⏱️ {}s left", remaining_secs),
            Feedback::ManualMode { reason } => {
                warn!("⌨️ Speech capture unavailable ({}), switching to manual input", reason)
            }
            Feedback::SessionEnded(result) => info!(
                "🏁 Session over: {}/{} correct ({}%), {} cells in {}s",
                result.correct_answers,
                result.total_attempts,
                result.accuracy,
                result.completed_cells,
                result.duration_seconds
            ),
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn notify(&self, _event: Feedback) {}

    fn name(&self) -> &str {
        "null"
    }
}
