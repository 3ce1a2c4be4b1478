//! Mock Feedback Sink for Testing
//!
//! Records every event for verification.

use eyetrainer::direction::Direction;
use eyetrainer::feedback::{Feedback, FeedbackSink};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default, Clone)]
pub struct RecordingFeedback {
    pub events: Arc<Mutex<Vec<Feedback>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Feedback> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Feedback) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }

    /// Target of the most recently activated cell
    pub fn last_target(&self) -> Option<Direction> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|e| match e {
                Feedback::CellActivated { direction, .. } => Some(*direction),
                _ => None,
            })
    }
}

impl FeedbackSink for RecordingFeedback {
    fn notify(&self, event: Feedback) {
        self.events.lock().unwrap().push(event);
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_events() {
        let sink = RecordingFeedback::new();
        sink.notify(Feedback::PleaseRepeat);
        sink.notify(Feedback::CellActivated {
            cell_id: "0-0".into(),
            direction: Direction::Left,
        });
        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.last_target(), Some(Direction::Left));
    }
}
