//! Mock Speech Transport for Testing
//!
//! Counts start/stop calls and can be told to fail on start.

use eyetrainer::error::{TrainerError, TrainerResult};
use eyetrainer::transport::SpeechTransport;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct MockTransport {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    /// Simulate missing capture hardware
    pub should_fail: AtomicBool,
    active: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let mock = Self::default();
        mock.should_fail.store(true, Ordering::SeqCst);
        mock
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl SpeechTransport for MockTransport {
    fn start(&self) -> TrainerResult<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(TrainerError::CaptureUnavailable(
                "Mock capture failure".to_string(),
            ));
        }
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.active.store(false, Ordering::SeqCst);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
