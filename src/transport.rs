//! Speech Transport
//!
//! The capture side of recognition. A transport produces transcripts and
//! hands them to the session through [`crate::runtime::SessionInput`]; the
//! controller only starts and stops it. When `start` fails the session
//! falls back to manual direction input.

use crate::error::{TrainerError, TrainerResult};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Trait for speech capture backends
pub trait SpeechTransport: Send + Sync {
    /// Begin capturing. Errors mean speech input is unavailable.
    fn start(&self) -> TrainerResult<()>;

    /// Stop capturing; must be safe to call repeatedly
    fn stop(&self);

    fn is_active(&self) -> bool;

    /// Get the transport name
    fn name(&self) -> &str;
}

/// Line-oriented transcripts typed or piped on stdin
#[derive(Debug, Default)]
pub struct StdinTransport {
    active: AtomicBool,
}

impl StdinTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpeechTransport for StdinTransport {
    fn start(&self) -> TrainerResult<()> {
        self.active.store(true, Ordering::Release);
        info!("🎤 Listening for transcripts on stdin");
        Ok(())
    }

    fn stop(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            debug!("🎤 Stdin transport stopped");
        }
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn name(&self) -> &str {
        "stdin"
    }
}

/// Starts successfully and captures nothing; transcripts arrive from elsewhere
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

impl SpeechTransport for NullTransport {
    fn start(&self) -> TrainerResult<()> {
        Ok(())
    }

    fn stop(&self) {}

    fn is_active(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// A transport that never starts, forcing manual input
#[derive(Debug, Clone)]
pub struct UnavailableTransport {
    reason: String,
}

impl UnavailableTransport {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SpeechTransport for UnavailableTransport {
    fn start(&self) -> TrainerResult<()> {
        Err(TrainerError::CaptureUnavailable(self.reason.clone()))
    }

    fn stop(&self) {}

    fn is_active(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
