//! Evaluation lock
//!
//! Single-slot guard ensuring at most one utterance is scored at a time.
//! Overlapping attempts are rejected, never queued. The guard releases the
//! slot on drop, including during unwinding.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared handle to the lock; clones observe the same slot
#[derive(Debug, Clone, Default)]
pub struct EvaluationLock {
    held: Arc<AtomicBool>,
}

/// Proof of holding the lock
#[derive(Debug)]
pub struct EvaluationGuard {
    held: Arc<AtomicBool>,
}

impl EvaluationLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the slot, or `None` if an evaluation is already in flight
    pub fn try_acquire(&self) -> Option<EvaluationGuard> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| EvaluationGuard {
                held: Arc::clone(&self.held),
            })
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

impl Drop for EvaluationGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}
