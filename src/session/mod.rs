//! Training session state machine and its timing primitives

pub mod controller;
pub mod lock;
pub mod scheduler;
pub mod stats;

pub use controller::{InputMode, SessionController, SessionPhase, SubmitOutcome};
pub use lock::{EvaluationGuard, EvaluationLock};
pub use scheduler::{Scheduler, TimerId, TimerKind};
pub use stats::{SessionResult, SessionStats};
