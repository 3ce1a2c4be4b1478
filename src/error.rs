//! EyeTrainer Error Types
//!
//! Centralized error handling for the recognition and session engine.
//! Recoverable training conditions (unparsed utterances, duplicates,
//! rejected overlapping evaluations) are not errors; they are reported
//! as [`crate::session::SubmitOutcome`] values.

use thiserror::Error;

/// Central error type for EyeTrainer
#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("no cell with a resolvable direction after {attempts} attempts")]
    NoValidCell { attempts: usize },

    #[error("invalid grid size {rows}x{cols}: both dimensions must be at least 1")]
    InvalidGridSize { rows: usize, cols: usize },

    #[error("session has not been started")]
    NotStarted,

    #[error("session was already started")]
    AlreadyStarted,

    #[error("speech capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for EyeTrainer operations
pub type TrainerResult<T> = Result<T, TrainerError>;
