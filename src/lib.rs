//! EyeTrainer Library
//!
//! Direction recognition and session scoring for tumbling-E vision
//! training: noisy transcripts in, scored training sessions out.

pub mod clock;
pub mod config;
pub mod core;
pub mod corrector;
pub mod direction;
pub mod error;
pub mod feedback;
pub mod grid;
pub mod history;
pub mod lexicon;
pub mod resolver;
pub mod runtime;
pub mod selection;
pub mod session;
pub mod transport;
pub mod utils;

pub use direction::{Direction, Polarity, DEFAULT_POLARITY};
pub use error::{TrainerError, TrainerResult};
pub use resolver::DirectionResolver;
pub use session::{SessionController, SessionResult, SubmitOutcome};
