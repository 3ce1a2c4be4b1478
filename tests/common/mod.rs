#![allow(dead_code)]

pub mod mock_feedback;
pub mod mock_transport;

use eyetrainer::clock::ManualClock;
use eyetrainer::config::TrainerConfig;
use eyetrainer::direction::Direction;
use eyetrainer::grid::{Grid, GridSize};
use eyetrainer::history::{MemoryStore, SessionStore};
use eyetrainer::selection::CellPicker;
use eyetrainer::session::SessionController;
use mock_feedback::RecordingFeedback;
use mock_transport::MockTransport;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// A controller on a manual clock with recording collaborators
pub struct TestContext {
    pub clock: Arc<ManualClock>,
    pub feedback: RecordingFeedback,
    pub transport: Arc<MockTransport>,
    pub store: Arc<MemoryStore>,
    pub controller: SessionController,
}

impl TestContext {
    pub fn new(rows: usize, cols: usize, duration_secs: u32) -> Self {
        let mut config = TrainerConfig::default();
        config.session.grid_rows = rows;
        config.session.grid_cols = cols;
        config.session.duration_secs = duration_secs;
        Self::with_config(config, MockTransport::new())
    }

    pub fn with_config(config: TrainerConfig, transport: MockTransport) -> Self {
        let clock = Arc::new(ManualClock::new());
        let feedback = RecordingFeedback::new();
        let transport = Arc::new(transport);
        let store = Arc::new(MemoryStore::new());

        let controller = SessionController::new(&config)
            .expect("Failed to build controller")
            .with_clock(clock.clone())
            .with_feedback(Arc::new(feedback.clone()))
            .with_transport(transport.clone())
            .with_store(store.clone())
            .with_seed(42);

        Self {
            clock,
            feedback,
            transport,
            store,
            controller,
        }
    }

    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.controller = self.controller.with_grid(grid);
        self
    }

    /// Advance virtual time and fire due timers
    pub fn step(&mut self, ms: u64) {
        self.clock.advance(Duration::from_millis(ms));
        self.controller.run_due();
    }

    /// Advance in 100ms steps, one `run_due` per step
    pub fn run_for(&mut self, ms: u64) {
        for _ in 0..ms / 100 {
            self.step(100);
        }
    }

    pub fn target(&self) -> Direction {
        self.controller
            .active_cell()
            .expect("no active cell")
            .direction
    }

    pub fn saved(&self) -> usize {
        self.store.history().unwrap().len()
    }
}

/// A word the default lexicon maps to `direction`
pub fn word_for(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "向上",
        Direction::Down => "下",
        Direction::Left => "left",
        Direction::Right => "右边",
    }
}

/// Any direction other than `direction`
pub fn wrong_for(direction: Direction) -> Direction {
    match direction {
        Direction::Up => Direction::Down,
        Direction::Down => Direction::Up,
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
    }
}

/// Picks coordinates from a script, then out-of-range ones
pub struct ScriptedPicker(pub VecDeque<(usize, usize)>);

impl ScriptedPicker {
    pub fn new(picks: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Self(picks.into_iter().collect())
    }
}

impl CellPicker for ScriptedPicker {
    fn pick(&mut self, _size: GridSize) -> (usize, usize) {
        self.0.pop_front().unwrap_or((usize::MAX, usize::MAX))
    }
}
