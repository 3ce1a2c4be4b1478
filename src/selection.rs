//! Cell Selection
//!
//! Chooses the next active cell at random while avoiding a third
//! consecutive presentation of the same direction. The rule is
//! best-effort: after `max_attempts` rejected picks the last candidate is
//! accepted anyway and the selection is flagged as relaxed.

use crate::direction::Direction;
use crate::error::{TrainerError, TrainerResult};
use crate::grid::{cell_id, Cell, Grid, GridSize};
use rand::Rng;
use tracing::{debug, warn};

/// Same-direction presentations allowed in a row
pub const MAX_CONSECUTIVE: u32 = 2;

/// Default pick budget per selection
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// Tracks runs of the same target direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionHistory {
    pub last_direction: Option<Direction>,
    pub consecutive_count: u32,
}

impl DirectionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether presenting `direction` next would extend a run past the limit
    pub fn blocks(&self, direction: Direction) -> bool {
        self.consecutive_count >= MAX_CONSECUTIVE && self.last_direction == Some(direction)
    }

    /// Record the direction of a newly activated cell
    pub fn record(&mut self, direction: Direction) {
        if self.last_direction == Some(direction) {
            self.consecutive_count += 1;
        } else {
            self.last_direction = Some(direction);
            self.consecutive_count = 1;
        }
    }
}

/// Source of (row, col) coordinates for candidate cells
pub trait CellPicker: Send {
    fn pick(&mut self, size: GridSize) -> (usize, usize);
}

/// Uniform random coordinates
#[derive(Debug, Clone)]
pub struct UniformPicker<R>(pub R);

impl<R: Rng + Send> CellPicker for UniformPicker<R> {
    fn pick(&mut self, size: GridSize) -> (usize, usize) {
        (
            self.0.gen_range(0..size.rows.max(1)),
            self.0.gen_range(0..size.cols.max(1)),
        )
    }
}

/// Outcome of one selection
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub cell: Cell,
    /// Picks consumed, including the accepted one
    pub attempts: usize,
    /// The anti-repetition rule could not be honored within the budget
    pub relaxed: bool,
}

/// Anti-repetition cell selector
#[derive(Debug, Clone, Copy)]
pub struct CellSelector {
    max_attempts: usize,
}

impl Default for CellSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl CellSelector {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Pick the next cell and update `history`.
    ///
    /// Fails with [`TrainerError::NoValidCell`] only when no pick landed on
    /// a cell of `grid` at all (a stale or inconsistent grid).
    pub fn select_next(
        &self,
        grid: &Grid,
        history: &mut DirectionHistory,
        picker: &mut dyn CellPicker,
    ) -> TrainerResult<Selection> {
        let mut last_candidate: Option<&Cell> = None;

        for attempt in 1..=self.max_attempts {
            let (row, col) = picker.pick(grid.size());
            let id = cell_id(row, col);

            let Some(cell) = grid.find(&id) else {
                warn!("⚠️ Attempt {}: cell {} has no direction, retrying", attempt, id);
                continue;
            };
            last_candidate = Some(cell);

            if history.blocks(cell.direction) {
                debug!(
                    "🎲 Attempt {}: {} already shown {} times in a row, retrying",
                    attempt, cell.direction, history.consecutive_count
                );
                continue;
            }

            history.record(cell.direction);
            debug!("🎲 Selected cell {} ({}) after {} attempts", cell.id, cell.direction, attempt);
            return Ok(Selection {
                cell: cell.clone(),
                attempts: attempt,
                relaxed: false,
            });
        }

        let cell = last_candidate.ok_or(TrainerError::NoValidCell {
            attempts: self.max_attempts,
        })?;

        warn!(
            "⚠️ No cell satisfied the repetition rule after {} attempts, using {} ({})",
            self.max_attempts, cell.id, cell.direction
        );
        history.record(cell.direction);
        Ok(Selection {
            cell: cell.clone(),
            attempts: self.max_attempts,
            relaxed: true,
        })
    }
}
