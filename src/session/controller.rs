//! Session Controller
//!
//! Owns one training session: the grid, the active cell, statistics and
//! every timer. Time only moves when the driver calls [`SessionController::run_due`];
//! nothing in here sleeps or spawns.
//!
//! ```text
//! Idle -> CellActive <-> Evaluating
//!             |  ^
//!   correct   v  | advance timer
//!          Advancing
//! any running phase -> Ended
//! ```

use super::lock::EvaluationLock;
use super::scheduler::{Scheduler, TimerId, TimerKind};
use super::stats::{SessionResult, SessionStats};
use crate::clock::{Clock, TokioClock};
use crate::config::{SessionSettings, TrainerConfig};
use crate::corrector::MistakeCorrector;
use crate::direction::Direction;
use crate::error::{TrainerError, TrainerResult};
use crate::feedback::{Feedback, FeedbackSink, NullFeedback};
use crate::grid::{Cell, FixedLayout, Grid, GridSize, LayoutProvider};
use crate::history::{MemoryStore, SessionStore};
use crate::resolver::DirectionResolver;
use crate::selection::{CellPicker, CellSelector, DirectionHistory, UniformPicker};
use crate::transport::{NullTransport, SpeechTransport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    /// Waiting for an answer to the active cell
    CellActive,
    /// Scoring an answer
    Evaluating,
    /// Correct answer given; next cell pending
    Advancing,
    Ended,
}

impl SessionPhase {
    pub fn is_running(self) -> bool {
        matches!(
            self,
            SessionPhase::CellActive | SessionPhase::Evaluating | SessionPhase::Advancing
        )
    }
}

/// Where answers come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Speech,
    /// Speech capture failed to start; answers are direction buttons
    Manual,
}

/// What happened to one submitted answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Correct { direction: Direction },
    Incorrect { answered: Direction, expected: Direction },
    /// No direction could be resolved; nothing was counted
    Unparsed,
    /// Same direction as the last accepted answer, inside the duplicate window
    DuplicateSuppressed,
    /// Another evaluation holds the lock
    ConcurrentRejected,
    /// No cell is awaiting an answer (advancing or ended)
    Ignored,
}

pub struct SessionController {
    settings: SessionSettings,
    resolver: DirectionResolver,
    corrector: MistakeCorrector,
    selector: CellSelector,
    picker: Box<dyn CellPicker>,
    grid_rng: StdRng,

    clock: Arc<dyn Clock>,
    feedback: Arc<dyn FeedbackSink>,
    store: Arc<dyn SessionStore>,
    transport: Arc<dyn SpeechTransport>,
    layout: Arc<dyn LayoutProvider>,

    phase: SessionPhase,
    input_mode: InputMode,
    grid: Option<Grid>,
    active_cell: Option<String>,
    history: DirectionHistory,
    stats: SessionStats,
    remaining_secs: u32,
    result: Option<SessionResult>,

    scheduler: Scheduler,
    lock: EvaluationLock,
    last_accepted: Option<(Direction, Instant)>,
    cell_error: bool,
    clear_error_timer: Option<TimerId>,
    advance_timer: Option<TimerId>,
}

impl SessionController {
    /// Build a controller with default collaborators: tokio clock, no
    /// feedback, in-memory history and a transport that always starts.
    pub fn new(config: &TrainerConfig) -> TrainerResult<Self> {
        let settings = config.session.clone();
        let layout = FixedLayout(GridSize::new(settings.grid_rows, settings.grid_cols));

        Ok(Self {
            resolver: DirectionResolver::new(&config.resolver)?,
            corrector: MistakeCorrector::from_config(&config.confusions),
            selector: CellSelector::new(settings.max_pick_attempts),
            picker: Box::new(UniformPicker(StdRng::from_entropy())),
            grid_rng: StdRng::from_entropy(),
            clock: Arc::new(TokioClock),
            feedback: Arc::new(NullFeedback),
            store: Arc::new(MemoryStore::new()),
            transport: Arc::new(NullTransport),
            layout: Arc::new(layout),
            phase: SessionPhase::Idle,
            input_mode: InputMode::Speech,
            grid: None,
            active_cell: None,
            history: DirectionHistory::new(),
            stats: SessionStats::default(),
            remaining_secs: settings.duration_secs,
            result: None,
            scheduler: Scheduler::new(),
            lock: EvaluationLock::new(),
            last_accepted: None,
            cell_error: false,
            clear_error_timer: None,
            advance_timer: None,
            settings,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_feedback(mut self, feedback: Arc<dyn FeedbackSink>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn SpeechTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_layout(mut self, layout: Arc<dyn LayoutProvider>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_picker(mut self, picker: Box<dyn CellPicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Seed grid generation and cell picking for reproducible sessions
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.grid_rng = StdRng::seed_from_u64(seed);
        self.picker = Box::new(UniformPicker(StdRng::seed_from_u64(seed.wrapping_add(1))));
        self
    }

    /// Use this grid on start instead of generating one from the layout
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Begin the session: build the grid, activate the first cell, start
    /// the countdown and the speech transport.
    pub fn start(&mut self) -> TrainerResult<()> {
        if self.phase != SessionPhase::Idle {
            return Err(TrainerError::AlreadyStarted);
        }

        self.stats = SessionStats::default();
        self.history = DirectionHistory::new();

        let grid = match self.grid.take() {
            Some(grid) => grid,
            None => Grid::generate(self.layout.grid_size(), &mut self.grid_rng)?,
        };
        let selection = self
            .selector
            .select_next(&grid, &mut self.history, self.picker.as_mut());
        self.grid = Some(grid);
        let selection = selection?;

        self.input_mode = match self.transport.start() {
            Ok(()) => InputMode::Speech,
            Err(e) => {
                warn!("⚠️ Transport '{}' failed to start: {}", self.transport.name(), e);
                self.feedback.notify(Feedback::ManualMode {
                    reason: e.to_string(),
                });
                InputMode::Manual
            }
        };

        let now = self.clock.now();
        self.remaining_secs = self.settings.duration_secs;
        if self.remaining_secs == 0 {
            self.scheduler.schedule_at(now, TimerKind::Expire);
        } else {
            self.scheduler.schedule_at(now + TICK, TimerKind::Tick);
        }

        info!(
            "🚀 Session started: {}s, {} grid, {:?} input",
            self.settings.duration_secs,
            self.grid.as_ref().map(Grid::size).unwrap_or(GridSize::new(0, 0)),
            self.input_mode
        );
        self.activate(selection.cell);
        Ok(())
    }

    /// Score a transcript from the speech transport
    pub fn submit_utterance(&mut self, transcript: Option<&str>) -> TrainerResult<SubmitOutcome> {
        self.ensure_started()?;
        if self.phase != SessionPhase::CellActive {
            debug!("Ignoring transcript {:?} in {:?}", transcript, self.phase);
            return Ok(SubmitOutcome::Ignored);
        }
        let Some(_guard) = self.lock.try_acquire() else {
            debug!("🔒 Evaluation in flight, rejecting {:?}", transcript);
            return Ok(SubmitOutcome::ConcurrentRejected);
        };

        self.phase = SessionPhase::Evaluating;
        let Some(resolved) = self.resolver.resolve(transcript) else {
            debug!("🤷 Could not resolve {:?}", transcript);
            self.phase = SessionPhase::CellActive;
            self.feedback.notify(Feedback::PleaseRepeat);
            return Ok(SubmitOutcome::Unparsed);
        };

        let now = self.clock.now();
        if let Some((last, at)) = self.last_accepted {
            if last == resolved && now.duration_since(at) < self.settings.duplicate_window() {
                debug!("♻️ Duplicate {} within window, skipped", resolved);
                self.phase = SessionPhase::CellActive;
                return Ok(SubmitOutcome::DuplicateSuppressed);
            }
        }
        self.last_accepted = Some((resolved, now));

        Ok(self.score(resolved))
    }

    /// Score a direction chosen directly (manual mode buttons). Skips the
    /// resolver and duplicate suppression.
    pub fn submit_direction(&mut self, direction: Direction) -> TrainerResult<SubmitOutcome> {
        self.ensure_started()?;
        if self.phase != SessionPhase::CellActive {
            return Ok(SubmitOutcome::Ignored);
        }
        let Some(_guard) = self.lock.try_acquire() else {
            return Ok(SubmitOutcome::ConcurrentRejected);
        };

        self.phase = SessionPhase::Evaluating;
        Ok(self.score(direction))
    }

    fn score(&mut self, answered: Direction) -> SubmitOutcome {
        let Some(target) = self.active_cell().map(|cell| cell.direction) else {
            self.phase = SessionPhase::CellActive;
            return SubmitOutcome::Ignored;
        };
        let answered = self.corrector.correct(answered, target);
        let now = self.clock.now();

        if answered == target {
            self.stats.record_correct();
            self.phase = SessionPhase::Advancing;
            self.advance_timer = Some(
                self.scheduler
                    .schedule_at(now + self.settings.advance_delay(), TimerKind::Advance),
            );
            info!(
                "✅ Correct {} ({}/{})",
                target, self.stats.correct_answers, self.stats.total_attempts
            );
            self.feedback.notify(Feedback::Correct { direction: target });
            SubmitOutcome::Correct { direction: target }
        } else {
            self.stats.record_incorrect();
            self.phase = SessionPhase::CellActive;
            self.cell_error = true;
            if let Some(id) = self.clear_error_timer.take() {
                self.scheduler.cancel(id);
            }
            self.clear_error_timer = Some(
                self.scheduler
                    .schedule_at(now + self.settings.error_flash(), TimerKind::ClearError),
            );
            info!("❌ Heard {}, target {}", answered, target);
            self.feedback.notify(Feedback::Incorrect {
                answered,
                expected: target,
            });
            SubmitOutcome::Incorrect {
                answered,
                expected: target,
            }
        }
    }

    /// Fire every timer due at the current time. A late call counts down
    /// every whole second that has already passed. Timers scheduled while
    /// firing wait for the next call, which defers expiry by one turn.
    /// Returns how many timers fired.
    pub fn run_due(&mut self) -> usize {
        let now = self.clock.now();
        let due = self.scheduler.take_due(now);
        let mut fired = 0;

        for timer in due {
            if self.phase == SessionPhase::Ended {
                break;
            }
            fired += 1;
            match timer.kind {
                TimerKind::Tick => self.on_tick(timer.deadline, now),
                TimerKind::Expire => {
                    info!("⏰ Time is up");
                    if let Err(e) = self.end() {
                        warn!("⚠️ Failed to end session on expiry: {}", e);
                    }
                }
                TimerKind::Advance => self.on_advance(timer.id),
                TimerKind::ClearError => {
                    if self.clear_error_timer == Some(timer.id) {
                        self.clear_error_timer = None;
                        self.cell_error = false;
                        self.feedback.notify(Feedback::ErrorCleared);
                    }
                }
            }
        }
        fired
    }

    fn on_tick(&mut self, deadline: Instant, now: Instant) {
        let mut next = deadline;
        loop {
            self.remaining_secs = self.remaining_secs.saturating_sub(1);
            self.feedback.notify(Feedback::Tick {
                remaining_secs: self.remaining_secs,
            });
            next += TICK;
            if self.remaining_secs == 0 || next > now {
                break;
            }
        }

        if self.remaining_secs == 0 {
            self.scheduler.schedule_at(now, TimerKind::Expire);
        } else {
            self.scheduler.schedule_at(next, TimerKind::Tick);
        }
    }

    fn on_advance(&mut self, id: TimerId) {
        if self.advance_timer != Some(id) {
            return;
        }
        self.advance_timer = None;
        if self.phase != SessionPhase::Advancing {
            return;
        }

        let Some(grid) = self.grid.as_ref() else {
            self.phase = SessionPhase::CellActive;
            return;
        };
        match self
            .selector
            .select_next(grid, &mut self.history, self.picker.as_mut())
        {
            Ok(selection) => self.activate(selection.cell),
            Err(e) => {
                warn!("⚠️ Keeping current cell: {}", e);
                self.last_accepted = None;
                self.phase = SessionPhase::CellActive;
            }
        }
    }

    fn activate(&mut self, cell: Cell) {
        debug!("👁️ Active cell {} ({})", cell.id, cell.direction);
        self.feedback.notify(Feedback::CellActivated {
            cell_id: cell.id.clone(),
            direction: cell.direction,
        });
        self.active_cell = Some(cell.id);
        self.last_accepted = None;
        self.cell_error = false;
        if let Some(id) = self.clear_error_timer.take() {
            self.scheduler.cancel(id);
        }
        self.phase = SessionPhase::CellActive;
    }

    /// Replace the grid after a layout change and pick a fresh active cell.
    /// Repetition history carries over. Before start this only swaps the
    /// grid used by [`start`](Self::start).
    pub fn regenerate_grid(&mut self, size: GridSize) -> TrainerResult<()> {
        if self.phase == SessionPhase::Ended {
            return Ok(());
        }

        let grid = Grid::generate(size, &mut self.grid_rng)?;
        info!("📐 Layout changed, regenerated {} grid", size);

        if self.phase == SessionPhase::Idle {
            self.grid = Some(grid);
            return Ok(());
        }

        let selection = self
            .selector
            .select_next(&grid, &mut self.history, self.picker.as_mut())?;
        self.grid = Some(grid);
        if let Some(id) = self.advance_timer.take() {
            self.scheduler.cancel(id);
        }
        self.activate(selection.cell);
        Ok(())
    }

    /// Stop the session and produce its result. Persists and notifies
    /// once; later calls return the same result.
    pub fn end(&mut self) -> TrainerResult<SessionResult> {
        match self.phase {
            SessionPhase::Idle => return Err(TrainerError::NotStarted),
            SessionPhase::Ended => return self.result.ok_or(TrainerError::NotStarted),
            _ => {}
        }

        self.scheduler.cancel_all();
        self.advance_timer = None;
        self.clear_error_timer = None;
        self.cell_error = false;
        self.transport.stop();

        let elapsed = self.settings.duration_secs.saturating_sub(self.remaining_secs);
        let result = SessionResult::from_stats(self.stats, elapsed);
        self.phase = SessionPhase::Ended;
        self.result = Some(result);

        info!(
            "🏁 Session ended: {}/{} correct ({}%) in {}s",
            result.correct_answers, result.total_attempts, result.accuracy, result.duration_seconds
        );
        if let Err(e) = self.store.save(&result) {
            warn!("⚠️ Failed to save session result: {}", e);
        }
        self.feedback.notify(Feedback::SessionEnded(result));
        Ok(result)
    }

    fn ensure_started(&self) -> TrainerResult<()> {
        if self.phase == SessionPhase::Idle {
            return Err(TrainerError::NotStarted);
        }
        Ok(())
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase.is_running()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn active_cell(&self) -> Option<&Cell> {
        let id = self.active_cell.as_deref()?;
        self.grid.as_ref()?.find(id)
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn direction_history(&self) -> DirectionHistory {
        self.history
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// The active cell shows a transient error highlight
    pub fn cell_error(&self) -> bool {
        self.cell_error
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn result(&self) -> Option<SessionResult> {
        self.result
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    /// True while a submission is being scored
    pub fn is_evaluating(&self) -> bool {
        self.lock.is_held()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
        if self.phase.is_running() {
            self.transport.stop();
        }
    }
}
