//! Session statistics and the final result

use serde::{Deserialize, Serialize};

/// Running counters for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_attempts: u32,
    pub correct_answers: u32,
    /// Only correct answers advance the cell, so this tracks `correct_answers`
    pub completed_cells: u32,
}

impl SessionStats {
    pub fn record_correct(&mut self) {
        self.total_attempts += 1;
        self.correct_answers += 1;
        self.completed_cells += 1;
    }

    pub fn record_incorrect(&mut self) {
        self.total_attempts += 1;
    }

    /// Rounded percentage of correct attempts, 0 when nothing was attempted
    pub fn accuracy(&self) -> u8 {
        accuracy(self.correct_answers, self.total_attempts)
    }
}

/// Immutable summary handed to persistence once a session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub total_attempts: u32,
    pub correct_answers: u32,
    pub completed_cells: u32,
    /// 0 - 100
    pub accuracy: u8,
    pub duration_seconds: u32,
}

impl SessionResult {
    pub fn from_stats(stats: SessionStats, duration_seconds: u32) -> Self {
        Self {
            total_attempts: stats.total_attempts,
            correct_answers: stats.correct_answers,
            completed_cells: stats.completed_cells,
            accuracy: stats.accuracy(),
            duration_seconds,
        }
    }
}

pub fn accuracy(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (100.0 * f64::from(correct) / f64::from(total)).round();
    pct.clamp(0.0, 100.0) as u8
}
