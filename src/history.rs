//! Training History
//!
//! Persists finished sessions and derives aggregate statistics. The file
//! store keeps only the newest [`MAX_RECORDS`] sessions.

use crate::error::TrainerResult;
use crate::session::SessionResult;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Records kept by [`JsonHistoryStore`]
pub const MAX_RECORDS: usize = 50;

/// A persisted session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Milliseconds since the Unix epoch at save time, unique per store
    pub id: i64,
    /// RFC 3339
    pub timestamp: String,
    #[serde(flatten)]
    pub result: SessionResult,
}

/// Aggregates over the stored history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    pub total_sessions: usize,
    pub average_accuracy: u32,
    pub average_completed_cells: u32,
    pub best_accuracy: u8,
    /// Seconds
    pub total_training_time: u64,
}

impl HistoryStats {
    pub fn from_records(records: &[SessionRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let n = records.len() as f64;
        let accuracy_sum: u64 = records.iter().map(|r| u64::from(r.result.accuracy)).sum();
        let cells_sum: u64 = records
            .iter()
            .map(|r| u64::from(r.result.completed_cells))
            .sum();

        Self {
            total_sessions: records.len(),
            average_accuracy: (accuracy_sum as f64 / n).round() as u32,
            average_completed_cells: (cells_sum as f64 / n).round() as u32,
            best_accuracy: records.iter().map(|r| r.result.accuracy).max().unwrap_or(0),
            total_training_time: records
                .iter()
                .map(|r| u64::from(r.result.duration_seconds))
                .sum(),
        }
    }
}

/// Receiver for finished sessions
pub trait SessionStore: Send + Sync {
    /// Append a result, returning the stored record
    fn save(&self, result: &SessionResult) -> TrainerResult<SessionRecord>;

    /// All records, oldest first
    fn history(&self) -> TrainerResult<Vec<SessionRecord>>;

    fn clear(&self) -> TrainerResult<()>;

    fn stats(&self) -> TrainerResult<HistoryStats> {
        Ok(HistoryStats::from_records(&self.history()?))
    }

    /// Up to `limit` records, newest first
    fn recent(&self, limit: usize) -> TrainerResult<Vec<SessionRecord>> {
        let mut records = self.history()?;
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }

    /// Write the full history as pretty JSON. A directory target gets
    /// [`export_file_name`] for today. Returns the file written.
    fn export_to(&self, target: &Path) -> TrainerResult<PathBuf> {
        let path = if target.is_dir() {
            target.join(export_file_name(Local::now().date_naive()))
        } else {
            target.to_path_buf()
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let records = self.history()?;
        fs::write(&path, serde_json::to_string_pretty(&records)?)?;
        info!("📤 Exported {} session records to {}", records.len(), path.display());
        Ok(path)
    }
}

/// `eyetrainer_training_YYYY-MM-DD.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("eyetrainer_training_{}.json", date.format("%Y-%m-%d"))
}

fn new_record(result: &SessionResult, previous: Option<&SessionRecord>) -> SessionRecord {
    let now = Local::now();
    let mut id = now.timestamp_millis();
    if let Some(prev) = previous {
        id = id.max(prev.id + 1);
    }
    SessionRecord {
        id,
        timestamp: now.to_rfc3339(),
        result: *result,
    }
}

fn push_bounded(records: &mut Vec<SessionRecord>, record: SessionRecord, max: usize) {
    records.push(record);
    if records.len() > max {
        let excess = records.len() - max;
        records.drain(..excess);
    }
}

/// JSON file of session records
pub struct JsonHistoryStore {
    path: PathBuf,
    max_records: usize,
    records: Mutex<Vec<SessionRecord>>,
}

impl JsonHistoryStore {
    /// Open the store; a missing or unreadable file starts an empty history
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load_records(&path);
        debug!("📚 Loaded {} session records from {}", records.len(), path.display());
        Self {
            path,
            max_records: MAX_RECORDS,
            records: Mutex::new(records),
        }
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &[SessionRecord]) -> TrainerResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

fn load_records(path: &Path) -> Vec<SessionRecord> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!("⚠️ Failed to read history {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str(&content) {
        Ok(records) => records,
        Err(e) => {
            warn!("⚠️ History file corrupted, starting fresh: {}", e);
            let backup_path = path.with_extension("json.corrupt");
            let _ = fs::rename(path, &backup_path);
            Vec::new()
        }
    }
}

impl SessionStore for JsonHistoryStore {
    fn save(&self, result: &SessionResult) -> TrainerResult<SessionRecord> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let record = new_record(result, records.last());
        push_bounded(&mut records, record.clone(), self.max_records);
        self.persist(&records)?;
        info!("💾 Saved session {} ({}%)", record.id, record.result.accuracy);
        Ok(record)
    }

    fn history(&self) -> TrainerResult<Vec<SessionRecord>> {
        Ok(self.records.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn clear(&self) -> TrainerResult<()> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.clear();
        self.persist(&records)?;
        info!("🗑️ Training history cleared");
        Ok(())
    }
}

/// In-process store, nothing touches disk
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SessionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, result: &SessionResult) -> TrainerResult<SessionRecord> {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        let record = new_record(result, records.last());
        push_bounded(&mut records, record.clone(), MAX_RECORDS);
        Ok(record)
    }

    fn history(&self) -> TrainerResult<Vec<SessionRecord>> {
        Ok(self.records.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn clear(&self) -> TrainerResult<()> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clear();
        Ok(())
    }
}
