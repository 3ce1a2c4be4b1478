use crate::direction::{Direction, Polarity, DEFAULT_POLARITY};
use crate::lexicon;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
/// Every field is optional on disk; missing ones come from `Default`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    pub session: SessionSettings,
    pub resolver: ResolverSettings,

    /// target -> resolved directions treated as a slip of the tongue.
    /// Empty means no correction.
    pub confusions: BTreeMap<Direction, Vec<Direction>>,

    // Meta
    pub log_level: String,
    pub history_path: Option<PathBuf>,
}

/// Timing and grid settings for a training session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub duration_secs: u32,
    pub advance_delay_ms: u64,
    pub error_flash_ms: u64,
    pub duplicate_window_ms: u64,
    pub max_pick_attempts: usize,
    pub grid_rows: usize,
    pub grid_cols: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            duration_secs: 120,
            advance_delay_ms: 1000,
            error_flash_ms: 1500,
            duplicate_window_ms: 2000,
            max_pick_attempts: 10,
            grid_rows: 6,
            grid_cols: 8,
        }
    }
}

impl SessionSettings {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs))
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }

    pub fn error_flash(&self) -> Duration {
        Duration::from_millis(self.error_flash_ms)
    }

    pub fn duplicate_window(&self) -> Duration {
        Duration::from_millis(self.duplicate_window_ms)
    }
}

/// Tables and thresholds for transcript resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub similarity_enabled: bool,
    pub similarity_threshold: f64,
    pub polarity: Polarity,
    /// surface form -> direction, substring matched, longest first
    pub lexicon: HashMap<String, Direction>,
    /// whole-transcript exact matches tried before the initial-letter map
    pub overrides: HashMap<String, Direction>,
    /// hanzi -> romanized initial letter
    pub initials: HashMap<String, String>,
    /// initial letter -> direction
    pub initial_directions: HashMap<String, Direction>,
    /// hanzi -> romanized syllable, used by the similarity stage
    pub romanizations: HashMap<String, String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            similarity_enabled: true,
            similarity_threshold: 0.7,
            polarity: DEFAULT_POLARITY,
            lexicon: lexicon::default_surface_forms(),
            overrides: lexicon::default_overrides(),
            initials: lexicon::default_initials(),
            initial_directions: lexicon::default_initial_directions(),
            romanizations: lexicon::default_romanizations(),
        }
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            session: SessionSettings::default(),
            resolver: ResolverSettings::default(),
            confusions: BTreeMap::new(),
            log_level: "INFO".to_string(),
            history_path: None,
        }
    }
}

impl TrainerConfig {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from a file; missing or corrupt files yield defaults
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                // Keep the broken file around for inspection
                let backup_path = config_path.with_extension("json.corrupt");
                let _ = std::fs::rename(config_path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Where training history is persisted
    pub fn history_file(&self) -> PathBuf {
        self.history_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("eyetrainer")
                .join("history.json")
        })
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("eyetrainer")
        .join("config.json")
}
