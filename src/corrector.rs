//! Mistake Corrector
//!
//! Optionally remaps a resolved direction to the expected target when the
//! pair is listed as a common confusion (e.g. a user who reliably says
//! "left" when meaning "right"). An empty table disables correction.

use crate::direction::Direction;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Confusion table: target -> resolved directions accepted as the target
pub type ConfusionTable = HashMap<Direction, HashSet<Direction>>;

/// Applies a fixed confusion table
#[derive(Debug, Clone, Default)]
pub struct MistakeCorrector {
    confusions: ConfusionTable,
}

impl MistakeCorrector {
    pub fn new(confusions: ConfusionTable) -> Self {
        Self { confusions }
    }

    /// Build from the config representation
    pub fn from_config(confusions: &BTreeMap<Direction, Vec<Direction>>) -> Self {
        Self::new(
            confusions
                .iter()
                .map(|(target, resolved)| (*target, resolved.iter().copied().collect()))
                .collect(),
        )
    }

    /// Return `target` if `resolved` is a known confusion for it, otherwise `resolved`
    pub fn correct(&self, resolved: Direction, target: Direction) -> Direction {
        correct(resolved, target, &self.confusions)
    }

    pub fn is_empty(&self) -> bool {
        self.confusions.values().all(HashSet::is_empty)
    }
}

/// Table-driven correction as a free function
pub fn correct(resolved: Direction, target: Direction, confusions: &ConfusionTable) -> Direction {
    if resolved == target {
        return resolved;
    }

    match confusions.get(&target) {
        Some(accepted) if accepted.contains(&resolved) => {
            debug!(
                "🔄 Correcting slip: heard {} while target is {}",
                resolved, target
            );
            target
        }
        _ => resolved,
    }
}
