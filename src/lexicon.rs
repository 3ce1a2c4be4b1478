//! Direction Lexicon
//!
//! Maps surface forms (words, compounds, digits, homophones) to canonical
//! directions. Lookup is a case-insensitive substring search that always
//! tries longer surface forms first, so a compound such as "向上" is never
//! shadowed by a single-character entry it contains.

use crate::direction::Direction;
use std::collections::HashMap;

/// A surface form and the direction it names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub surface: String,
    pub direction: Direction,
}

/// Immutable, longest-first surface form table
#[derive(Debug, Clone)]
pub struct DirectionLexicon {
    /// Sorted by descending char count, then surface form for a stable order
    entries: Vec<LexiconEntry>,
}

impl DirectionLexicon {
    /// Build a lexicon from (surface, direction) pairs.
    ///
    /// Surface forms are lowercased and trimmed; blank forms are dropped.
    /// If a surface form appears twice, the last one wins.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Direction)>,
        S: AsRef<str>,
    {
        let mut by_surface: HashMap<String, Direction> = HashMap::new();
        for (surface, direction) in entries {
            let surface = surface.as_ref().trim().to_lowercase();
            if !surface.is_empty() {
                by_surface.insert(surface, direction);
            }
        }

        let mut entries: Vec<LexiconEntry> = by_surface
            .into_iter()
            .map(|(surface, direction)| LexiconEntry { surface, direction })
            .collect();
        entries.sort_by(|a, b| {
            b.surface
                .chars()
                .count()
                .cmp(&a.surface.chars().count())
                .then_with(|| a.surface.cmp(&b.surface))
        });

        Self { entries }
    }

    /// Find the direction of the longest surface form contained in `cleaned`
    pub fn lookup(&self, cleaned: &str) -> Option<Direction> {
        self.lookup_entry(cleaned).map(|entry| entry.direction)
    }

    /// Like [`lookup`](Self::lookup), returning the matched entry
    pub fn lookup_entry(&self, cleaned: &str) -> Option<&LexiconEntry> {
        let haystack = cleaned.to_lowercase();
        self.entries
            .iter()
            .find(|entry| haystack.contains(entry.surface.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }
}

impl Default for DirectionLexicon {
    fn default() -> Self {
        Self::new(default_surface_forms())
    }
}

/// Built-in surface forms (literal polarity: 左 names LEFT)
pub fn default_surface_forms() -> HashMap<String, Direction> {
    use Direction::*;

    let table: &[(&str, Direction)] = &[
        // Basic words
        ("上", Up),
        ("下", Down),
        ("左", Left),
        ("右", Right),
        ("up", Up),
        ("down", Down),
        ("left", Left),
        ("right", Right),
        // Compounds (recognized more reliably than single characters)
        ("向上", Up),
        ("向下", Down),
        ("向左", Left),
        ("向右", Right),
        ("往上", Up),
        ("往下", Down),
        ("往左", Left),
        ("往右", Right),
        ("朝上", Up),
        ("朝下", Down),
        ("朝左", Left),
        ("朝右", Right),
        ("上面", Up),
        ("上方", Up),
        ("下面", Down),
        ("下方", Down),
        ("左边", Left),
        ("左侧", Left),
        ("左面", Left),
        ("右边", Right),
        ("右侧", Right),
        ("右面", Right),
        // Homophones and digits emitted by STT vendors
        ("商", Up),
        ("尚", Up),
        ("伤", Up),
        ("赏", Up),
        ("三", Up),
        ("3", Up),
        ("夏", Down),
        ("吓", Down),
        ("做", Left),
        ("作", Left),
        ("坐", Left),
        ("有", Right),
        ("又", Right),
        ("6", Right),
        // Extent and compass words
        ("顶", Up),
        ("北", Up),
        ("底", Down),
        ("南", Down),
        ("西", Left),
        ("东", Right),
    ];

    table
        .iter()
        .map(|(surface, direction)| (surface.to_string(), *direction))
        .collect()
}

/// Whole-transcript mistranscriptions that the initial-letter map would misfile
pub fn default_overrides() -> HashMap<String, Direction> {
    [
        ("sha", Direction::Down),
        ("shot", Direction::Down),
        ("show", Direction::Down),
        ("六", Direction::Right),
        ("liu", Direction::Right),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Romanized initials for the hanzi the phonetic stage knows about
pub fn default_initials() -> HashMap<String, String> {
    [
        ("上", "s"),
        ("商", "s"),
        ("尚", "s"),
        ("伤", "s"),
        ("赏", "s"),
        ("三", "s"),
        ("山", "s"),
        ("下", "x"),
        ("夏", "x"),
        ("吓", "x"),
        ("虾", "x"),
        ("左", "z"),
        ("做", "z"),
        ("作", "z"),
        ("坐", "z"),
        ("昨", "z"),
        ("右", "y"),
        ("有", "y"),
        ("又", "y"),
        ("友", "y"),
        ("油", "y"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Pinyin initial -> direction: s(hang) UP, x(ia) DOWN, z(uo) LEFT, y(ou) RIGHT.
///
/// English initials are not included; "light" has to reach the similarity
/// stage to be heard as "right". Add letters through
/// `resolver.initial_directions` in the config to opt in.
pub fn default_initial_directions() -> HashMap<String, Direction> {
    [
        ("s", Direction::Up),
        ("x", Direction::Down),
        ("z", Direction::Left),
        ("y", Direction::Right),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Pinyin syllables used to compare hanzi transcripts with direction words
pub fn default_romanizations() -> HashMap<String, String> {
    [
        ("上", "shang"),
        ("商", "shang"),
        ("尚", "shang"),
        ("伤", "shang"),
        ("赏", "shang"),
        ("山", "shan"),
        ("闪", "shan"),
        ("三", "san"),
        ("下", "xia"),
        ("夏", "xia"),
        ("吓", "xia"),
        ("虾", "xia"),
        ("霞", "xia"),
        ("瞎", "xia"),
        ("左", "zuo"),
        ("做", "zuo"),
        ("作", "zuo"),
        ("坐", "zuo"),
        ("昨", "zuo"),
        ("座", "zuo"),
        ("右", "you"),
        ("有", "you"),
        ("又", "you"),
        ("友", "you"),
        ("油", "you"),
        ("游", "you"),
        ("六", "liu"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
