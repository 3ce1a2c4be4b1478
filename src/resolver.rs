//! Direction Resolver
//!
//! Turns a noisy transcript into a canonical direction using layered
//! stages; the first stage to produce a direction wins:
//!
//! 1. Lexicon: longest surface form contained in the cleaned text
//! 2. Phonetic: exact override table, then the transcript's initial
//!    (romanized initial for hanzi, the letter itself for Latin/digits)
//! 3. Similarity: edit-distance against each direction's reference words
//!
//! The configured [`Polarity`] is applied once, to the final result.

use crate::config::ResolverSettings;
use crate::core::TranscriptNormalizer;
use crate::direction::{Direction, Polarity};
use crate::error::{TrainerError, TrainerResult};
use crate::lexicon::DirectionLexicon;
use crate::utils::fuzzy;
use std::collections::HashMap;
use tracing::debug;

/// Which stage produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveStage {
    Lexicon,
    Override,
    Initial,
    Similarity,
}

/// A successful resolution with provenance, for logging and diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub direction: Direction,
    pub stage: ResolveStage,
    pub cleaned: String,
}

/// Immutable transcript-to-direction resolver. Build a new one to change tables.
#[derive(Debug, Clone)]
pub struct DirectionResolver {
    normalizer: TranscriptNormalizer,
    lexicon: DirectionLexicon,
    overrides: HashMap<String, Direction>,
    initials: HashMap<char, char>,
    initial_directions: HashMap<char, Direction>,
    romanizations: HashMap<char, String>,
    /// (reference word, direction) pairs; `None` disables the stage
    references: Option<Vec<(String, Direction)>>,
    similarity_threshold: f64,
    polarity: Polarity,
}

impl DirectionResolver {
    /// Build a resolver from configuration tables
    pub fn new(settings: &ResolverSettings) -> TrainerResult<Self> {
        if !(0.0..=1.0).contains(&settings.similarity_threshold) {
            return Err(TrainerError::Config(format!(
                "similarity_threshold must be within 0..=1, got {}",
                settings.similarity_threshold
            )));
        }

        let initials = settings
            .initials
            .iter()
            .map(|(hanzi, initial)| Ok((single_char(hanzi)?, single_char(initial)?)))
            .collect::<TrainerResult<HashMap<char, char>>>()?;

        let initial_directions = settings
            .initial_directions
            .iter()
            .map(|(initial, direction)| Ok((single_char(initial)?, *direction)))
            .collect::<TrainerResult<HashMap<char, Direction>>>()?;

        let romanizations = settings
            .romanizations
            .iter()
            .map(|(hanzi, syllable)| Ok((single_char(hanzi)?, syllable.to_lowercase())))
            .collect::<TrainerResult<HashMap<char, String>>>()?;

        let overrides = settings
            .overrides
            .iter()
            .map(|(surface, direction)| (surface.trim().to_lowercase(), *direction))
            .collect();

        let mut resolver = Self {
            normalizer: TranscriptNormalizer::new(),
            lexicon: DirectionLexicon::new(
                settings.lexicon.iter().map(|(s, d)| (s.as_str(), *d)),
            ),
            overrides,
            initials,
            initial_directions,
            romanizations,
            references: None,
            similarity_threshold: settings.similarity_threshold,
            polarity: settings.polarity,
        };

        if settings.similarity_enabled {
            resolver.references = Some(resolver.reference_words());
        }

        Ok(resolver)
    }

    /// Resolve a transcript; empty or absent input yields `None`
    pub fn resolve<'a>(&self, transcript: impl Into<Option<&'a str>>) -> Option<Direction> {
        self.resolve_detailed(transcript).map(|r| r.direction)
    }

    /// Resolve a transcript and report which stage matched
    pub fn resolve_detailed<'a>(
        &self,
        transcript: impl Into<Option<&'a str>>,
    ) -> Option<Resolution> {
        let cleaned = self.normalizer.normalize(transcript.into()?);
        if cleaned.is_empty() {
            return None;
        }

        let (spoken, stage) = self.match_spoken(&cleaned)?;
        let direction = self.polarity.apply(spoken);
        debug!(
            "🎯 Resolved '{}' -> {} via {:?} (polarity {:?})",
            cleaned, direction, stage, self.polarity
        );

        Some(Resolution {
            direction,
            stage,
            cleaned,
        })
    }

    fn match_spoken(&self, cleaned: &str) -> Option<(Direction, ResolveStage)> {
        if let Some(entry) = self.lexicon.lookup_entry(cleaned) {
            debug!("Lexicon hit: '{}' in '{}'", entry.surface, cleaned);
            return Some((entry.direction, ResolveStage::Lexicon));
        }

        if let Some(direction) = self.overrides.get(cleaned) {
            return Some((*direction, ResolveStage::Override));
        }

        if let Some(initial) = self.initial_of(cleaned) {
            if let Some(direction) = self.initial_directions.get(&initial) {
                debug!("Initial '{}' of '{}' -> {}", initial, cleaned, direction);
                return Some((*direction, ResolveStage::Initial));
            }
        }

        let references = self.references.as_ref()?;
        let romanized = self.romanize(cleaned);
        let best = fuzzy::find_best_match(&romanized, references, self.similarity_threshold)?;
        debug!(
            "Similarity match '{}' ({}) -> {} ({:.2})",
            cleaned, romanized, best.value, best.score
        );
        Some((best.value, ResolveStage::Similarity))
    }

    /// Romanized initial of the first character; Latin letters and digits
    /// are their own initial, unknown characters fall through unchanged
    fn initial_of(&self, cleaned: &str) -> Option<char> {
        let first = cleaned.chars().next()?;
        if first.is_ascii_alphanumeric() {
            return Some(first.to_ascii_lowercase());
        }
        Some(self.initials.get(&first).copied().unwrap_or(first))
    }

    /// Replace known hanzi by their syllables and drop whitespace
    fn romanize(&self, cleaned: &str) -> String {
        cleaned
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match self.romanizations.get(&c) {
                Some(syllable) => syllable.clone(),
                None => c.to_string(),
            })
            .collect()
    }

    /// English name plus romanized Mandarin name for every direction
    fn reference_words(&self) -> Vec<(String, Direction)> {
        let mut words = Vec::new();
        for direction in Direction::ALL {
            words.push((direction.as_str().to_string(), direction));
            let romanized = self.romanize(direction.chinese());
            if romanized != direction.chinese() {
                words.push((romanized, direction));
            }
        }
        words
    }
}

fn single_char(s: &str) -> TrainerResult<char> {
    let mut chars = s.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c.to_lowercase().next().unwrap_or(c)),
        _ => Err(TrainerError::Config(format!(
            "expected a single character, got '{}'",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> DirectionResolver {
        DirectionResolver::new(&ResolverSettings::default()).expect("default tables are valid")
    }

    #[test]
    fn test_empty_and_absent_input() {
        let r = resolver();
        assert_eq!(r.resolve(""), None);
        assert_eq!(r.resolve("   "), None);
        assert_eq!(r.resolve(None), None);
    }

    #[test]
    fn test_lexicon_stage() {
        let r = resolver();
        assert_eq!(r.resolve("向上"), Some(Direction::Up));
        assert_eq!(r.resolve("up"), Some(Direction::Up));
        assert_eq!(r.resolve("Right."), Some(Direction::Right));
        assert_eq!(r.resolve("往左边"), Some(Direction::Left));
        assert_eq!(
            r.resolve_detailed("向下").map(|res| res.stage),
            Some(ResolveStage::Lexicon)
        );
    }

    #[test]
    fn test_digits_are_matched() {
        let r = resolver();
        assert_eq!(r.resolve("3"), Some(Direction::Up));
        assert_eq!(r.resolve("6"), Some(Direction::Right));
        assert_eq!(r.resolve("7"), None);
    }

    #[test]
    fn test_overrides_beat_initials() {
        let r = resolver();
        // 's' would map to UP, but "sha" is a known mistranscription of 下
        assert_eq!(r.resolve("Sha"), Some(Direction::Down));
        assert_eq!(r.resolve("show!"), Some(Direction::Down));
        assert_eq!(r.resolve("六"), Some(Direction::Right));
        assert_eq!(
            r.resolve_detailed("liu").map(|res| res.stage),
            Some(ResolveStage::Override)
        );
    }

    #[test]
    fn test_initial_stage() {
        let r = resolver();
        assert_eq!(r.resolve("sun"), Some(Direction::Up));
        assert_eq!(r.resolve("友"), Some(Direction::Right));
        assert_eq!(r.resolve("昨天"), Some(Direction::Left));
        assert_eq!(r.resolve("Xia ba"), Some(Direction::Down));
        assert_eq!(
            r.resolve_detailed("yeah").map(|res| res.stage),
            Some(ResolveStage::Initial)
        );
    }

    #[test]
    fn test_similarity_stage() {
        let r = resolver();
        let res = r.resolve_detailed("霞").unwrap();
        assert_eq!(res.direction, Direction::Down);
        assert_eq!(res.stage, ResolveStage::Similarity);
        assert_eq!(r.resolve("游"), Some(Direction::Right));
        assert_eq!(r.resolve("闪"), Some(Direction::Up));
    }

    #[test]
    fn test_english_mishearings_skip_initial_stage() {
        let r = resolver();
        let res = r.resolve_detailed("light").unwrap();
        assert_eq!(res.direction, Direction::Right);
        assert_eq!(res.stage, ResolveStage::Similarity);

        // Plain English words are not answers
        assert_eq!(r.resolve("done"), None);
        assert_eq!(r.resolve("run"), None);
        assert_eq!(r.resolve("use"), None);
    }

    #[test]
    fn test_english_initials_are_opt_in() {
        let mut settings = ResolverSettings::default();
        settings
            .initial_directions
            .insert("r".to_string(), Direction::Right);
        let r = DirectionResolver::new(&settings).unwrap();
        assert_eq!(
            r.resolve_detailed("run").map(|res| res.stage),
            Some(ResolveStage::Initial)
        );
        assert_eq!(r.resolve("run"), Some(Direction::Right));
    }

    #[test]
    fn test_unparsed() {
        let r = resolver();
        assert_eq!(r.resolve("hello"), None);
        assert_eq!(r.resolve("啥"), None);
        assert_eq!(r.resolve("?!"), None);
    }

    #[test]
    fn test_similarity_can_be_disabled() {
        let settings = ResolverSettings {
            similarity_enabled: false,
            ..ResolverSettings::default()
        };
        let r = DirectionResolver::new(&settings).unwrap();
        assert_eq!(r.resolve("霞"), None);
        assert_eq!(r.resolve("向下"), Some(Direction::Down));
    }

    #[test]
    fn test_mirrored_polarity_applies_to_every_stage() {
        let settings = ResolverSettings {
            polarity: Polarity::Mirrored,
            ..ResolverSettings::default()
        };
        let r = DirectionResolver::new(&settings).unwrap();
        assert_eq!(r.resolve("左"), Some(Direction::Right));
        assert_eq!(r.resolve("right"), Some(Direction::Left));
        assert_eq!(r.resolve("友"), Some(Direction::Left));
        assert_eq!(r.resolve("向上"), Some(Direction::Up));
    }

    #[test]
    fn test_invalid_tables_rejected() {
        let mut settings = ResolverSettings::default();
        settings.initials.insert("上面".to_string(), "s".to_string());
        assert!(matches!(
            DirectionResolver::new(&settings),
            Err(TrainerError::Config(_))
        ));

        let settings = ResolverSettings {
            similarity_threshold: 1.5,
            ..ResolverSettings::default()
        };
        assert!(DirectionResolver::new(&settings).is_err());
    }
}
