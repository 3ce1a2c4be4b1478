//! Text Normalization
//!
//! Cleans raw speech-to-text output before direction matching.

/// Punctuation that STT vendors attach to short utterances
const PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', '(', ')', '-', '。', '，', '！', '？', '；', '：',
    '、', '“', '”', '‘', '’', '（', '）', '…',
];

/// Hesitation fillers stripped from the start of a transcript
const FILLER_PREFIXES: &[&str] = &["um ", "uh ", "er ", "ok ", "嗯", "啊", "呃", "那个"];

/// Normalizes spoken text for the resolver
#[derive(Debug, Clone, Default)]
pub struct TranscriptNormalizer;

impl TranscriptNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase, replace punctuation with spaces, collapse whitespace and
    /// strip leading fillers.
    ///
    /// Returns an empty string when nothing meaningful is left.
    pub fn normalize(&self, text: &str) -> String {
        let spaced: String = text
            .to_lowercase()
            .chars()
            .map(|c| if PUNCTUATION.contains(&c) { ' ' } else { c })
            .collect();
        let mut result = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

        // Strip fillers recursively ("um 嗯 上" -> "上")
        loop {
            let mut changed = false;
            for prefix in FILLER_PREFIXES {
                if let Some(rest) = result.strip_prefix(prefix) {
                    let rest = rest.trim();
                    // Never strip the whole utterance away
                    if !rest.is_empty() {
                        result = rest.to_string();
                        changed = true;
                        break;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        result
    }
}
