//! Core text processing
//!
//! Transcript cleanup shared by the resolver stages.

pub mod text_normalizer;

pub use text_normalizer::TranscriptNormalizer;
