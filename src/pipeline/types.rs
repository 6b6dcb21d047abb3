//! Core data types and error definitions for the summarization pipeline.

use crate::config::Config;
use crate::extract::ExtractError;
use crate::pipeline::chunk::determine_chunk_limit;
use serde::Serialize;
use thiserror::Error;

/// Default ceiling on summary length, in words.
pub const DEFAULT_MAX_WORDS: usize = 150;
/// Default floor on summary length, in words.
pub const DEFAULT_MIN_WORDS: usize = 30;

/// How a summary was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMethod {
    /// Generated by the sequence-to-sequence model.
    Abstractive,
    /// Selected verbatim from source sentences by the heuristic scorer.
    Extractive,
}

/// Summary produced for a single chunk.
#[derive(Debug, Clone)]
pub struct SummaryResult {
    /// Summary text.
    pub text: String,
    /// Method that produced the text.
    pub method: SummaryMethod,
    /// Whitespace-delimited word count of `text`.
    pub word_count: usize,
}

/// Final summary produced for a whole document.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    /// Merged (and possibly re-compressed) summary text.
    pub text: String,
    /// `Abstractive` only when no chunk and no re-compression pass fell back.
    pub method: SummaryMethod,
    /// Whitespace-delimited word count of `text`.
    pub word_count: usize,
    /// Number of chunks the normalized input was split into.
    pub chunk_count: usize,
    /// Number of chunks that used the extractive fallback.
    pub fallback_chunks: usize,
    /// Whether the merged text required the single extra compression pass.
    pub recompressed: bool,
}

/// Word budgets and chunking limit for one pipeline invocation.
///
/// Immutable per invocation; callers either take the defaults, derive them
/// from [`Config`], or override individual fields.
#[derive(Debug, Clone, Copy)]
pub struct SummarizeOptions {
    /// Target ceiling on summary length, in words.
    pub max_words: usize,
    /// Target floor on summary length, in words.
    pub min_words: usize,
    /// Upper bound on words per chunk.
    pub chunk_word_limit: usize,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            max_words: DEFAULT_MAX_WORDS,
            min_words: DEFAULT_MIN_WORDS,
            chunk_word_limit: determine_chunk_limit(None),
        }
    }
}

impl SummarizeOptions {
    /// Build options from configuration overrides, defaulting the rest.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_words: config.summary_max_words.unwrap_or(DEFAULT_MAX_WORDS),
            min_words: config.summary_min_words.unwrap_or(DEFAULT_MIN_WORDS),
            chunk_word_limit: determine_chunk_limit(config.chunk_word_limit),
        }
    }
}

/// Errors emitted by the summarization pipeline.
///
/// Model failures never appear here: they are absorbed by the extractive
/// fallback and reported through [`SummaryOutcome`] metadata instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input document could not be decoded; terminal, surfaced to the caller.
    #[error("Failed to decode input document: {0}")]
    Extract(#[from] ExtractError),
}
