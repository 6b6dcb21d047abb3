//! Word-bounded chunking.
//!
//! Sequence-to-sequence models have input-length limits, so normalized text is
//! split into bounded word runs before summarization. The split is total and
//! order-preserving: chunks never overlap, no word is dropped or duplicated,
//! and joining the chunks back together reconstructs the input word-for-word.

/// Default upper bound on words per chunk, chosen to keep each chunk well
/// inside common summarization-model input limits.
pub const DEFAULT_CHUNK_WORD_LIMIT: usize = 400;

/// Determine the chunk word limit for a request.
///
/// An explicit override (e.g. `CHUNK_WORD_LIMIT`) wins and is clamped at
/// `>= 1`; otherwise the default applies.
pub fn determine_chunk_limit(override_limit: Option<usize>) -> usize {
    override_limit.map_or(DEFAULT_CHUNK_WORD_LIMIT, |limit| limit.max(1))
}

/// Split text into chunks of at most `limit` words.
///
/// Words are delimited by Unicode whitespace. Input with fewer words than the
/// limit yields exactly one chunk; empty or whitespace-only input yields an
/// empty vector. Every chunk except the last contains exactly `limit` words.
pub fn chunk_words(text: &str, limit: usize) -> Vec<String> {
    // chunks() panics on zero, and a zero budget is meaningless anyway.
    let limit = limit.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(limit).map(|chunk| chunk.join(" ")).collect()
}

/// Count whitespace-delimited words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
