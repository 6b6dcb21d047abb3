//! Extractive fallback summarizer.
//!
//! Selects existing sentences verbatim, ranked by a frequency/position
//! heuristic, and re-emits them in their original order. This path is fully
//! deterministic and never fails, which is what makes it a safe substitute
//! whenever the abstractive model is unavailable.
//!
//! Scoring: each sentence gets the mean term frequency of its non-stopword
//! tokens (frequencies normalized by the corpus maximum, so the value sits
//! between 0 and 1) plus a linear positional bonus that favors earlier
//! sentences. The bonus weight keeps position a tiebreaker rather than the
//! dominant signal.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use unicode_segmentation::UnicodeSegmentation;

use super::chunk::count_words;
use super::types::{SummaryMethod, SummaryResult};

const POSITION_WEIGHT: f32 = 0.15;

static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(|| {
        [
            "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "had", "has",
            "have", "he", "how", "in", "is", "it", "its", "of", "on", "that", "the", "they",
            "this", "to", "was", "what", "when", "where", "which", "who", "why", "will", "with",
        ]
        .iter()
        .copied()
        .collect()
    })
}

/// Summarize `text` by sentence selection, targeting the given word bounds.
///
/// Sentences are admitted in score order while the running word count is
/// below `min_words` or the next sentence still fits within `max_words`; the
/// output preserves source order. Sentence-boundary granularity means the
/// bounds are best-effort. Input with at most one sentence is returned
/// verbatim.
pub fn summarize(text: &str, max_words: usize, min_words: usize) -> SummaryResult {
    let sentences = split_sentences(text);
    if sentences.len() <= 1 {
        let trimmed = text.trim().to_string();
        return SummaryResult {
            word_count: count_words(&trimmed),
            text: trimmed,
            method: SummaryMethod::Extractive,
        };
    }

    let scores = score_sentences(&sentences);
    let mut ranked: Vec<usize> = (0..sentences.len()).collect();
    ranked.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]).then_with(|| a.cmp(b)));

    let mut selected: Vec<usize> = Vec::new();
    let mut total_words = 0usize;
    for index in ranked {
        let sentence_words = count_words(sentences[index]);
        if selected.is_empty() || total_words < min_words || total_words + sentence_words <= max_words
        {
            selected.push(index);
            total_words += sentence_words;
        }
        if total_words >= max_words {
            break;
        }
    }

    selected.sort_unstable();
    let summary = selected
        .iter()
        .map(|&index| sentences[index])
        .collect::<Vec<_>>()
        .join(" ");

    SummaryResult {
        word_count: count_words(&summary),
        text: summary,
        method: SummaryMethod::Extractive,
    }
}

/// Split on UAX #29 sentence boundaries, dropping whitespace-only segments.
fn split_sentences(text: &str) -> Vec<&str> {
    text.split_sentence_bounds()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// Tokens that participate in frequency scoring: lowercased, punctuation
/// trimmed, stopwords and very short words excluded.
fn scoring_tokens(sentence: &str) -> impl Iterator<Item = String> + '_ {
    sentence
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| word.len() > 2 && !stop_words().contains(word.as_str()))
}

fn score_sentences(sentences: &[&str]) -> Vec<f32> {
    let mut frequencies: HashMap<String, f32> = HashMap::new();
    for sentence in sentences {
        for token in scoring_tokens(sentence) {
            *frequencies.entry(token).or_insert(0.0) += 1.0;
        }
    }
    let max_frequency = frequencies.values().copied().fold(0.0_f32, f32::max).max(1.0);

    sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| {
            let tokens: Vec<String> = scoring_tokens(sentence).collect();
            let frequency_score = if tokens.is_empty() {
                0.0
            } else {
                tokens
                    .iter()
                    .map(|token| frequencies[token] / max_frequency)
                    .sum::<f32>()
                    / tokens.len() as f32
            };
            let position_bonus =
                POSITION_WEIGHT * (1.0 - index as f32 / sentences.len() as f32);
            frequency_score + position_bonus
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Rust compiles to native code. The compiler checks ownership of every \
        value at compile time. Garbage collection is not needed because ownership rules free \
        memory deterministically. Many languages rely on garbage collection instead. The \
        ownership model also prevents data races across threads. Documentation is generated \
        with rustdoc.";

    #[test]
    fn output_preserves_source_order() {
        let source = split_sentences(SAMPLE);
        let result = summarize(SAMPLE, 40, 10);
        let positions: Vec<usize> = split_sentences(&result.text)
            .iter()
            .map(|sentence| {
                source
                    .iter()
                    .position(|candidate| candidate == sentence)
                    .expect("summary sentence taken verbatim from the source")
            })
            .collect();
        assert!(!positions.is_empty());
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn summary_is_shorter_than_source() {
        let result = summarize(SAMPLE, 25, 10);
        assert!(result.word_count < count_words(SAMPLE));
        assert!(result.word_count > 0);
        assert_eq!(result.method, SummaryMethod::Extractive);
    }

    #[test]
    fn single_sentence_is_returned_verbatim() {
        let result = summarize("Just one sentence here.", 150, 30);
        assert_eq!(result.text, "Just one sentence here.");
        assert_eq!(result.word_count, 4);
    }

    #[test]
    fn scoring_is_deterministic() {
        let first = summarize(SAMPLE, 40, 10);
        let second = summarize(SAMPLE, 40, 10);
        assert_eq!(first.text, second.text);
    }

    #[test]
    fn abbreviations_do_not_split_sentences() {
        let sentences = split_sentences("Dr. Smith arrived. The meeting started.");
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn selection_respects_the_word_ceiling() {
        let result = summarize(SAMPLE, 20, 5);
        // One sentence is always admitted, so the bound holds once the best
        // sentence fits at all.
        assert!(result.word_count <= 20 || split_sentences(&result.text).len() == 1);
    }
}
