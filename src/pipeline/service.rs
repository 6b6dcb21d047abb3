//! Pipeline orchestration: clean, chunk, summarize with fallback, merge.

use crate::{
    extract::extract_file,
    metrics::{MetricsSnapshot, SummaryMetrics},
    model::{self, SummarizationModel},
    pipeline::{
        chunk::{chunk_words, count_words},
        clean::normalize,
        extractive,
        types::{PipelineError, SummarizeOptions, SummaryMethod, SummaryOutcome, SummaryResult},
    },
};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Extra words the merged summary may exceed `max_words` by before the single
/// re-compression pass is applied.
const RECOMPRESS_SLACK_WORDS: usize = 20;

/// Coordinates the full summarization pipeline.
///
/// The service resolves the shared model handle lazily on first use, so both
/// the HTTP surface and the CLI share one process-wide load. Construct it once
/// near process start and share it through an `Arc`.
pub struct SummaryService {
    model: ModelProvider,
    metrics: Arc<SummaryMetrics>,
}

/// Where the service obtains its model handle.
enum ModelProvider {
    /// Resolve through the process-wide lazy singleton.
    Lazy,
    /// Use an injected handle (or none), bypassing the singleton.
    Fixed(Option<Arc<dyn SummarizationModel>>),
}

/// Abstraction over the summarization pipeline used by external surfaces.
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Summarize raw text.
    async fn summarize_text(
        &self,
        text: &str,
        options: SummarizeOptions,
    ) -> Result<SummaryOutcome, PipelineError>;

    /// Extract text from a file and summarize it.
    async fn summarize_file(
        &self,
        path: &Path,
        options: SummarizeOptions,
    ) -> Result<SummaryOutcome, PipelineError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;
}

impl SummaryService {
    /// Build a service that loads the shared model on first use.
    pub fn new() -> Self {
        Self {
            model: ModelProvider::Lazy,
            metrics: Arc::new(SummaryMetrics::new()),
        }
    }

    /// Build a service with an explicit model handle (or none).
    ///
    /// Passing `None` routes every chunk through the extractive path, which is
    /// also how tests exercise the fallback contract.
    pub fn with_model(model: Option<Arc<dyn SummarizationModel>>) -> Self {
        Self {
            model: ModelProvider::Fixed(model),
            metrics: Arc::new(SummaryMetrics::new()),
        }
    }

    async fn resolve_model(&self) -> Option<Arc<dyn SummarizationModel>> {
        match &self.model {
            ModelProvider::Lazy => model::shared_model().await,
            ModelProvider::Fixed(handle) => handle.clone(),
        }
    }
}

impl Default for SummaryService {
    fn default() -> Self {
        Self::new()
    }
}

/// Summarize one piece of text, falling back to the extractive scorer when the
/// model is absent or errors. Failures are local to this call.
async fn summarize_with_fallback(
    model: Option<&dyn SummarizationModel>,
    text: &str,
    options: &SummarizeOptions,
) -> SummaryResult {
    if let Some(model) = model {
        match model
            .summarize(text, options.max_words, options.min_words)
            .await
        {
            Ok(summary) => {
                return SummaryResult {
                    word_count: count_words(&summary),
                    text: summary,
                    method: SummaryMethod::Abstractive,
                };
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    "Abstractive summarization failed; falling back to extractive"
                );
            }
        }
    }
    extractive::summarize(text, options.max_words, options.min_words)
}

#[async_trait]
impl SummaryApi for SummaryService {
    async fn summarize_text(
        &self,
        text: &str,
        options: SummarizeOptions,
    ) -> Result<SummaryOutcome, PipelineError> {
        let normalized = normalize(text);
        if normalized.is_empty() {
            return Ok(SummaryOutcome {
                text: String::new(),
                method: SummaryMethod::Extractive,
                word_count: 0,
                chunk_count: 0,
                fallback_chunks: 0,
                recompressed: false,
            });
        }

        let chunks = chunk_words(&normalized, options.chunk_word_limit);
        let chunk_count = chunks.len();
        let model = self.resolve_model().await;
        let model_ref = model.as_deref();

        let mut parts = Vec::with_capacity(chunk_count);
        let mut fallback_chunks = 0usize;
        for chunk in &chunks {
            let result = summarize_with_fallback(model_ref, chunk, &options).await;
            if result.method == SummaryMethod::Extractive {
                fallback_chunks += 1;
            }
            parts.push(result.text);
        }

        let merged = parts.join(" ");
        let merged_words = count_words(&merged);
        let mut fallback_events = fallback_chunks;

        let (final_text, final_word_count, recompressed) =
            if merged_words > options.max_words + RECOMPRESS_SLACK_WORDS {
                tracing::debug!(
                    merged_words,
                    max_words = options.max_words,
                    "Merged summary over budget; applying one compression pass"
                );
                let result = summarize_with_fallback(model_ref, &merged, &options).await;
                if result.method == SummaryMethod::Extractive {
                    fallback_events += 1;
                }
                (result.text, result.word_count, true)
            } else {
                (merged, merged_words, false)
            };

        let method = if fallback_events == 0 {
            SummaryMethod::Abstractive
        } else {
            SummaryMethod::Extractive
        };

        self.metrics
            .record_document(chunk_count as u64, fallback_chunks as u64, recompressed);
        tracing::info!(
            chunks = chunk_count,
            fallback_chunks,
            recompressed,
            words = final_word_count,
            ?method,
            "Summary produced"
        );

        Ok(SummaryOutcome {
            text: final_text,
            method,
            word_count: final_word_count,
            chunk_count,
            fallback_chunks,
            recompressed,
        })
    }

    async fn summarize_file(
        &self,
        path: &Path,
        options: SummarizeOptions,
    ) -> Result<SummaryOutcome, PipelineError> {
        tracing::info!(path = %path.display(), "Summarizing file");
        let text = extract_file(path)?;
        self.summarize_text(&text, options).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
