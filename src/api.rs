//! HTTP surface for Precis.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /summarize` – Summarize raw text. Accepts optional word-budget
//!   overrides and returns the summary plus pipeline metadata (`method`,
//!   `word_count`, `chunk_count`, `fallback_chunks`, `recompressed`).
//! - `POST /summarize/file` – Extract text from a server-local PDF/TXT/MD file
//!   and summarize it.
//! - `GET /metrics` – Observe summarization counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by
//!   tools/hosts.
//!
//! The HTTP surface shares the same pipeline with the CLI, so behavior is
//! identical across interfaces.

use crate::config::get_config;
use crate::pipeline::{PipelineError, SummarizeOptions, SummaryApi, SummaryMethod};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

/// Build the HTTP router exposing the summarization API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: SummaryApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize_text::<S>))
        .route("/summarize/file", post(summarize_file::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

/// Request body for the `POST /summarize` endpoint.
#[derive(Deserialize)]
struct SummarizeTextRequest {
    /// Raw document contents to summarize.
    text: String,
    /// Optional override for the summary word ceiling.
    #[serde(default)]
    max_words: Option<usize>,
    /// Optional override for the summary word floor.
    #[serde(default)]
    min_words: Option<usize>,
}

/// Request body for the `POST /summarize/file` endpoint.
#[derive(Deserialize)]
struct SummarizeFileRequest {
    /// Path of a server-local `.pdf`, `.txt`, or `.md` file.
    path: PathBuf,
    /// Optional override for the summary word ceiling.
    #[serde(default)]
    max_words: Option<usize>,
    /// Optional override for the summary word floor.
    #[serde(default)]
    min_words: Option<usize>,
}

/// Success response for both summarize endpoints.
#[derive(Serialize)]
struct SummarizeResponse {
    /// Final summary text (empty when the cleaned input was empty).
    summary: String,
    /// Method that produced the summary.
    method: SummaryMethod,
    /// Word count of the summary.
    word_count: usize,
    /// Number of chunks the input was split into.
    chunk_count: usize,
    /// Chunks that used the extractive fallback.
    fallback_chunks: usize,
    /// Whether the merged summary needed the extra compression pass.
    recompressed: bool,
}

impl From<crate::pipeline::SummaryOutcome> for SummarizeResponse {
    fn from(outcome: crate::pipeline::SummaryOutcome) -> Self {
        Self {
            summary: outcome.text,
            method: outcome.method,
            word_count: outcome.word_count,
            chunk_count: outcome.chunk_count,
            fallback_chunks: outcome.fallback_chunks,
            recompressed: outcome.recompressed,
        }
    }
}

fn resolve_options(max_words: Option<usize>, min_words: Option<usize>) -> SummarizeOptions {
    let defaults = SummarizeOptions::from_config(get_config());
    SummarizeOptions {
        max_words: max_words.unwrap_or(defaults.max_words),
        min_words: min_words.unwrap_or(defaults.min_words),
        ..defaults
    }
}

/// Summarize raw text supplied in the request body.
async fn summarize_text<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SummarizeTextRequest>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: SummaryApi,
{
    let options = resolve_options(request.max_words, request.min_words);
    let outcome = service.summarize_text(&request.text, options).await?;
    tracing::info!(
        chunks = outcome.chunk_count,
        words = outcome.word_count,
        method = ?outcome.method,
        "Summarize request completed"
    );
    Ok(Json(outcome.into()))
}

/// Extract a server-local file and summarize its contents.
async fn summarize_file<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SummarizeFileRequest>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: SummaryApi,
{
    let options = resolve_options(request.max_words, request.min_words);
    let outcome = service.summarize_file(&request.path, options).await?;
    tracing::info!(
        path = %request.path.display(),
        chunks = outcome.chunk_count,
        words = outcome.word_count,
        method = ?outcome.method,
        "Summarize file request completed"
    );
    Ok(Json(outcome.into()))
}

/// Return a concise metrics snapshot with summarization counters.
async fn get_metrics<S>(
    State(service): State<Arc<S>>,
) -> Json<crate::metrics::MetricsSnapshot>
where
    S: SummaryApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Summarize raw text. Response returns { \"summary\": string, \"method\": \"abstractive\"|\"extractive\", \"word_count\": number }.",
                request_example: Some(json!({
                    "text": "Document contents",
                    "max_words": 150,
                    "min_words": 30
                })),
            },
            CommandDescriptor {
                name: "summarize_file",
                method: "POST",
                path: "/summarize/file",
                description: "Extract text from a server-local PDF, TXT, or MD file and summarize it.",
                request_example: Some(json!({
                    "path": "/data/report.pdf"
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return summarization counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

struct AppError(PipelineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            // Undecodable input is the caller's problem, not the server's.
            PipelineError::Extract(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.0.to_string()).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(inner: PipelineError) -> Self {
        Self(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{create_router, get_commands};
    use crate::config::{CONFIG, Config, DevicePreference};
    use crate::extract::ExtractError;
    use crate::metrics::{MetricsSnapshot, SummaryMetrics};
    use crate::pipeline::{
        PipelineError, SummarizeOptions, SummaryApi, SummaryMethod, SummaryOutcome,
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn ensure_test_config() {
        CONFIG
            .set(Config {
                summarizer_model: "stub-model".into(),
                model_device: DevicePreference::Cpu,
                ollama_url: None,
                chunk_word_limit: None,
                summary_max_words: None,
                summary_min_words: None,
                server_port: None,
            })
            .ok();
    }

    struct StubSummaryService {
        outcome: SummaryOutcome,
        metrics: SummaryMetrics,
    }

    impl StubSummaryService {
        fn new(outcome: SummaryOutcome) -> Self {
            Self {
                outcome,
                metrics: SummaryMetrics::new(),
            }
        }
    }

    #[async_trait]
    impl SummaryApi for StubSummaryService {
        async fn summarize_text(
            &self,
            _text: &str,
            _options: SummarizeOptions,
        ) -> Result<SummaryOutcome, PipelineError> {
            Ok(self.outcome.clone())
        }

        async fn summarize_file(
            &self,
            path: &Path,
            _options: SummarizeOptions,
        ) -> Result<SummaryOutcome, PipelineError> {
            Err(PipelineError::Extract(ExtractError::UnsupportedFormat {
                path: path.display().to_string(),
            }))
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            self.metrics.snapshot()
        }
    }

    fn sample_outcome() -> SummaryOutcome {
        SummaryOutcome {
            text: "A short summary.".into(),
            method: SummaryMethod::Abstractive,
            word_count: 3,
            chunk_count: 1,
            fallback_chunks: 0,
            recompressed: false,
        }
    }

    #[tokio::test]
    async fn commands_catalog_exposes_summarize_endpoint() {
        let response = get_commands().await;
        let commands = response.0.commands;
        let summarize = commands
            .iter()
            .find(|cmd| cmd.name == "summarize")
            .expect("summarize command present");

        assert_eq!(summarize.method, "POST");
        assert_eq!(summarize.path, "/summarize");
        assert!(summarize.description.to_lowercase().contains("summarize"));
        assert!(commands.len() >= 3);
    }

    #[tokio::test]
    async fn summarize_route_returns_outcome_metadata() {
        ensure_test_config();
        let service = Arc::new(StubSummaryService::new(sample_outcome()));
        let app = create_router(service);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/summarize")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "text": "Document body", "max_words": 100 }).to_string(),
            ))
            .expect("request");

        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["summary"], "A short summary.");
        assert_eq!(body["method"], "abstractive");
        assert_eq!(body["chunk_count"], 1);
        assert_eq!(body["recompressed"], false);
    }

    #[tokio::test]
    async fn file_route_maps_extract_errors_to_bad_request() {
        ensure_test_config();
        let service = Arc::new(StubSummaryService::new(sample_outcome()));
        let app = create_router(service);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/summarize/file")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "path": "/data/file.xlsx" }).to_string()))
            .expect("request");

        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn metrics_route_reports_counters() {
        ensure_test_config();
        let service = Arc::new(StubSummaryService::new(sample_outcome()));
        service.metrics.record_document(2, 1, true);
        let app = create_router(service);

        let request = Request::builder()
            .method(Method::GET)
            .uri("/metrics")
            .body(Body::empty())
            .expect("request");

        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["documents_summarized"], 1);
        assert_eq!(body["fallback_chunks"], 1);
        assert_eq!(body["recompressions"], 1);
    }
}
