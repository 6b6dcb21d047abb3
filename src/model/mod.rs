//! Adapter for the external pretrained summarization model.
//!
//! The model is served by a local Ollama runtime and accessed over HTTP. The
//! adapter owns the load lifecycle: the process-wide handle is created at most
//! once behind [`tokio::sync::OnceCell`], the device preference is resolved at
//! load time and fixed afterwards, and [`release_shared`] asks the runtime to
//! drop the weights at teardown. Every error here is recoverable by contract:
//! the pipeline substitutes the extractive summarizer instead of failing.

use crate::config::{DevicePreference, get_config};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Errors surfaced by the summarization model adapter.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model could not be loaded (runtime unreachable or model missing).
    #[error("Failed to load model: {0}")]
    Load(String),
    /// The model returned an error during generation.
    #[error("Failed to generate summary: {0}")]
    Inference(String),
    /// The model response could not be parsed.
    #[error("Malformed model response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by abstractive summarization backends.
#[async_trait]
pub trait SummarizationModel: Send + Sync {
    /// Generate a summary of `text` targeting the given word bounds.
    async fn summarize(
        &self,
        text: &str,
        max_words: usize,
        min_words: usize,
    ) -> Result<String, ModelError>;
}

/// Summarization model served by an Ollama runtime.
#[derive(Debug)]
pub struct OllamaModel {
    http: Client,
    base_url: String,
    model: String,
    gpu_layers: Option<u32>,
}

impl OllamaModel {
    /// Verify the model is available on the runtime and build a handle to it.
    ///
    /// The device preference is applied to every subsequent generation call:
    /// `cpu` pins `num_gpu` to zero, while `auto` and `gpu` leave placement to
    /// the runtime, which offloads as many layers as the hardware allows.
    pub async fn load(
        base_url: String,
        model: String,
        device: DevicePreference,
    ) -> Result<Self, ModelError> {
        let http = Client::builder()
            .user_agent("precis/model")
            .build()
            .expect("Failed to construct reqwest::Client for summarization");

        let handle = Self {
            http,
            base_url,
            model,
            gpu_layers: match device {
                DevicePreference::Cpu => Some(0),
                DevicePreference::Auto | DevicePreference::Gpu => None,
            },
        };

        let response = handle
            .http
            .post(handle.endpoint("/api/show"))
            .json(&json!({ "model": handle.model }))
            .send()
            .await
            .map_err(|error| {
                ModelError::Load(format!(
                    "failed to reach Ollama at {}: {error}",
                    handle.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ModelError::Load(format!(
                "model '{}' is not available on the runtime",
                handle.model
            )));
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(ModelError::Load(format!("Ollama returned {status}")));
        }

        Ok(handle)
    }

    /// Ask the runtime to unload the model weights.
    ///
    /// Best-effort: teardown must not fail the process, so transport errors
    /// are only logged.
    pub async fn release(&self) {
        let payload = json!({
            "model": self.model,
            "keep_alive": 0,
        });
        if let Err(error) = self
            .http
            .post(self.endpoint("/api/generate"))
            .json(&payload)
            .send()
            .await
        {
            tracing::debug!(error = %error, "Failed to release model weights");
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn build_prompt(text: &str, max_words: usize, min_words: usize) -> String {
        format!(
            "System: You summarize documents into concise, factual prose. Prefer neutral tone. \
             Avoid speculation. Return a single paragraph between {min_words} and {max_words} words. \
             Output only the summary.\n\nSummarize the following text:\n\n{text}"
        )
    }
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

#[async_trait]
impl SummarizationModel for OllamaModel {
    async fn summarize(
        &self,
        text: &str,
        max_words: usize,
        min_words: usize,
    ) -> Result<String, ModelError> {
        let mut options = json!({
            // Lower temperature for deterministic summaries.
            "temperature": 0.1,
            // Token budget roughly tracks the word ceiling.
            "num_predict": max_words * 2,
        });
        if let Some(layers) = self.gpu_layers {
            options["num_gpu"] = json!(layers);
        }

        let payload = json!({
            "model": self.model,
            "prompt": Self::build_prompt(text, max_words, min_words),
            "stream": false,
            "options": options,
        });

        let response = self
            .http
            .post(self.endpoint("/api/generate"))
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                ModelError::Inference(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Inference(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            ModelError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(ModelError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }
}

/// Process-wide model handle, loaded at most once.
static SHARED_MODEL: OnceCell<Option<Arc<OllamaModel>>> = OnceCell::const_new();

/// Return the shared model handle, loading it on first use.
///
/// Initialization is single-acquisition: concurrent callers wait on the same
/// load attempt, so duplicate loads cannot occur. A failed load is cached as
/// an absent model, which routes every later call through the extractive
/// fallback for the remainder of the process lifetime.
pub async fn shared_model() -> Option<Arc<dyn SummarizationModel>> {
    let slot = SHARED_MODEL
        .get_or_init(|| async {
            let config = get_config();
            let base_url = config
                .ollama_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            match OllamaModel::load(
                base_url,
                config.summarizer_model.clone(),
                config.model_device,
            )
            .await
            {
                Ok(model) => {
                    tracing::info!(model = %config.summarizer_model, device = ?config.model_device, "Summarization model loaded");
                    Some(Arc::new(model))
                }
                Err(error) => {
                    tracing::warn!(
                        model = %config.summarizer_model,
                        error = %error,
                        "Model load failed; using extractive summaries for this process"
                    );
                    None
                }
            }
        })
        .await;
    slot.clone()
        .map(|model| model as Arc<dyn SummarizationModel>)
}

/// Release the shared model weights if a handle was ever loaded.
pub async fn release_shared() {
    if let Some(Some(model)) = SHARED_MODEL.get() {
        model.release().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn test_model(base_url: String) -> OllamaModel {
        OllamaModel {
            http: Client::builder()
                .user_agent("precis-test")
                .build()
                .expect("client"),
            base_url,
            model: "llama".into(),
            gpu_layers: None,
        }
    }

    #[tokio::test]
    async fn load_accepts_available_model() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/show");
                then.status(200).json_body(json!({ "details": {} }));
            })
            .await;

        let model = OllamaModel::load(server.base_url(), "llama".into(), DevicePreference::Cpu)
            .await
            .expect("load");
        assert_eq!(model.gpu_layers, Some(0));
    }

    #[tokio::test]
    async fn load_rejects_missing_model() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/show");
                then.status(404).body("model not found");
            })
            .await;

        let error = OllamaModel::load(server.base_url(), "llama".into(), DevicePreference::Auto)
            .await
            .expect_err("missing model");
        assert!(matches!(error, ModelError::Load(_)));
    }

    #[tokio::test]
    async fn summarize_handles_successful_response() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({
                    "response": "Summary text",
                    "done": true
                }));
            })
            .await;

        let summary = test_model(server.base_url())
            .summarize("Long document body", 150, 30)
            .await
            .expect("summary");

        mock.assert();
        assert_eq!(summary, "Summary text");
    }

    #[tokio::test]
    async fn summarize_handles_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("boom");
            })
            .await;

        let error = test_model(server.base_url())
            .summarize("Long document body", 150, 30)
            .await
            .expect_err("error response");
        assert!(matches!(error, ModelError::Inference(message) if message.contains("500")));
    }

    #[tokio::test]
    async fn summarize_rejects_incomplete_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({
                    "response": "partial",
                    "done": false
                }));
            })
            .await;

        let error = test_model(server.base_url())
            .summarize("Long document body", 150, 30)
            .await
            .expect_err("incomplete response");
        assert!(matches!(error, ModelError::InvalidResponse(_)));
    }
}
