use serde::Deserialize;
use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Precis summarization service.
///
/// Every knob has a default, so the service starts with an empty environment:
/// the model falls back to a small local Ollama model and the word budgets
/// match the library defaults.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Model identifier passed to the Ollama runtime.
    pub summarizer_model: String,
    /// Hardware preference applied when the model is loaded.
    pub model_device: DevicePreference,
    /// Optional base URL of the Ollama runtime.
    pub ollama_url: Option<String>,
    /// Optional override for the per-chunk word limit.
    pub chunk_word_limit: Option<usize>,
    /// Optional override for the summary word ceiling.
    pub summary_max_words: Option<usize>,
    /// Optional override for the summary word floor.
    pub summary_min_words: Option<usize>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Hardware placement requested for the summarization model.
///
/// The choice is resolved once at model load and stays fixed for the process
/// lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreference {
    /// Let the runtime place the model (accelerated hardware when present).
    Auto,
    /// Prefer accelerated hardware.
    Gpu,
    /// Force general-purpose CPU execution.
    Cpu,
}

const DEFAULT_SUMMARIZER_MODEL: &str = "llama3.2:1b";

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            summarizer_model: load_env_optional("SUMMARIZER_MODEL")
                .unwrap_or_else(|| DEFAULT_SUMMARIZER_MODEL.to_string()),
            model_device: load_env_optional("MODEL_DEVICE")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("MODEL_DEVICE".to_string()))
                })
                .transpose()?
                .unwrap_or(DevicePreference::Auto),
            ollama_url: load_env_optional("OLLAMA_URL"),
            chunk_word_limit: parse_optional("CHUNK_WORD_LIMIT")?,
            summary_max_words: parse_optional("SUMMARY_MAX_WORDS")?,
            summary_min_words: parse_optional("SUMMARY_MIN_WORDS")?,
            server_port: parse_optional("SERVER_PORT")?,
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl std::str::FromStr for DevicePreference {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "gpu" => Ok(Self::Gpu),
            "cpu" => Ok(Self::Cpu),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        model = %config.summarizer_model,
        device = ?config.model_device,
        ollama_url = ?config.ollama_url,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_preference_parses_known_values() {
        assert_eq!("auto".parse(), Ok(DevicePreference::Auto));
        assert_eq!("GPU".parse(), Ok(DevicePreference::Gpu));
        assert_eq!("cpu".parse(), Ok(DevicePreference::Cpu));
        assert_eq!("tpu".parse::<DevicePreference>(), Err(()));
    }
}
