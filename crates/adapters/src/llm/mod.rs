//! Text-completion adapters

pub mod ollama;
pub mod openai_compat;
pub mod retry;
pub mod stub;

pub use ollama::OllamaCompletion;
pub use openai_compat::OpenAiCompatCompletion;
pub use retry::Retrying;
pub use stub::StubCompletion;

use product_classifier_domain::ServiceError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default model served by the local completion service
pub const DEFAULT_MODEL: &str = "llama3.1";

/// Common LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/ID
    pub model: String,
    /// Sampling temperature; the server default applies when unset
    pub temperature: Option<f64>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries on transient failure
    pub retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
            timeout_secs: 300,
            retries: 0,
        }
    }
}

/// Build the HTTP client shared by every request of a run
pub(crate) fn build_http_client(config: &LlmConfig) -> Result<Client, ServiceError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| ServiceError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Map a transport-level failure to a service error
pub(crate) fn transport_error(e: reqwest::Error) -> ServiceError {
    if e.is_timeout() {
        ServiceError::Timeout
    } else {
        ServiceError::Api(e.to_string())
    }
}

/// Trim a base URL so paths can be appended with a single slash
pub(crate) fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
