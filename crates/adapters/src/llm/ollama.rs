//! Ollama local LLM adapter

use async_trait::async_trait;
use product_classifier_domain::{ServiceError, TextCompletion};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{LlmConfig, build_http_client, normalize_base_url, transport_error};

/// Default address of a local Ollama server
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Completion client for a local Ollama server
pub struct OllamaCompletion {
    client: Client,
    base_url: String,
    config: LlmConfig,
}

impl OllamaCompletion {
    pub fn new(config: LlmConfig) -> Result<Self, ServiceError> {
        Self::with_base_url(DEFAULT_BASE_URL, config)
    }

    pub fn with_base_url(base_url: &str, config: LlmConfig) -> Result<Self, ServiceError> {
        let client = build_http_client(&config)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            config,
        })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl TextCompletion for OllamaCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: self
                .config
                .temperature
                .map(|temperature| GenerateOptions { temperature }),
        };

        let url = format!("{}/api/generate", self.base_url);

        tracing::debug!(url = %url, model = %self.config.model, "Sending generate request");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::ModelNotFound(self.config.model.clone()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let api_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidFormat(e.to_string()))?;

        if api_response.response.trim().is_empty() {
            return Err(ServiceError::InvalidFormat("Empty response".to_string()));
        }

        Ok(api_response.response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
