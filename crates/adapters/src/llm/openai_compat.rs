//! OpenAI-compatible API adapter for other local servers (llama.cpp, vLLM, LM Studio)

use async_trait::async_trait;
use product_classifier_domain::{ServiceError, TextCompletion};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{LlmConfig, build_http_client, normalize_base_url, transport_error};

/// Completion client speaking the `/chat/completions` protocol
pub struct OpenAiCompatCompletion {
    client: Client,
    api_key: Option<SecretString>,
    base_url: String,
    config: LlmConfig,
}

impl OpenAiCompatCompletion {
    /// `api_key` may be omitted for servers that do not check it
    pub fn new(
        base_url: &str,
        api_key: Option<SecretString>,
        config: LlmConfig,
    ) -> Result<Self, ServiceError> {
        let base_url = normalize_base_url(base_url);
        if base_url.is_empty() {
            return Err(ServiceError::Config(
                "OpenAI-compatible base_url is required".to_string(),
            ));
        }

        let client = build_http_client(&config)?;

        Ok(Self {
            client,
            api_key,
            base_url,
            config,
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl TextCompletion for OpenAiCompatCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(transport_error)?;

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

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidFormat(e.to_string()))?;

        let text = api_response
            .choices
            .into_iter()
            .filter_map(|c| c.message.content)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(ServiceError::InvalidFormat("Empty response".to_string()));
        }

        Ok(text)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
