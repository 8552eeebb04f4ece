//! Stub completion client for testing and offline mode

use async_trait::async_trait;
use product_classifier_domain::{ServiceError, TextCompletion};
use std::sync::Mutex;

/// Stub completion that answers from a fixed rule list
///
/// Rules are checked in order; the first whose needle occurs in the prompt
/// wins. Prompts matching no rule get the default answer, if any.
pub struct StubCompletion {
    rules: Vec<(String, String)>,
    default: Option<String>,
    error: Option<ServiceError>,
    prompts: Mutex<Vec<String>>,
}

impl StubCompletion {
    /// Create a stub that answers every prompt with `response`
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::with_rules(Vec::new(), Some(response.into()))
    }

    /// Create a stub that answers by substring rules
    pub fn with_rules(rules: Vec<(String, String)>, default: Option<String>) -> Self {
        Self {
            rules,
            default,
            error: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a stub that always returns an error
    pub fn with_error(error: ServiceError) -> Self {
        Self {
            rules: Vec::new(),
            default: None,
            error: Some(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextCompletion for StubCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(ref error) = self.error {
            return Err(error.clone());
        }

        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .or_else(|| self.default.clone())
            .ok_or_else(|| ServiceError::InvalidFormat("Empty response".to_string()))
    }

    fn model(&self) -> &str {
        "stub"
    }
}
