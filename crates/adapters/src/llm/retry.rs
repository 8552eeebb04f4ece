//! Retry decorator for completion clients

use async_trait::async_trait;
use product_classifier_domain::{ServiceError, TextCompletion};
use std::time::Duration;

/// Longest pause between two attempts
const MAX_DELAY: Duration = Duration::from_secs(30);

/// Retries transient failures of the wrapped client with exponential backoff
pub struct Retrying<C> {
    inner: C,
    retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl<C: TextCompletion> Retrying<C> {
    pub fn new(inner: C, retries: u32) -> Self {
        Self {
            inner,
            retries,
            base_delay: Duration::from_millis(500),
            max_delay: MAX_DELAY,
        }
    }

    /// Override the first backoff delay (doubled on every further attempt)
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before retry number `attempt` (1-based), capped at the max delay
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    fn is_transient(error: &ServiceError) -> bool {
        matches!(error, ServiceError::Api(_) | ServiceError::Timeout)
    }
}

#[async_trait]
impl<C: TextCompletion> TextCompletion for Retrying<C> {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let mut attempt = 0;
        loop {
            match self.inner.complete(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.retries && Self::is_transient(&e) => {
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    tracing::warn!(
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying completion"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}
