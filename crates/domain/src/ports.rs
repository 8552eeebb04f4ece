//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::Table;

/// Error type for text-completion operations
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("LLM API error: {0}")]
    Api(String),
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
    #[error("Timeout")]
    Timeout,
    #[error("Model not found: {0}")]
    ModelNotFound(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Port for a text-completion service (a local LLM, usually)
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Send one prompt and return the raw completion text
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError>;

    /// Name of the model answering the prompts
    fn model(&self) -> &str;
}

#[async_trait]
impl<C: TextCompletion + ?Sized> TextCompletion for &C {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        (**self).complete(prompt).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

#[async_trait]
impl<C: TextCompletion + ?Sized> TextCompletion for Box<C> {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        (**self).complete(prompt).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

/// Error type for table loading and saving
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("Column '{column}' not found in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },
    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

/// Port for reading and writing tabular files
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Load the whole table at `path`
    async fn read_table(&self, path: &Path) -> Result<Table, DataError>;

    /// Write `table` to `path`, replacing whatever is there
    async fn write_table(&self, path: &Path, table: &Table) -> Result<(), DataError>;
}

/// Observer notified once per item of a batch
pub trait Progress: Send + Sync {
    fn item_classified(&self, index: usize, description: &str, category: &str);
}

/// Progress observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn item_classified(&self, _index: usize, _description: &str, _category: &str) {}
}
