//! Application use cases / business logic

pub mod batch;
pub mod classify;
pub mod pipeline;
pub mod prompt;

pub use batch::{BatchError, BatchRunner};
pub use classify::{ClassifyConfig, ClassifyError, ClassifyUseCase};
pub use pipeline::{ClassificationPipeline, PipelineConfig, PipelineError};
pub use prompt::format_prompt;
