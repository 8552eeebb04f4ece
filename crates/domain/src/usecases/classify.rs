//! Classification use case

use thiserror::Error;

use crate::{
    model::CategoryList,
    policy::{MembershipPolicy, Resolution},
    ports::{ServiceError, TextCompletion},
    usecases::prompt::format_prompt,
};

/// Error type for a single classification
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Model answered '{response}', which is not one of the categories")]
    UnknownCategory { response: String },
}

/// Configuration for the classify use case
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyConfig {
    /// What to do with answers that are not exactly a category
    pub membership: MembershipPolicy,
}

/// Use case for classifying one product description
pub struct ClassifyUseCase<C> {
    completion: C,
    config: ClassifyConfig,
}

impl<C: TextCompletion> ClassifyUseCase<C> {
    pub fn new(completion: C, config: ClassifyConfig) -> Self {
        Self { completion, config }
    }

    /// Name of the model behind this use case
    pub fn model(&self) -> &str {
        self.completion.model()
    }

    /// Ask the model which category fits `description` best
    pub async fn classify(
        &self,
        description: &str,
        categories: &CategoryList,
    ) -> Result<String, ClassifyError> {
        let prompt = format_prompt(description, categories);

        tracing::info!(description = %description, "Classifying product");
        tracing::info!(categories = %categories.joined(), "Candidate categories");

        let response = self.completion.complete(&prompt).await?;

        tracing::info!(
            model = %self.completion.model(),
            response = %response,
            "Model response"
        );

        let answer = response.trim();
        if answer.is_empty() {
            return Err(ServiceError::InvalidFormat("Empty response".to_string()).into());
        }

        match self.config.membership.resolve(answer, categories) {
            Resolution::Category(category) => Ok(category),
            Resolution::Unknown(response) => {
                tracing::warn!(response = %response, "Answer is not a known category");
                Err(ClassifyError::UnknownCategory { response })
            }
        }
    }
}
