//! Batch runner - classify many descriptions one after another

use thiserror::Error;

use crate::{
    model::CategoryList,
    ports::{Progress, TextCompletion},
    usecases::classify::{ClassifyError, ClassifyUseCase},
};

/// Error returned when one item of a batch fails
#[derive(Debug, Error)]
#[error("Classification of item {index} failed: {source}")]
pub struct BatchError {
    /// Zero-based position of the failing description
    pub index: usize,
    #[source]
    pub source: ClassifyError,
}

/// Sequential batch classifier
///
/// Every description gets its own model call, in input order. The first
/// failure aborts the batch and discards the results gathered so far.
pub struct BatchRunner<'a, C, P: ?Sized> {
    classify: &'a ClassifyUseCase<C>,
    progress: &'a P,
}

impl<'a, C, P> BatchRunner<'a, C, P>
where
    C: TextCompletion,
    P: Progress + ?Sized,
{
    pub fn new(classify: &'a ClassifyUseCase<C>, progress: &'a P) -> Self {
        Self { classify, progress }
    }

    pub async fn classify_many<S: AsRef<str>>(
        &self,
        descriptions: &[S],
        categories: &CategoryList,
    ) -> Result<Vec<String>, BatchError> {
        tracing::info!(
            items = descriptions.len(),
            categories = categories.len(),
            "Starting batch"
        );

        let mut results = Vec::with_capacity(descriptions.len());

        for (index, description) in descriptions.iter().enumerate() {
            let description = description.as_ref();
            let category = self
                .classify
                .classify(description, categories)
                .await
                .map_err(|source| {
                    tracing::error!(index = index, error = %source, "Batch item failed");
                    BatchError { index, source }
                })?;

            self.progress.item_classified(index, description, &category);
            results.push(category);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{NoProgress, ServiceError};
    use crate::usecases::classify::ClassifyConfig;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers with the first category mentioned by a keyword in the prompt
    struct KeywordCompletion {
        keywords: Vec<(&'static str, &'static str)>,
        calls: Mutex<usize>,
    }

    impl KeywordCompletion {
        fn new() -> Self {
            Self {
                keywords: vec![
                    ("smartphone", "Electronics"),
                    ("t-shirt", "Clothing"),
                    ("blender", "Home Appliances"),
                ],
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TextCompletion for KeywordCompletion {
        async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
            *self.calls.lock().unwrap() += 1;
            self.keywords
                .iter()
                .find(|(needle, _)| prompt.contains(needle))
                .map(|(_, category)| format!("{}\n", category))
                .ok_or_else(|| ServiceError::Api("connection refused".to_string()))
        }

        fn model(&self) -> &str {
            "keyword"
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        seen: Mutex<Vec<(usize, String, String)>>,
    }

    impl Progress for RecordingProgress {
        fn item_classified(&self, index: usize, description: &str, category: &str) {
            self.seen
                .lock()
                .unwrap()
                .push((index, description.to_string(), category.to_string()));
        }
    }

    fn categories() -> CategoryList {
        [
            "Electronics",
            "Clothing",
            "Home Appliances",
            "Sports Equipment",
            "Toys",
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn test_classify_many_preserves_order() {
        let completion = KeywordCompletion::new();
        let usecase = ClassifyUseCase::new(&completion, ClassifyConfig::default());
        let runner = BatchRunner::new(&usecase, &NoProgress);

        let descriptions = [
            "A smartphone with 128GB storage and 6GB RAM.",
            "A comfortable cotton t-shirt, available in various colors.",
            "A blender with 3-speed settings and a glass jar.",
        ];

        let results = runner
            .classify_many(&descriptions, &categories())
            .await
            .unwrap();

        assert_eq!(results, vec!["Electronics", "Clothing", "Home Appliances"]);
    }

    #[tokio::test]
    async fn test_classify_many_reordered_input_gives_reordered_output() {
        let completion = KeywordCompletion::new();
        let usecase = ClassifyUseCase::new(&completion, ClassifyConfig::default());
        let runner = BatchRunner::new(&usecase, &NoProgress);

        let results = runner
            .classify_many(&["A blender", "A smartphone"], &categories())
            .await
            .unwrap();

        assert_eq!(results, vec!["Home Appliances", "Electronics"]);
    }

    #[tokio::test]
    async fn test_duplicate_descriptions_are_classified_independently() {
        let completion = KeywordCompletion::new();
        let usecase = ClassifyUseCase::new(&completion, ClassifyConfig::default());
        let runner = BatchRunner::new(&usecase, &NoProgress);

        let results = runner
            .classify_many(&["A smartphone", "A smartphone"], &categories())
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(completion.calls(), 2);
    }

    #[tokio::test]
    async fn test_progress_reports_each_item() {
        let completion = KeywordCompletion::new();
        let usecase = ClassifyUseCase::new(&completion, ClassifyConfig::default());
        let progress = RecordingProgress::default();
        let runner = BatchRunner::new(&usecase, &progress);

        runner
            .classify_many(&["A smartphone", "A t-shirt"], &categories())
            .await
            .unwrap();

        let seen = progress.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[1],
            (1, "A t-shirt".to_string(), "Clothing".to_string())
        );
    }

    #[tokio::test]
    async fn test_first_error_aborts_batch() {
        let completion = KeywordCompletion::new();
        let usecase = ClassifyUseCase::new(&completion, ClassifyConfig::default());
        let progress = RecordingProgress::default();
        let runner = BatchRunner::new(&usecase, &progress);

        let result = runner
            .classify_many(&["A smartphone", "A rock", "A blender"], &categories())
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.index, 1);
        assert!(matches!(
            err.source,
            ClassifyError::Service(ServiceError::Api(_))
        ));
        // Nothing after the failing item is attempted
        assert_eq!(completion.calls(), 2);
        assert_eq!(progress.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let completion = KeywordCompletion::new();
        let usecase = ClassifyUseCase::new(&completion, ClassifyConfig::default());
        let runner = BatchRunner::new(&usecase, &NoProgress);

        let empty: [&str; 0] = [];
        let results = runner.classify_many(&empty, &categories()).await.unwrap();

        assert!(results.is_empty());
        assert_eq!(completion.calls(), 0);
    }
}
