//! Pipeline use case - load products and categories, classify, write results

use std::path::Path;
use thiserror::Error;

use crate::{
    model::{CategoryList, PipelineSummary, Table},
    ports::{DataError, TableStore, TextCompletion},
    usecases::classify::{ClassifyError, ClassifyUseCase},
};

/// Error type for a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("Classification of row {row} failed: {source}")]
    Classify {
        /// Zero-based data row (the header is not counted)
        row: usize,
        #[source]
        source: ClassifyError,
    },
    #[error("Output column '{column}' is also the description column")]
    OutputOverwritesInput { column: String },
}

/// Column names used by the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Product column holding the text to classify
    pub description_column: String,
    /// Category-file column holding the candidate labels
    pub category_column: String,
    /// Column added to the output with the predictions
    pub output_column: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            description_column: "description".to_string(),
            category_column: "category".to_string(),
            output_column: "predicted_category".to_string(),
        }
    }
}

/// Reads a product table, classifies every row and writes the enriched table
pub struct ClassificationPipeline<'a, S: ?Sized, C> {
    store: &'a S,
    classify: &'a ClassifyUseCase<C>,
    config: PipelineConfig,
}

impl<'a, S, C> ClassificationPipeline<'a, S, C>
where
    S: TableStore + ?Sized,
    C: TextCompletion,
{
    pub fn new(store: &'a S, classify: &'a ClassifyUseCase<C>, config: PipelineConfig) -> Self {
        Self {
            store,
            classify,
            config,
        }
    }

    /// Load the candidate categories from the category file
    pub async fn load_categories(&self, path: &Path) -> Result<CategoryList, DataError> {
        let table = self.store.read_table(path).await?;
        let column = table
            .column(&self.config.category_column)
            .ok_or_else(|| DataError::MissingColumn {
                path: path.to_path_buf(),
                column: self.config.category_column.clone(),
            })?;

        let categories: CategoryList = column
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect();

        tracing::info!(
            path = %path.display(),
            count = categories.len(),
            "Loaded categories"
        );

        Ok(categories)
    }

    /// Load the product table and check it can be classified
    pub async fn load_products(&self, path: &Path) -> Result<Table, DataError> {
        let table = self.store.read_table(path).await?;

        if table.column_index(&self.config.description_column).is_none() {
            return Err(DataError::MissingColumn {
                path: path.to_path_buf(),
                column: self.config.description_column.clone(),
            });
        }

        tracing::info!(path = %path.display(), rows = table.len(), "Loaded products");

        Ok(table)
    }

    /// Run the whole pipeline
    ///
    /// The output file is only written once every row has been classified.
    pub async fn run(
        &self,
        product_path: &Path,
        category_path: &Path,
        output_path: &Path,
    ) -> Result<PipelineSummary, PipelineError> {
        if self.config.output_column == self.config.description_column {
            return Err(PipelineError::OutputOverwritesInput {
                column: self.config.output_column.clone(),
            });
        }

        let mut products = self.load_products(product_path).await?;
        let categories = self.load_categories(category_path).await?;

        if categories.is_empty() {
            tracing::warn!(path = %category_path.display(), "Category list is empty");
        }

        let description_col = products
            .column_index(&self.config.description_column)
            .ok_or_else(|| DataError::MissingColumn {
                path: product_path.to_path_buf(),
                column: self.config.description_column.clone(),
            })?;

        self.classify_rows(&mut products, description_col, &categories)
            .await?;

        self.store.write_table(output_path, &products).await?;

        tracing::info!(
            path = %output_path.display(),
            rows = products.len(),
            "Wrote classified products"
        );

        Ok(PipelineSummary {
            rows: products.len(),
            categories: categories.len(),
            output_path: output_path.to_path_buf(),
        })
    }

    /// Classify each row in place, one row at a time
    async fn classify_rows(
        &self,
        products: &mut Table,
        description_col: usize,
        categories: &CategoryList,
    ) -> Result<(), PipelineError> {
        let output_col = products.ensure_column(&self.config.output_column);

        for row in 0..products.len() {
            let description = products
                .cell(row, description_col)
                .unwrap_or_default()
                .to_string();

            let category = self
                .classify
                .classify(&description, categories)
                .await
                .map_err(|source| PipelineError::Classify { row, source })?;

            tracing::debug!(row = row, category = %category, "Row classified");
            products.set(row, output_col, category);
        }

        Ok(())
    }
}
