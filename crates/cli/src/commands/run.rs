//! Run command - classify every row of a product CSV

use anyhow::{Context, Result};
use product_classifier_adapters::table::CsvTableStore;
use product_classifier_domain::usecases::{ClassificationPipeline, ClassifyUseCase};
use std::path::PathBuf;

use crate::args::RunArgs;
use crate::commands::classify::{
    build_completion, classify_config_from_config, pipeline_config_from_config,
};
use crate::config::AppConfig;

pub async fn execute(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let (Some(product_file), Some(category_file), Some(output_file)) =
        (args.product_file, args.category_file, args.output_file)
    else {
        anyhow::bail!("PRODUCT_FILE, CATEGORY_FILE and OUTPUT_FILE are required");
    };

    tracing::info!(
        products = %product_file.display(),
        categories = %category_file.display(),
        output = %output_file.display(),
        provider = %config.llm.provider,
        model = %config.llm.model,
        "Starting classification run"
    );

    let completion = build_completion(&config)?;
    let usecase = ClassifyUseCase::new(completion, classify_config_from_config(&config));
    let store = CsvTableStore::new().with_delimiter(config.csv.delimiter_byte()?);
    let pipeline =
        ClassificationPipeline::new(&store, &usecase, pipeline_config_from_config(&config));

    let summary = pipeline
        .run(&product_file, &category_file, &output_file)
        .await
        .context("Classification run failed")?;

    tracing::info!(
        rows = summary.rows,
        categories = summary.categories,
        "Classification run complete"
    );

    println!(
        "Classification results saved to {}",
        summary.output_path.display()
    );

    Ok(())
}
