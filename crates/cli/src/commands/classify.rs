//! Classify command - classify descriptions given on the command line

use anyhow::{Context, Result, bail};
use product_classifier_adapters::{
    llm::{
        LlmConfig as AdapterLlmConfig, OllamaCompletion, OpenAiCompatCompletion, Retrying,
        StubCompletion,
    },
    table::CsvTableStore,
};
use product_classifier_domain::usecases::{
    BatchRunner, ClassificationPipeline, ClassifyConfig, ClassifyUseCase, PipelineConfig,
};
use product_classifier_domain::{CategoryList, NoProgress, Progress, TextCompletion};
use secrecy::SecretString;
use std::path::PathBuf;

use crate::args::ClassifyArgs;
use crate::config::AppConfig;

const SAMPLE_DESCRIPTIONS: [&str; 3] = [
    "A smartphone with 128GB storage and 6GB RAM.",
    "A comfortable cotton t-shirt, available in various colors.",
    "A blender with 3-speed settings and a glass jar.",
];

const SAMPLE_CATEGORIES: [&str; 5] = [
    "Electronics",
    "Clothing",
    "Home Appliances",
    "Sports Equipment",
    "Toys",
];

/// Prints one line per classified description
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn item_classified(&self, _index: usize, description: &str, category: &str) {
        println!("Description: {} \n -> Classified as: {}\n", description, category);
    }
}

pub async fn execute(args: ClassifyArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    let descriptions: Vec<String> = if args.descriptions.is_empty() {
        SAMPLE_DESCRIPTIONS.iter().map(|d| d.to_string()).collect()
    } else {
        args.descriptions.clone()
    };

    let completion = build_completion(&config)?;
    let usecase = ClassifyUseCase::new(completion, classify_config_from_config(&config));
    let categories = load_categories(&args, &config, &usecase).await?;

    if categories.is_empty() {
        bail!("No categories to classify into");
    }

    tracing::info!(
        model = %usecase.model(),
        descriptions = descriptions.len(),
        categories = categories.len(),
        "Classifying descriptions"
    );

    if args.json {
        let runner = BatchRunner::new(&usecase, &NoProgress);
        let results = runner
            .classify_many(&descriptions, &categories)
            .await
            .context("Classification failed")?;

        let output: Vec<_> = descriptions
            .iter()
            .zip(&results)
            .map(|(description, category)| {
                serde_json::json!({ "description": description, "category": category })
            })
            .collect();
        let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        let runner = BatchRunner::new(&usecase, &ConsoleProgress);
        let results = runner
            .classify_many(&descriptions, &categories)
            .await
            .context("Classification failed")?;

        for (i, category) in results.iter().enumerate() {
            println!("Product {}: {}", i + 1, category);
        }
    }

    Ok(())
}

async fn load_categories<C: TextCompletion>(
    args: &ClassifyArgs,
    config: &AppConfig,
    usecase: &ClassifyUseCase<C>,
) -> Result<CategoryList> {
    if let Some(ref path) = args.categories_file {
        let store = CsvTableStore::new().with_delimiter(config.csv.delimiter_byte()?);
        let pipeline =
            ClassificationPipeline::new(&store, usecase, pipeline_config_from_config(config));
        return pipeline
            .load_categories(path)
            .await
            .context("Failed to load categories");
    }

    if args.categories.is_empty() {
        return Ok(SAMPLE_CATEGORIES.into_iter().collect());
    }

    Ok(args.categories.iter().map(String::as_str).collect())
}

/// Build the configured completion client, wrapped in the retry policy
pub(crate) fn build_completion(config: &AppConfig) -> Result<Box<dyn TextCompletion>> {
    let llm_config = adapter_llm_config(&config.llm);

    let completion: Box<dyn TextCompletion> = match config.llm.provider.as_str() {
        "ollama" => {
            let base_url = config.llm.ollama.base_url.trim();
            if base_url.is_empty() {
                Box::new(OllamaCompletion::new(llm_config.clone())?)
            } else {
                Box::new(OllamaCompletion::with_base_url(
                    base_url,
                    llm_config.clone(),
                )?)
            }
        }
        "openai_compat" => {
            let api_key = load_api_key(&config.llm.openai_compat.api_key_env)?;
            Box::new(
                OpenAiCompatCompletion::new(
                    &config.llm.openai_compat.base_url,
                    api_key,
                    llm_config.clone(),
                )
                .context("Failed to configure OpenAI-compatible provider")?,
            )
        }
        "stub" => {
            let stub = &config.llm.stub;
            let rules = stub
                .rules
                .iter()
                .map(|r| (r.contains.clone(), r.response.clone()))
                .collect();
            Box::new(StubCompletion::with_rules(rules, stub.default.clone()))
        }
        other => bail!("Unknown LLM provider: {}", other),
    };

    if llm_config.retries == 0 {
        Ok(completion)
    } else {
        Ok(Box::new(Retrying::new(completion, llm_config.retries)))
    }
}

fn adapter_llm_config(config: &crate::config::LlmConfig) -> AdapterLlmConfig {
    AdapterLlmConfig {
        model: config.model.clone(),
        temperature: config.temperature,
        timeout_secs: config.timeout_secs,
        retries: config.retries,
    }
}

pub(crate) fn classify_config_from_config(config: &AppConfig) -> ClassifyConfig {
    ClassifyConfig {
        membership: config.classify.membership,
    }
}

pub(crate) fn pipeline_config_from_config(config: &AppConfig) -> PipelineConfig {
    PipelineConfig {
        description_column: config.csv.description_column.clone(),
        category_column: config.csv.category_column.clone(),
        output_column: config.csv.output_column.clone(),
    }
}

/// Read an optional API key; an empty env var name means no key
fn load_api_key(env_var: &str) -> Result<Option<SecretString>> {
    if env_var.trim().is_empty() {
        return Ok(None);
    }

    let key = std::env::var(env_var)
        .with_context(|| format!("Missing API key env var {}", env_var))?;

    if key.trim().is_empty() {
        bail!("API key env var {} is empty", env_var);
    }

    Ok(Some(SecretString::new(key.into())))
}
