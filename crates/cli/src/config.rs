//! Configuration loading and management

use anyhow::{Context, Result, bail};
use product_classifier_domain::MembershipPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub classify: ClassifySection,

    #[serde(default)]
    pub csv: CsvConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub temperature: Option<f64>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub retries: u32,

    #[serde(default)]
    pub ollama: OllamaConfig,

    #[serde(default)]
    pub openai_compat: OpenAiCompatConfig,

    #[serde(default)]
    pub stub: StubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiCompatConfig {
    #[serde(default)]
    pub base_url: String,

    /// Env var holding the API key; empty for servers without auth
    #[serde(default)]
    pub api_key_env: String,
}

/// Offline provider answering from substring rules
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StubConfig {
    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub rules: Vec<StubRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StubRule {
    pub contains: String,
    pub response: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifySection {
    #[serde(default)]
    pub membership: MembershipPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default = "default_description_column")]
    pub description_column: String,

    #[serde(default = "default_category_column")]
    pub category_column: String,

    #[serde(default = "default_output_column")]
    pub output_column: String,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "llama3.1".to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_delimiter() -> char {
    ','
}

fn default_description_column() -> String {
    "description".to_string()
}

fn default_category_column() -> String {
    "category".to_string()
}

fn default_output_column() -> String {
    "predicted_category".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            temperature: None,
            timeout_secs: default_timeout(),
            retries: 0,
            ollama: OllamaConfig::default(),
            openai_compat: OpenAiCompatConfig::default(),
            stub: StubConfig::default(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
        }
    }
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            description_column: default_description_column(),
            category_column: default_category_column(),
            output_column: default_output_column(),
        }
    }
}

impl CsvConfig {
    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("CSV delimiter must be an ASCII character, got '{}'", self.delimiter);
        }
        Ok(self.delimiter as u8)
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("PRODUCT_CLASSIFIER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# product-classifier configuration

[general]
log_level = "info"

[llm]
provider = "ollama"  # ollama, openai_compat, stub
model = "llama3.1"
# temperature = 0.0
timeout_secs = 300
# 0 keeps the fail-fast behavior: one attempt per description
retries = 0

[llm.ollama]
base_url = "http://localhost:11434"

[llm.openai_compat]
base_url = "http://localhost:8080/v1"
# api_key_env = "LLM_API_KEY"

# Offline answers for dry runs; the first rule whose text occurs in the prompt wins
[llm.stub]
# default = "Electronics"

# [[llm.stub.rules]]
# contains = "smartphone"
# response = "Electronics"

[classify]
membership = "accept"  # accept, normalize, reject

[csv]
delimiter = ","
description_column = "description"
category_column = "category"
output_column = "predicted_category"
"#
        .to_string()
    }
}
