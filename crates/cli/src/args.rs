//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// product-classifier: classify product descriptions into categories with a local LLM
#[derive(Parser, Debug)]
#[command(name = "product-classifier")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_negates_reqs = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify descriptions given on the command line
    Classify(ClassifyArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// CSV file with `product_id` and `description` columns
    #[arg(required = true)]
    pub product_file: Option<PathBuf>,

    /// CSV file with a `category` column
    #[arg(required = true)]
    pub category_file: Option<PathBuf>,

    /// Where to write the products with their predicted category
    #[arg(required = true)]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Product descriptions to classify (built-in samples when omitted)
    pub descriptions: Vec<String>,

    /// Candidate category; repeat for several
    #[arg(long = "category", conflicts_with = "categories_file")]
    pub categories: Vec<String>,

    /// CSV file to read the candidate categories from
    #[arg(long)]
    pub categories_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_run_arguments() {
        let cli = Cli::try_parse_from(["product-classifier", "p.csv", "c.csv", "o.csv"]).unwrap();

        assert!(cli.command.is_none());
        assert_eq!(cli.run.product_file, Some(PathBuf::from("p.csv")));
        assert_eq!(cli.run.category_file, Some(PathBuf::from("c.csv")));
        assert_eq!(cli.run.output_file, Some(PathBuf::from("o.csv")));
    }

    #[test]
    fn test_missing_run_argument_is_rejected() {
        let result = Cli::try_parse_from(["product-classifier", "p.csv", "c.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_classify_subcommand_needs_no_positionals() {
        let cli = Cli::try_parse_from([
            "product-classifier",
            "classify",
            "--category",
            "Toys",
            "--category",
            "Clothing",
            "A teddy bear",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Classify(args)) => {
                assert_eq!(args.descriptions, vec!["A teddy bear"]);
                assert_eq!(args.categories, vec!["Toys", "Clothing"]);
            }
            other => panic!("expected classify, got {:?}", other),
        }
    }
}
