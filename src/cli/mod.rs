//! Command-line parsing for the `mandi` price predictor.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the encoding/inference code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mandi", version, about = "Crop market price predictor (XGBoost model store)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict prices for one JSON request and print the response envelope.
    Predict(PredictArgs),
    /// Predict prices for JSON Lines requests, one envelope per line.
    Batch(BatchArgs),
    /// Load the model store and print what it contains.
    Inspect(StoreArgs),
}

/// Model-store location.
#[derive(Debug, Args, Clone, Default)]
pub struct StoreArgs {
    /// Directory holding `label_encoders.json` and the `xgboost_model_*.json` files.
    ///
    /// Defaults to `$MANDI_MODEL_DIR`, then `./models`.
    #[arg(long, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,
}

/// Options for a single prediction.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Read the request from this file instead of stdin.
    #[arg(long, value_name = "JSON")]
    pub input: Option<PathBuf>,

    /// Indent the response envelope.
    #[arg(long)]
    pub pretty: bool,
}

/// Options for batch prediction.
#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Read JSON Lines from this file instead of stdin.
    #[arg(long, value_name = "JSONL")]
    pub input: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_accepts_model_dir_and_input() {
        let cli = Cli::parse_from(["mandi", "predict", "--model-dir", "/srv/models", "--input", "req.json"]);
        match cli.command {
            Command::Predict(args) => {
                assert_eq!(args.store.model_dir, Some(PathBuf::from("/srv/models")));
                assert_eq!(args.input, Some(PathBuf::from("req.json")));
                assert!(!args.pretty);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn inspect_has_optional_store() {
        let cli = Cli::parse_from(["mandi", "inspect"]);
        assert!(matches!(cli.command, Command::Inspect(StoreArgs { model_dir: None })));
    }
}
