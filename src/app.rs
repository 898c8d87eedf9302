//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initialises logging (stderr, `RUST_LOG`)
//! - parses CLI arguments and resolves the model-store location
//! - reads requests, runs the prediction pipeline
//! - writes response envelopes to stdout

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{error, info};

use crate::cli::{BatchArgs, Command, PredictArgs, StoreArgs};
use crate::domain::{PredictionRequest, PredictionResult, ResponseEnvelope, ServiceConfig};
use crate::error::AppError;
use crate::io::request::parse_request;
use crate::report::{format_envelope, summarize_store};

pub mod pipeline;

pub use pipeline::{Predictor, process_prediction};

/// Entry point for the `mandi` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    // `mandi` on its own should behave like `mandi predict`, matching the
    // stdin-in/stdout-out contract of the original prediction script.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Predict(args) => handle_predict(args),
        Command::Batch(args) => handle_batch(args),
        Command::Inspect(args) => handle_inspect(args),
    }
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.store);
    let raw = read_input(args.input.as_deref())?;

    let envelope = match parse_request(&raw) {
        Ok(request) => process_prediction(&config.model_dir, &request),
        Err(message) => {
            info!("Rejected request: {message}");
            ResponseEnvelope::failure(message)
        }
    };

    write_stdout(&[format_envelope(&envelope, args.pretty)])
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = config_from_args(&args.store);
    let raw = read_input(args.input.as_deref())?;

    let parsed: Vec<Result<PredictionRequest, String>> = raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_request)
        .collect();

    let envelopes = match Predictor::load(&config.model_dir) {
        Ok(predictor) => batch_envelopes(&predictor, parsed),
        Err(err) => {
            error!("Failed to load model store: {err}");
            load_failure_envelopes(&err.to_string(), parsed)
        }
    };

    let lines: Vec<String> = envelopes.iter().map(|e| format_envelope(e, false)).collect();
    write_stdout(&lines)
}

/// Predict every parsed request; unparsable lines become failure envelopes in place.
fn batch_envelopes(predictor: &Predictor, parsed: Vec<Result<PredictionRequest, String>>) -> Vec<ResponseEnvelope> {
    let valid: Vec<PredictionRequest> = parsed.iter().filter_map(|p| p.as_ref().ok().cloned()).collect();
    let mut predicted = predictor.predict_batch(&valid).into_iter();

    parsed
        .into_iter()
        .map(|p| match p {
            Ok(_) => predicted
                .next()
                .unwrap_or_else(|| ResponseEnvelope::success(PredictionResult::fallback())),
            Err(message) => ResponseEnvelope::failure(message),
        })
        .collect()
}

/// Validation errors win over the load error, as in single-request mode.
fn load_failure_envelopes(load_error: &str, parsed: Vec<Result<PredictionRequest, String>>) -> Vec<ResponseEnvelope> {
    parsed
        .into_iter()
        .map(|p| match p {
            Ok(_) => ResponseEnvelope::failure(load_error),
            Err(message) => ResponseEnvelope::failure(message),
        })
        .collect()
}

fn handle_inspect(args: StoreArgs) -> Result<(), AppError> {
    let config = config_from_args(&args);
    let predictor = Predictor::load(&config.model_dir)?;
    let summary = summarize_store(predictor.artifacts());
    let rendered = serde_json::to_string_pretty(&summary)
        .map_err(|e| AppError::new(1, format!("Failed to render store summary: {e}")))?;
    write_stdout(&[rendered])
}

/// Resolve the model store: flag, then environment (`.env` honoured), then default.
pub fn config_from_args(args: &StoreArgs) -> ServiceConfig {
    dotenvy::dotenv().ok();
    let config = resolve_config(args.model_dir.clone(), std::env::var(ServiceConfig::MODEL_DIR_ENV).ok());
    info!("Using model store '{}'", config.model_dir.display());
    config
}

fn resolve_config(flag: Option<PathBuf>, env_value: Option<String>) -> ServiceConfig {
    let model_dir = flag
        .or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(ServiceConfig::DEFAULT_MODEL_DIR));
    ServiceConfig { model_dir }
}

fn read_input(path: Option<&Path>) -> Result<String, AppError> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| AppError::new(2, format!("Failed to read input '{}': {e}", path.display()))),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| AppError::new(2, format!("Failed to read stdin: {e}")))?;
            Ok(buf)
        }
    }
}

fn write_stdout(lines: &[String]) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        writeln!(out, "{line}").map_err(|e| AppError::new(1, format!("Failed to write output: {e}")))?;
    }
    out.flush()
        .map_err(|e| AppError::new(1, format!("Failed to write output: {e}")))
}

/// Rewrite argv so `mandi` defaults to `mandi predict`.
///
/// Rules:
/// - `mandi`                        -> `mandi predict`
/// - `mandi --model-dir DIR ...`    -> `mandi predict --model-dir DIR ...`
/// - `mandi --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("predict".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "predict" | "batch" | "inspect");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "predict flags".
    if arg1.starts_with('-') {
        argv.insert(1, "predict".to_string());
        return argv;
    }

    argv
}
