//! Command-line interface definition.
//!
//! The surface is deliberately small: `train` fits a forest from a survey
//! CSV, `predict` scores a single JSON response against saved artifacts,
//! and `schema` prints the feature layout a model expects.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

use crate::training::Verbosity;

/// Estimate monthly carbon emissions from lifestyle surveys.
#[derive(Parser, Debug)]
#[command(name = "footprint", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v for debug detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Training verbosity implied by the `-v` count.
    pub fn verbosity(&self) -> Verbosity {
        if self.verbose > 0 {
            Verbosity::Debug
        } else {
            Verbosity::Info
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit a model from a survey CSV and write its artifact files
    Train(TrainArgs),
    /// Score a single survey response against saved artifacts
    Predict(PredictArgs),
    /// Print the feature schema of a model, or the built-in one
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Training CSV with survey answers and a CarbonEmission column
    #[arg(value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// Directory to write model, scaler, and schema artifacts into
    #[arg(short, long, default_value = "models", value_hint = ValueHint::DirPath)]
    pub out: PathBuf,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    pub trees: usize,

    /// Seed for deterministic fitting
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of rows held out for validation metrics
    #[arg(long, default_value_t = 0.2)]
    pub valid_fraction: f64,

    /// Fit on raw kilograms instead of log-transformed targets
    #[arg(long)]
    pub raw_target: bool,
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// JSON file holding one survey response
    #[arg(value_hint = ValueHint::FilePath)]
    pub survey: PathBuf,

    /// Directory containing the artifact files
    #[arg(short, long, default_value = "models", value_hint = ValueHint::DirPath)]
    pub models: PathBuf,

    /// Emit the result as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Directory containing artifact files; omit to show the built-in schema
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    pub models: Option<PathBuf>,
}
