//! Command-line parsing for the home price estimator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the generation/fitting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::SessionSettings;
use crate::data::{DEFAULT_SAMPLE_SIZE, MarketConfig};
use crate::domain::{Bathrooms, ForestConfig};

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hpe", version, about = "Indian home price estimator (synthetic market + random forest)")]
pub struct Cli {
    /// Log level used when HPE_LOG is not set (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate the price of one property and print the insight.
    Estimate(EstimateArgs),
    /// Interactive prompt: one query per line, `q` to quit.
    Session(MarketArgs),
    /// Generate the market sample and summarise it.
    Sample(SampleArgs),
    /// Per-city average prices and the overall price distribution.
    Trends(TrendsArgs),
    /// Fit on part of the sample and score the held-out rest.
    Evaluate(EvaluateArgs),
    /// List supported cities and their price multipliers.
    Cities,
    /// Print a previously exported estimate JSON.
    Show(ShowArgs),
}

/// Options shared by every command that builds a market.
#[derive(Debug, Args, Clone)]
pub struct MarketArgs {
    /// Number of synthetic properties to generate.
    #[arg(long, env = "HPE_SAMPLE_SIZE", default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub samples: usize,

    /// Seed for sample generation (wall-clock seeded when omitted).
    #[arg(long, env = "HPE_SEED")]
    pub seed: Option<u64>,

    /// Number of trees in the forest.
    #[arg(long, env = "HPE_TREES", default_value_t = 100)]
    pub trees: usize,

    /// Seed for bootstrap resampling.
    #[arg(long, default_value_t = 42)]
    pub forest_seed: u64,

    /// Maximum tree depth (unbounded when omitted).
    #[arg(long)]
    pub max_depth: Option<usize>,
}

impl MarketArgs {
    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            sample_size: self.samples,
            seed: self.seed,
            market: MarketConfig::default(),
            forest: ForestConfig {
                n_trees: self.trees,
                seed: self.forest_seed,
                max_depth: self.max_depth,
                ..ForestConfig::default()
            },
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Built-up area in square feet.
    #[arg(long)]
    pub area: u32,

    /// Number of bedrooms (1-5).
    #[arg(long)]
    pub bedrooms: u8,

    /// Number of bathrooms (1.0-4.0 in steps of 0.5).
    #[arg(long, value_parser = parse_bathrooms)]
    pub bathrooms: Bathrooms,

    /// City name, e.g. Mumbai.
    #[arg(long)]
    pub city: String,

    /// Export the estimate (query, prediction, insight, run metadata) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Export the generated records to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TrendsArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Number of price distribution bins.
    #[arg(long, default_value_t = crate::report::DEFAULT_HISTOGRAM_BINS, value_parser = parse_positive)]
    pub bins: usize,
}

#[derive(Debug, Args, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Fraction of the sample held out for scoring.
    #[arg(long, default_value_t = 0.2)]
    pub holdout: f64,

    /// Seed for the train/test shuffle.
    #[arg(long, default_value_t = 42)]
    pub split_seed: u64,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Estimate JSON file produced by `hpe estimate --export-json`.
    #[arg(long, value_name = "JSON")]
    pub estimate: PathBuf,
}

fn parse_bathrooms(s: &str) -> Result<Bathrooms, String> {
    let value: f64 = s.trim().parse().map_err(|e| format!("not a number: {e}"))?;
    Bathrooms::try_from(value)
}

fn parse_positive(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
