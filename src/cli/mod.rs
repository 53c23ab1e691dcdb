//! Command-line parsing for the pair analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the statistics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "coint",
    version,
    about = "Pair cointegration test + spread regression diagnostics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the Engle-Granger test and the spread regression, print diagnostics.
    Analyze(AnalyzeArgs),
    /// Generate synthetic fixture CSVs (a cointegrated pair + spread dataset).
    Sample(SampleArgs),
}

/// Options for the analysis run.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// First instrument price CSV.
    #[arg(long, default_value = "stock_price_1.csv")]
    pub stock1: PathBuf,

    /// Second instrument price CSV.
    #[arg(long, default_value = "stock_price_2.csv")]
    pub stock2: PathBuf,

    /// Spread dataset CSV (endogenous column first, exogenous columns after).
    #[arg(long, default_value = "spread_of_stock_prices.csv")]
    pub spread: PathBuf,

    /// Maximum ADF lag order (default: Schwert's rule, 12*(n/100)^0.25).
    #[arg(long)]
    pub max_lag: Option<usize>,

    /// Significance level for the cointegration verdict.
    #[arg(long, default_value_t = 0.05)]
    pub significance: f64,

    /// Export the run output (test + fit) to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for fixture generation.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Output directory for the generated CSVs.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Number of observations per series.
    #[arg(short = 'n', long, default_value_t = 500)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// True slope linking the pair.
    #[arg(long, default_value_t = 0.8)]
    pub hedge_ratio: f64,

    /// True intercept of the link.
    #[arg(long, default_value_t = 5.0)]
    pub intercept: f64,

    /// Generate an unrelated (non-cointegrated) pair instead.
    #[arg(long)]
    pub independent: bool,
}
