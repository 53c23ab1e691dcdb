//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the analysis pipeline
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, SampleArgs};
use crate::domain::AnalysisConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `coint` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `coint` to behave like `coint analyze`, matching the
    // original workflow of running the script in a directory holding the
    // three fixed-name CSVs.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args);
    let out = pipeline::run_analysis(&config)?;

    // The bare p-value first: the one number the original workflow watches.
    println!("{}", out.coint.p_value);
    println!();
    println!(
        "{}",
        crate::report::format_coint_report(
            &out.coint,
            &out.stock1.name,
            &out.stock2.name,
            config.significance,
        )
    );
    println!("{}", crate::report::format_ols_summary(&out.ols));

    if let Some(path) = &config.export {
        crate::io::export::write_results_json(path, &out)?;
    }

    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let spec = crate::data::SampleSpec {
        count: args.count,
        seed: args.seed,
        hedge_ratio: args.hedge_ratio,
        intercept: args.intercept,
        independent: args.independent,
    };
    let sample = crate::data::generate_pair(&spec)?;
    let paths = crate::data::write_sample_files(&args.out_dir, &sample)?;

    for path in paths {
        println!("wrote {}", path.display());
    }
    Ok(())
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    AnalysisConfig {
        stock1_path: args.stock1.clone(),
        stock2_path: args.stock2.clone(),
        spread_path: args.spread.clone(),
        max_lag: args.max_lag,
        significance: args.significance,
        export: args.export.clone(),
    }
}

/// Rewrite argv so `coint` defaults to `coint analyze`.
///
/// Rules:
/// - `coint`                     -> `coint analyze`
/// - `coint --stock1 a.csv ...`  -> `coint analyze --stock1 a.csv ...`
/// - `coint --help/--version`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "analyze flags".
    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
        return argv;
    }

    // Otherwise, leave as-is (clap will produce the usage error).
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_analyze() {
        assert_eq!(rewrite_args(argv(&["coint"])), argv(&["coint", "analyze"]));
    }

    #[test]
    fn leading_flag_is_treated_as_analyze_flags() {
        assert_eq!(
            rewrite_args(argv(&["coint", "--stock1", "a.csv"])),
            argv(&["coint", "analyze", "--stock1", "a.csv"])
        );
    }

    #[test]
    fn help_and_subcommands_pass_through() {
        assert_eq!(rewrite_args(argv(&["coint", "--help"])), argv(&["coint", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["coint", "sample", "-n", "100"])),
            argv(&["coint", "sample", "-n", "100"])
        );
    }
}
