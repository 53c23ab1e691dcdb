//! The analysis pipeline.
//!
//! This is the whole program as one linear function with explicit inputs and
//! outputs — load, test, fit — so the CLI stays a thin presentation layer and
//! the end-to-end path is testable without spawning processes:
//!
//! load pair -> validate alignment -> Engle-Granger -> load spread -> OLS

use crate::domain::{AnalysisConfig, CointResult, OlsFit, PriceSeries, SpreadTable};
use crate::error::AppError;
use crate::io::ingest;
use crate::stats::{coint, ols};

/// All computed outputs of a single `coint analyze` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stock1: PriceSeries,
    pub stock2: PriceSeries,
    pub spread: SpreadTable,
    pub coint: CointResult,
    pub ols: OlsFit,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    // 1) Load the pair and make the alignment precondition explicit.
    let stock1 = ingest::load_price_series(&config.stock1_path)?;
    let stock2 = ingest::load_price_series(&config.stock2_path)?;
    ingest::validate_alignment(&stock1, &stock2)?;

    // 2) Engle-Granger over the two price series.
    let coint = coint::engle_granger(&stock1.values, &stock2.values, config.max_lag)?;

    // 3) Load the spread dataset and build its design matrix, intercept last.
    let spread = ingest::load_spread_table(&config.spread_path)?;
    let design = ols::add_constant(&ols::design_from_columns(&spread.exog)?);
    let mut names = spread.exog_names.clone();
    names.push(ols::CONST_NAME.to_string());

    // 4) Fit and summarize OLS.
    let fit = ols::fit(&spread.endog_name, &names, &design, &spread.endog)?;

    Ok(RunOutput {
        stock1,
        stock2,
        spread,
        coint,
        ols: fit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SampleSpec, generate_pair, write_sample_files};
    use std::path::PathBuf;

    fn fixture_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "pair-coint-pipeline-{tag}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config_for(dir: &std::path::Path) -> AnalysisConfig {
        AnalysisConfig {
            stock1_path: dir.join(crate::data::STOCK1_FILE),
            stock2_path: dir.join(crate::data::STOCK2_FILE),
            spread_path: dir.join(crate::data::SPREAD_FILE),
            max_lag: None,
            significance: 0.05,
            export: None,
        }
    }

    #[test]
    fn end_to_end_recovers_generator_parameters() {
        let dir = fixture_dir("e2e");
        let sample = generate_pair(&SampleSpec {
            count: 400,
            seed: 42,
            hedge_ratio: 0.8,
            intercept: 5.0,
            independent: false,
        })
        .unwrap();
        write_sample_files(&dir, &sample).unwrap();

        let out = run_analysis(&config_for(&dir)).unwrap();

        // Cointegration is detected on the known positive case.
        assert!(out.coint.p_value < 0.05, "p={}", out.coint.p_value);

        // The regression recovers the generator's parameters, intercept last.
        assert_eq!(out.ols.coefficients.len(), 2);
        assert_eq!(out.ols.coefficients[1].name, "const");
        assert!((out.ols.coefficients[0].estimate - 0.8).abs() < 0.05);
        assert!((out.ols.coefficients[1].estimate - 5.0).abs() < 2.0);
        assert!(out.ols.diagnostics.r_squared > 0.9);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn independent_pair_is_not_flagged() {
        let dir = fixture_dir("indep");
        let sample = generate_pair(&SampleSpec {
            count: 400,
            seed: 42,
            hedge_ratio: 0.8,
            intercept: 5.0,
            independent: true,
        })
        .unwrap();
        write_sample_files(&dir, &sample).unwrap();

        let out = run_analysis(&config_for(&dir)).unwrap();
        assert!(out.coint.p_value > 0.05, "p={}", out.coint.p_value);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_input_file_aborts_with_load_error() {
        let dir = fixture_dir("missing");
        let err = run_analysis(&config_for(&dir)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        std::fs::remove_dir_all(&dir).ok();
    }
}
