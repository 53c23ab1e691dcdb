//! Engle-Granger two-step cointegration test.
//!
//! Step 1 regresses series 1 on series 2 plus a constant (appended last) to
//! estimate the long-run relationship. Step 2 runs an augmented Dickey-Fuller
//! regression on the step-1 residuals with no deterministic terms, and maps
//! the statistic through the **two-variable** MacKinnon surface — the residual
//! distribution must account for the estimated cointegrating vector, so the
//! single-series ADF tables would be anti-conservative here.

use crate::domain::CointResult;
use crate::error::AppError;
use crate::stats::adf::{self, AdfRegression};
use crate::stats::mackinnon;
use crate::stats::ols;

/// Minimum pair length for a meaningful test.
const MIN_OBS: usize = 12;

/// Relative tolerance below which step-1 residuals count as identically zero.
const ZERO_RESID_TOL: f64 = 1e-10;

/// Run the Engle-Granger test over two aligned series.
///
/// The caller is responsible for alignment; equal length is re-checked here
/// because it is a hard precondition, not a convention.
pub fn engle_granger(
    series1: &[f64],
    series2: &[f64],
    max_lag: Option<usize>,
) -> Result<CointResult, AppError> {
    let n = series1.len();
    if series2.len() != n {
        return Err(AppError::new(
            3,
            format!(
                "Price series have different lengths: {n} vs {} observations.",
                series2.len()
            ),
        ));
    }
    if n < MIN_OBS {
        return Err(AppError::new(
            3,
            format!("Not enough observations for a cointegration test: n={n} (need {MIN_OBS})."),
        ));
    }

    // Step 1: cointegrating regression.
    let design = ols::add_constant(&ols::design_from_columns(&[series2.to_vec()])?);
    let names = vec!["series2".to_string(), ols::CONST_NAME.to_string()];
    let step1 = ols::fit("series1", &names, &design, series1)?;

    let hedge_ratio = step1.coefficients[0].estimate;
    let intercept = step1.coefficients[1].estimate;

    // Identical (or exactly proportional) series leave a zero residual: the
    // spread is trivially stationary and the ADF regression would divide by
    // zero. Short-circuit to the strongest possible evidence.
    let scale = series1.iter().map(|v| v.abs()).fold(0.0, f64::max).max(1.0);
    let resid_rms = (step1.residuals.iter().map(|e| e * e).sum::<f64>() / n as f64).sqrt();
    if resid_rms < ZERO_RESID_TOL * scale {
        return Ok(CointResult {
            statistic: f64::NEG_INFINITY,
            p_value: 0.0,
            critical_values: mackinnon::crit_values(2, n - 1)?,
            hedge_ratio,
            intercept,
            used_lag: 0,
            nobs: n - 1,
        });
    }

    // Step 2: unit-root test on the residuals.
    let stat = adf::adf_statistic(&step1.residuals, max_lag, AdfRegression::NoConstant)?;

    Ok(CointResult {
        statistic: stat.statistic,
        p_value: mackinnon::p_value(stat.statistic, 2)?,
        critical_values: mackinnon::crit_values(2, stat.nobs)?,
        hedge_ratio,
        intercept,
        used_lag: stat.used_lag,
        nobs: stat.nobs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::StdRng;
    use rand_distr::Normal;

    fn random_walk(drift: f64, n: usize, rng: &mut StdRng) -> Vec<f64> {
        let normal = Normal::new(0.0, 1.0).unwrap();
        let mut y = 100.0;
        (0..n)
            .map(|_| {
                y += drift + normal.sample(rng);
                y
            })
            .collect()
    }

    #[test]
    fn identical_series_are_trivially_cointegrated() {
        let mut rng = StdRng::seed_from_u64(3);
        let series = random_walk(0.0, 200, &mut rng);
        let result = engle_granger(&series, &series, None).unwrap();
        assert_eq!(result.p_value, 0.0);
        assert!((result.hedge_ratio - 1.0).abs() < 1e-8);
        assert!(result.intercept.abs() < 1e-6);
    }

    #[test]
    fn cointegrated_pair_is_detected() {
        // series1 tracks series2 through a fast-mean-reverting disturbance.
        let mut rng = StdRng::seed_from_u64(17);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let series2 = random_walk(0.0, 400, &mut rng);
        let mut u = 0.0;
        let series1: Vec<f64> = series2
            .iter()
            .map(|&x| {
                u = 0.3 * u + normal.sample(&mut rng);
                5.0 + 0.8 * x + u
            })
            .collect();

        let result = engle_granger(&series1, &series2, None).unwrap();
        assert!(result.p_value < 0.05, "p={}", result.p_value);
        assert!((result.hedge_ratio - 0.8).abs() < 0.05);
        assert!(result.is_cointegrated(0.05));
    }

    #[test]
    fn independent_drifting_walks_are_not_cointegrated() {
        let mut rng = StdRng::seed_from_u64(23);
        let series1 = random_walk(0.4, 400, &mut rng);
        let series2 = random_walk(-0.2, 400, &mut rng);

        let result = engle_granger(&series1, &series2, None).unwrap();
        assert!(result.p_value > 0.05, "p={}", result.p_value);
        assert!(!result.is_cointegrated(0.05));
    }

    #[test]
    fn constant_series_is_a_descriptive_numerical_error() {
        let series1: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        let series2 = vec![50.0; 100];
        let err = engle_granger(&series1, &series2, None).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn length_mismatch_is_fatal() {
        let err = engle_granger(&[1.0; 50], &[1.0; 49], None).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
