//! MacKinnon response-surface approximations for unit-root tests.
//!
//! Two pieces:
//!
//! - `p_value`: the approximate asymptotic p-value of a (augmented)
//!   Dickey-Fuller t-statistic, from MacKinnon (1994). The polynomial is
//!   indexed by the number of series in the system: 1 for a plain unit-root
//!   test, 2+ for residual-based cointegration tests where the cointegrating
//!   vector was estimated.
//! - `crit_values`: finite-sample 1%/5%/10% critical values from the
//!   MacKinnon (2010) response surface, `c = b0 + b1/n + b2/n² + b3/n³`.
//!
//! All tables are for regressions with a constant and no trend, the only
//! variant this tool runs.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::domain::CriticalValues;
use crate::error::AppError;

/// Largest system size the tables cover.
pub const MAX_N_SERIES: usize = 3;

// Region boundaries for the p-value polynomial, indexed by n_series - 1.
const TAU_MAX: [f64; 3] = [2.74, 0.92, 0.55];
const TAU_MIN: [f64; 3] = [-18.83, -18.86, -23.48];
const TAU_STAR: [f64; 3] = [-1.61, -2.62, -3.13];

// Small-p (deep left tail) cubic coefficients, low order first.
const TAU_SMALLP: [[f64; 3]; 3] = [
    [2.1659, 1.4412, 0.038269],
    [2.9200, 1.5012, 0.039796],
    [3.4699, 1.4856, 0.031640],
];

// Large-p quartic coefficients, low order first.
const TAU_LARGEP: [[f64; 4]; 3] = [
    [1.7339, 0.93202, -0.12745, -0.010368],
    [2.1945, 0.64695, -0.29198, -0.042377],
    [2.5893, 0.45168, -0.36529, -0.050074],
];

// MacKinnon (2010) response-surface coefficients at 1%/5%/10%.
const CRIT_2010: [[[f64; 4]; 3]; 3] = [
    // N = 1
    [
        [-3.43035, -6.5393, -16.786, -79.433],
        [-2.86154, -2.8903, -4.234, -40.040],
        [-2.56677, -1.5384, -2.809, 0.0],
    ],
    // N = 2
    [
        [-3.89644, -10.9519, -22.527, 0.0],
        [-3.33613, -6.1101, -6.823, 0.0],
        [-3.04445, -4.2412, -2.720, 0.0],
    ],
    // N = 3
    [
        [-4.29374, -14.4354, -33.195, 47.433],
        [-3.74066, -8.5632, -10.852, 27.982],
        [-3.45218, -6.2143, -3.718, 0.0],
    ],
];

/// Approximate asymptotic p-value for an ADF t-statistic.
///
/// `n_series` is 1 for a plain unit-root test and 2+ when the statistic comes
/// from the residuals of an estimated cointegrating regression.
pub fn p_value(stat: f64, n_series: usize) -> Result<f64, AppError> {
    let idx = table_index(n_series)?;

    if stat == f64::NEG_INFINITY {
        return Ok(0.0);
    }
    if !stat.is_finite() {
        return Err(AppError::new(4, "Non-finite unit-root test statistic."));
    }
    if stat >= TAU_MAX[idx] {
        return Ok(1.0);
    }
    if stat <= TAU_MIN[idx] {
        return Ok(0.0);
    }

    let z = if stat <= TAU_STAR[idx] {
        polyval(&TAU_SMALLP[idx], stat)
    } else {
        polyval(&TAU_LARGEP[idx], stat)
    };

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Normal distribution error: {e}")))?;
    Ok(normal.cdf(z))
}

/// Finite-sample 1%/5%/10% critical values for `nobs` observations.
pub fn crit_values(n_series: usize, nobs: usize) -> Result<CriticalValues, AppError> {
    let idx = table_index(n_series)?;
    if nobs == 0 {
        return Err(AppError::new(3, "No observations for critical values."));
    }

    let n = nobs as f64;
    let level = |b: &[f64; 4]| b[0] + b[1] / n + b[2] / (n * n) + b[3] / (n * n * n);

    Ok(CriticalValues {
        one_pct: level(&CRIT_2010[idx][0]),
        five_pct: level(&CRIT_2010[idx][1]),
        ten_pct: level(&CRIT_2010[idx][2]),
    })
}

fn table_index(n_series: usize) -> Result<usize, AppError> {
    if !(1..=MAX_N_SERIES).contains(&n_series) {
        return Err(AppError::new(
            3,
            format!("Unsupported system size {n_series} (tables cover 1..={MAX_N_SERIES})."),
        ));
    }
    Ok(n_series - 1)
}

fn polyval(coeffs: &[f64], x: f64) -> f64 {
    // Horner, low-order-first coefficients.
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adf_crit_values_match_textbook_levels_for_large_samples() {
        let crit = crit_values(1, 10_000).unwrap();
        assert!((crit.one_pct - -3.430).abs() < 0.01);
        assert!((crit.five_pct - -2.862).abs() < 0.01);
        assert!((crit.ten_pct - -2.567).abs() < 0.01);
    }

    #[test]
    fn coint_crit_values_are_wider_than_single_series() {
        let adf = crit_values(1, 500).unwrap();
        let coint = crit_values(2, 500).unwrap();
        assert!(coint.five_pct < adf.five_pct);
        assert!(coint.one_pct < coint.five_pct && coint.five_pct < coint.ten_pct);
    }

    #[test]
    fn p_value_is_monotone_in_the_statistic() {
        let stats = [-6.0, -4.0, -3.0, -2.0, -1.0, 0.0];
        let mut prev = 0.0;
        for &s in &stats {
            let p = p_value(s, 2).unwrap();
            assert!(p >= prev, "p-value should not decrease: {p} after {prev}");
            prev = p;
        }
    }

    #[test]
    fn p_value_saturates_outside_table_range() {
        assert_eq!(p_value(-50.0, 1).unwrap(), 0.0);
        assert_eq!(p_value(5.0, 1).unwrap(), 1.0);
        assert_eq!(p_value(f64::NEG_INFINITY, 2).unwrap(), 0.0);
    }

    #[test]
    fn deep_negative_statistic_is_significant_at_one_percent() {
        let p = p_value(-5.0, 2).unwrap();
        assert!(p < 0.01, "expected p < 0.01, got {p}");
    }

    #[test]
    fn statistic_near_five_percent_critical_value_has_matching_p() {
        // At the asymptotic 5% critical value the p-value should be close to 0.05.
        let crit = crit_values(1, 1_000_000).unwrap();
        let p = p_value(crit.five_pct, 1).unwrap();
        assert!((p - 0.05).abs() < 0.01, "got {p}");
    }
}
