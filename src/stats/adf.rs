//! Augmented Dickey-Fuller unit-root test.
//!
//! The auxiliary regression at lag order `k` is
//!
//! ```text
//! Δy_t = ρ·y_{t-1} + Σ_{j=1..k} φ_j·Δy_{t-j} [+ c] + ε_t
//! ```
//!
//! and the reported statistic is the t-statistic on ρ. The lag order is chosen
//! by AIC over `0..=maxlag`, with every candidate fitted on the same trimmed
//! sample so the criteria are comparable; the winner is then refit on the full
//! usable sample. `maxlag` defaults to Schwert's rule `12·(n/100)^(1/4)`.

use crate::domain::AdfResult;
use crate::error::AppError;
use crate::stats::mackinnon;
use crate::stats::ols;

/// Deterministic terms included in the auxiliary regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdfRegression {
    /// Constant, no trend. The default for observed series.
    Constant,
    /// No deterministic terms. Used for regression residuals, which are
    /// mean-zero by construction.
    NoConstant,
}

impl AdfRegression {
    fn n_deterministic(self) -> usize {
        match self {
            AdfRegression::Constant => 1,
            AdfRegression::NoConstant => 0,
        }
    }
}

/// Raw ADF statistic plus the sample actually used.
#[derive(Debug, Clone, Copy)]
pub struct AdfStatistic {
    pub statistic: f64,
    pub used_lag: usize,
    pub nobs: usize,
}

/// Minimum series length for a meaningful test.
const MIN_OBS: usize = 8;

/// Full ADF test of an observed series (constant, no trend).
pub fn adf_test(series: &[f64], max_lag: Option<usize>) -> Result<AdfResult, AppError> {
    let stat = adf_statistic(series, max_lag, AdfRegression::Constant)?;
    Ok(AdfResult {
        statistic: stat.statistic,
        p_value: mackinnon::p_value(stat.statistic, 1)?,
        critical_values: mackinnon::crit_values(1, stat.nobs)?,
        used_lag: stat.used_lag,
        nobs: stat.nobs,
    })
}

/// ADF statistic with AIC lag selection. The cointegration test calls this on
/// residuals and applies its own (two-variable) p-value surface.
pub fn adf_statistic(
    series: &[f64],
    max_lag: Option<usize>,
    regression: AdfRegression,
) -> Result<AdfStatistic, AppError> {
    let n = series.len();
    if n < MIN_OBS {
        return Err(AppError::new(
            3,
            format!("Not enough observations for a unit-root test: n={n} (need {MIN_OBS})."),
        ));
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(AppError::new(4, "Non-finite value in unit-root test input."));
    }

    let ntrend = regression.n_deterministic();
    let max_lag = resolve_max_lag(n, ntrend, max_lag)?;

    let diffs: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();

    // Lag selection: all candidates share the sample starting at maxlag + 1.
    let mut best: Option<(usize, f64)> = None;
    for lag in 0..=max_lag {
        let fit = fit_adf_regression(series, &diffs, lag, max_lag + 1, regression)?;
        let aic = fit.diagnostics.aic;
        if best.is_none_or(|(_, best_aic)| aic < best_aic) {
            best = Some((lag, aic));
        }
    }
    let (used_lag, _) = best.ok_or_else(|| AppError::new(4, "Lag selection produced no fits."))?;

    // Refit the winner on the full usable sample.
    let fit = fit_adf_regression(series, &diffs, used_lag, used_lag + 1, regression)?;
    let statistic = fit.coefficients[0].t_stat;
    if !statistic.is_finite() {
        return Err(AppError::new(
            4,
            "Unit-root regression produced a non-finite statistic (degenerate series?).",
        ));
    }

    Ok(AdfStatistic {
        statistic,
        used_lag,
        nobs: fit.diagnostics.nobs,
    })
}

/// Schwert's rule, capped so every candidate regression stays overdetermined.
fn resolve_max_lag(n: usize, ntrend: usize, requested: Option<usize>) -> Result<usize, AppError> {
    let bound = (n / 2)
        .saturating_sub(ntrend)
        .saturating_sub(1);

    let max_lag = match requested {
        Some(lag) => {
            if lag > bound {
                return Err(AppError::new(
                    3,
                    format!("--max-lag {lag} too large for n={n} observations (max {bound})."),
                ));
            }
            lag
        }
        None => {
            let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
            schwert.min(bound)
        }
    };

    // Sanity: the widest candidate must leave more rows than parameters.
    let nobs = n - 1 - max_lag;
    let n_params = 1 + max_lag + ntrend;
    if nobs <= n_params {
        return Err(AppError::new(
            3,
            format!("Not enough observations for a unit-root test with maxlag={max_lag}."),
        ));
    }
    Ok(max_lag)
}

/// Fit the auxiliary regression at `lag`, using rows `t = start..n`.
fn fit_adf_regression(
    series: &[f64],
    diffs: &[f64],
    lag: usize,
    start: usize,
    regression: AdfRegression,
) -> Result<crate::domain::OlsFit, AppError> {
    let n = series.len();
    let nobs = n - start;

    let mut endog = Vec::with_capacity(nobs);
    let mut level = Vec::with_capacity(nobs);
    let mut lagged: Vec<Vec<f64>> = vec![Vec::with_capacity(nobs); lag];

    // diffs[i] = y[i+1] - y[i], so Δy_t lives at diffs[t - 1].
    for t in start..n {
        endog.push(diffs[t - 1]);
        level.push(series[t - 1]);
        for (j, col) in lagged.iter_mut().enumerate() {
            col.push(diffs[t - 2 - j]);
        }
    }

    let mut columns = Vec::with_capacity(1 + lag);
    let mut names = Vec::with_capacity(2 + lag);
    columns.push(level);
    names.push("y.L1".to_string());
    for (j, col) in lagged.into_iter().enumerate() {
        columns.push(col);
        names.push(format!("dy.L{}", j + 1));
    }

    let mut design = ols::design_from_columns(&columns)?;
    if regression == AdfRegression::Constant {
        design = ols::add_constant(&design);
        names.push(ols::CONST_NAME.to_string());
    }

    ols::fit("dy", &names, &design, &endog)
}
