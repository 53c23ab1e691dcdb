//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during the analysis
//! - exported to JSON
//! - asserted against in tests without touching the CLI

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Resolved configuration for a single `coint analyze` run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// First instrument price CSV.
    pub stock1_path: PathBuf,
    /// Second instrument price CSV.
    pub stock2_path: PathBuf,
    /// Spread dataset CSV (endogenous column first, exogenous after).
    pub spread_path: PathBuf,
    /// Maximum ADF lag order; `None` means Schwert's rule.
    pub max_lag: Option<usize>,
    /// Significance level for the cointegration verdict.
    pub significance: f64,
    /// Optional JSON export of the run output.
    pub export: Option<PathBuf>,
}

/// One instrument's price history, loaded from CSV.
///
/// Dates are optional: a bare single-column file is accepted, but when both
/// members of a pair carry dates we validate row-by-row alignment instead of
/// silently trusting row order.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    /// Column header of the value column (used in reports).
    pub name: String,
    pub dates: Option<Vec<NaiveDate>>,
    pub values: Vec<f64>,
}

impl PriceSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The spread dataset: an endogenous column plus one or more exogenous columns.
///
/// Column convention (resolves the schema left open by the source material):
/// after an optional leading `date` column, the first column is the dependent
/// variable and every remaining numeric column is a regressor.
#[derive(Debug, Clone)]
pub struct SpreadTable {
    pub endog_name: String,
    pub endog: Vec<f64>,
    pub exog_names: Vec<String>,
    /// Column-major regressor data; every column has `endog.len()` rows.
    pub exog: Vec<Vec<f64>>,
}

impl SpreadTable {
    pub fn n_obs(&self) -> usize {
        self.endog.len()
    }

    pub fn n_exog(&self) -> usize {
        self.exog.len()
    }
}

/// Critical-value thresholds at the standard significance levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CriticalValues {
    pub one_pct: f64,
    pub five_pct: f64,
    pub ten_pct: f64,
}

/// Engle-Granger cointegration test output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CointResult {
    /// ADF t-statistic of the step-1 residuals (more negative = more stationary).
    pub statistic: f64,
    /// MacKinnon approximate asymptotic p-value (two-variable case).
    pub p_value: f64,
    pub critical_values: CriticalValues,
    /// Step-1 slope of series 1 on series 2.
    pub hedge_ratio: f64,
    /// Step-1 intercept.
    pub intercept: f64,
    /// ADF lag order chosen by AIC (or capped by `--max-lag`).
    pub used_lag: usize,
    /// Effective observations in the final ADF regression.
    pub nobs: usize,
}

impl CointResult {
    pub fn is_cointegrated(&self, significance: f64) -> bool {
        self.p_value < significance
    }
}

/// Augmented Dickey-Fuller test output for a single series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdfResult {
    pub statistic: f64,
    pub p_value: f64,
    pub critical_values: CriticalValues,
    pub used_lag: usize,
    pub nobs: usize,
}

/// One fitted coefficient with its inference columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_err: f64,
    pub t_stat: f64,
    pub p_value: f64,
    /// 95% confidence interval.
    pub conf_low: f64,
    pub conf_high: f64,
}

/// Goodness-of-fit and residual diagnostics for an OLS fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OlsDiagnostics {
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_p_value: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub nobs: usize,
    pub df_model: usize,
    pub df_resid: usize,
    pub durbin_watson: f64,
    pub skew: f64,
    /// Raw (non-excess) kurtosis; 3.0 under normality.
    pub kurtosis: f64,
    pub jarque_bera: f64,
    pub jb_p_value: f64,
    /// Condition number of the design matrix (max/min singular value).
    pub condition_number: f64,
}

/// A fitted OLS model.
///
/// The coefficient order matches the design matrix column order; when the
/// intercept is appended after the regressors it is the **last** entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OlsFit {
    pub dep_name: String,
    pub coefficients: Vec<Coefficient>,
    pub diagnostics: OlsDiagnostics,
    #[serde(skip)]
    pub fitted: Vec<f64>,
    #[serde(skip)]
    pub residuals: Vec<f64>,
}

impl OlsFit {
    /// Coefficient estimates in design-matrix column order.
    pub fn params(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.estimate).collect()
    }
}
