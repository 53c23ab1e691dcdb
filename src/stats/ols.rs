//! Ordinary least squares with the usual inference columns.
//!
//! The solver itself lives in `math::ols`; this module adds everything a
//! regression summary needs: standard errors, t-statistics, p-values,
//! confidence intervals, R², F-statistic, information criteria, and residual
//! diagnostics (Durbin-Watson, Jarque-Bera, skew/kurtosis).
//!
//! The design matrix is taken exactly as given. `add_constant` appends the
//! intercept column **after** the existing regressors, so the intercept
//! coefficient is the last entry of the fitted parameter vector. Downstream
//! output depends on that ordering.

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, StudentsT};

use crate::domain::{Coefficient, OlsDiagnostics, OlsFit};
use crate::error::AppError;
use crate::math::{condition_number, solve_least_squares};

/// Name used for the appended intercept column.
pub const CONST_NAME: &str = "const";

/// Build an n×k design matrix from column-major data.
pub fn design_from_columns(columns: &[Vec<f64>]) -> Result<DMatrix<f64>, AppError> {
    let Some(first) = columns.first() else {
        return Err(AppError::new(3, "Design matrix has no columns."));
    };
    let n = first.len();
    if n == 0 {
        return Err(AppError::new(3, "Design matrix has no rows."));
    }
    for col in columns {
        if col.len() != n {
            return Err(AppError::new(
                3,
                format!(
                    "Design columns have mismatched lengths ({} vs {n}).",
                    col.len()
                ),
            ));
        }
        if col.iter().any(|v| !v.is_finite()) {
            return Err(AppError::new(4, "Non-finite value in design matrix."));
        }
    }

    let mut x = DMatrix::<f64>::zeros(n, columns.len());
    for (j, col) in columns.iter().enumerate() {
        for (i, &v) in col.iter().enumerate() {
            x[(i, j)] = v;
        }
    }
    Ok(x)
}

/// Append an intercept column of ones after the existing regressors.
pub fn add_constant(x: &DMatrix<f64>) -> DMatrix<f64> {
    let (n, k) = (x.nrows(), x.ncols());
    let mut out = DMatrix::<f64>::zeros(n, k + 1);
    for i in 0..n {
        for j in 0..k {
            out[(i, j)] = x[(i, j)];
        }
        out[(i, k)] = 1.0;
    }
    out
}

/// Fit `y ~ x` and compute the full diagnostic set.
///
/// `var_names` must have one entry per design column, in column order.
pub fn fit(
    dep_name: &str,
    var_names: &[String],
    x: &DMatrix<f64>,
    y: &[f64],
) -> Result<OlsFit, AppError> {
    let n = x.nrows();
    let p = x.ncols();

    if var_names.len() != p {
        return Err(AppError::new(
            3,
            format!("Expected {p} variable names, got {}.", var_names.len()),
        ));
    }
    if y.len() != n {
        return Err(AppError::new(
            3,
            format!(
                "Endogenous/exogenous shape mismatch: {} observations vs {n} design rows.",
                y.len()
            ),
        ));
    }
    if n <= p {
        return Err(AppError::new(
            3,
            format!("Not enough observations to fit: n={n} with {p} parameters."),
        ));
    }
    if y.iter().any(|v| !v.is_finite()) {
        return Err(AppError::new(4, "Non-finite value in endogenous series."));
    }

    let cond = condition_number(x).ok_or_else(|| {
        AppError::new(
            4,
            "Design matrix is rank-deficient (perfectly collinear columns).",
        )
    })?;

    let yv = DVector::from_column_slice(y);
    let beta = solve_least_squares(x, &yv)
        .ok_or_else(|| AppError::new(4, "Least squares solve failed (ill-conditioned design)."))?;

    let xtx_inv = (x.transpose() * x)
        .try_inverse()
        .ok_or_else(|| AppError::new(4, "Normal equations are singular."))?;

    let fitted = x * &beta;
    let resid = &yv - &fitted;

    let nf = n as f64;
    let ssr: f64 = resid.iter().map(|e| e * e).sum();

    // Total sum of squares: centered when the model carries an intercept,
    // uncentered otherwise (matters for the no-constant ADF regressions).
    let has_const = detect_constant_column(x);
    let sst = if has_const {
        let ybar = y.iter().sum::<f64>() / nf;
        y.iter().map(|v| (v - ybar) * (v - ybar)).sum::<f64>()
    } else {
        y.iter().map(|v| v * v).sum::<f64>()
    };
    if sst <= f64::MIN_POSITIVE {
        return Err(AppError::new(
            4,
            format!("Endogenous series `{dep_name}` is numerically constant."),
        ));
    }

    let df_resid = n - p;
    let df_model = p - usize::from(has_const);
    let sigma2 = ssr / df_resid as f64;

    let r_squared = 1.0 - ssr / sst;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (nf - 1.0) / (df_resid as f64);

    let t_dist = StudentsT::new(0.0, 1.0, df_resid as f64)
        .map_err(|e| AppError::new(4, format!("Student-t distribution error: {e}")))?;
    let t_crit = t_dist.inverse_cdf(0.975);

    let mut coefficients = Vec::with_capacity(p);
    for j in 0..p {
        let estimate = beta[j];
        let var_j = sigma2 * xtx_inv[(j, j)];
        let std_err = var_j.max(0.0).sqrt();
        let t_stat = if std_err > 0.0 {
            estimate / std_err
        } else {
            f64::INFINITY * estimate.signum()
        };
        let p_value = if t_stat.is_finite() {
            2.0 * (1.0 - t_dist.cdf(t_stat.abs()))
        } else {
            0.0
        };
        coefficients.push(Coefficient {
            name: var_names[j].clone(),
            estimate,
            std_err,
            t_stat,
            p_value,
            conf_low: estimate - t_crit * std_err,
            conf_high: estimate + t_crit * std_err,
        });
    }

    let (f_statistic, f_p_value) = f_test(r_squared, df_model, df_resid)?;

    // Gaussian log-likelihood at the ML variance estimate.
    let sigma2_ml = (ssr / nf).max(f64::MIN_POSITIVE);
    let log_likelihood =
        -0.5 * nf * ((2.0 * std::f64::consts::PI).ln() + sigma2_ml.ln() + 1.0);
    let k = p as f64;
    let aic = -2.0 * log_likelihood + 2.0 * k;
    let bic = -2.0 * log_likelihood + k * nf.ln();

    let residuals: Vec<f64> = resid.iter().copied().collect();
    let (durbin_watson, skew, kurtosis, jarque_bera, jb_p_value) =
        residual_diagnostics(&residuals)?;

    Ok(OlsFit {
        dep_name: dep_name.to_string(),
        coefficients,
        diagnostics: OlsDiagnostics {
            r_squared,
            adj_r_squared,
            f_statistic,
            f_p_value,
            log_likelihood,
            aic,
            bic,
            nobs: n,
            df_model,
            df_resid,
            durbin_watson,
            skew,
            kurtosis,
            jarque_bera,
            jb_p_value,
            condition_number: cond,
        },
        fitted: fitted.iter().copied().collect(),
        residuals,
    })
}

fn detect_constant_column(x: &DMatrix<f64>) -> bool {
    'cols: for j in 0..x.ncols() {
        let first = x[(0, j)];
        if first == 0.0 {
            continue;
        }
        for i in 1..x.nrows() {
            if (x[(i, j)] - first).abs() > 1e-14 * first.abs().max(1.0) {
                continue 'cols;
            }
        }
        return true;
    }
    false
}

fn f_test(r_squared: f64, df_model: usize, df_resid: usize) -> Result<(f64, f64), AppError> {
    if df_model == 0 || r_squared >= 1.0 {
        // Intercept-only model or an exact fit; the F-test carries no information.
        return Ok((f64::INFINITY, 0.0));
    }
    let f = (r_squared / df_model as f64) / ((1.0 - r_squared) / df_resid as f64);
    if !f.is_finite() || f < 0.0 {
        return Ok((f64::INFINITY, 0.0));
    }
    let dist = FisherSnedecor::new(df_model as f64, df_resid as f64)
        .map_err(|e| AppError::new(4, format!("F distribution error: {e}")))?;
    Ok((f, 1.0 - dist.cdf(f)))
}

fn residual_diagnostics(residuals: &[f64]) -> Result<(f64, f64, f64, f64, f64), AppError> {
    let n = residuals.len() as f64;
    let ssr: f64 = residuals.iter().map(|e| e * e).sum();

    let mut dw_num = 0.0;
    for w in residuals.windows(2) {
        let d = w[1] - w[0];
        dw_num += d * d;
    }
    let durbin_watson = if ssr > 0.0 { dw_num / ssr } else { 0.0 };

    let mean = residuals.iter().sum::<f64>() / n;
    let m2 = residuals.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;
    if m2 <= f64::MIN_POSITIVE {
        // Degenerate (exact-fit) residuals; report Gaussian reference values.
        return Ok((durbin_watson, 0.0, 3.0, 0.0, 1.0));
    }
    let m3 = residuals.iter().map(|e| (e - mean).powi(3)).sum::<f64>() / n;
    let m4 = residuals.iter().map(|e| (e - mean).powi(4)).sum::<f64>() / n;

    let skew = m3 / m2.powf(1.5);
    let kurtosis = m4 / (m2 * m2);
    let jarque_bera = n / 6.0 * (skew * skew + (kurtosis - 3.0).powi(2) / 4.0);

    let chi2 = ChiSquared::new(2.0)
        .map_err(|e| AppError::new(4, format!("Chi-squared distribution error: {e}")))?;
    let jb_p_value = 1.0 - chi2.cdf(jarque_bera);

    Ok((durbin_watson, skew, kurtosis, jarque_bera, jb_p_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn recovers_known_linear_relationship() {
        // y = 2x + 3 + small deterministic noise.
        let x_col: Vec<f64> = (0..80).map(|i| i as f64 * 0.25).collect();
        let noise: Vec<f64> = (0..80).map(|i| ((i * 37) % 11) as f64 / 20.0 - 0.25).collect();
        let y: Vec<f64> = x_col
            .iter()
            .zip(noise.iter())
            .map(|(x, e)| 2.0 * x + 3.0 + e)
            .collect();

        let design = add_constant(&design_from_columns(&[x_col]).unwrap());
        let fit = fit("y", &names(&["x", CONST_NAME]), &design, &y).unwrap();

        assert!((fit.coefficients[0].estimate - 2.0).abs() < 0.05);
        assert!((fit.coefficients[1].estimate - 3.0).abs() < 0.3);
        assert!(fit.diagnostics.r_squared > 0.99);
        // The slope is overwhelmingly significant on this sample.
        assert!(fit.coefficients[0].p_value < 1e-10);
        let c = &fit.coefficients[0];
        assert!(c.conf_low < c.estimate && c.estimate < c.conf_high);
    }

    #[test]
    fn intercept_is_appended_last() {
        let x_col: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x_col.iter().map(|x| 1.5 * x + 0.75).collect();

        let design = add_constant(&design_from_columns(&[x_col]).unwrap());
        let fit = fit("y", &names(&["x", CONST_NAME]), &design, &y).unwrap();

        assert_eq!(fit.coefficients.last().unwrap().name, CONST_NAME);
        assert!((fit.coefficients.last().unwrap().estimate - 0.75).abs() < 1e-8);
    }

    #[test]
    fn duplicate_columns_report_rank_deficiency() {
        let col: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = col.iter().map(|x| x + 1.0).collect();

        let design = design_from_columns(&[col.clone(), col]).unwrap();
        let err = fit("y", &names(&["a", "b"]), &design, &y).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn shape_mismatch_is_fatal() {
        let design = add_constant(&design_from_columns(&[vec![1.0, 2.0, 3.0]]).unwrap());
        let err = fit("y", &names(&["x", CONST_NAME]), &design, &[1.0, 2.0]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn constant_endog_is_a_descriptive_error() {
        let x_col: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let y = vec![5.0; 25];

        let design = add_constant(&design_from_columns(&[x_col]).unwrap());
        let err = fit("y", &names(&["x", CONST_NAME]), &design, &y).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("constant"));
    }

    #[test]
    fn durbin_watson_detects_negative_serial_correlation() {
        // Alternating noise has strong negative serial correlation: DW -> 4.
        let x_col: Vec<f64> = (0..60).map(|i| i as f64).collect();
        let y: Vec<f64> = x_col
            .iter()
            .enumerate()
            .map(|(i, x)| x + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();

        let design = add_constant(&design_from_columns(&[x_col]).unwrap());
        let fit = fit("y", &names(&["x", CONST_NAME]), &design, &y).unwrap();
        assert!(fit.diagnostics.durbin_watson > 3.0);
    }
}
