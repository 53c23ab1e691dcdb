//! Terminal report formatting.
//!
//! We keep formatting code in one place so:
//! - the statistics stay clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{CointResult, OlsFit};

/// Format the Engle-Granger block.
pub fn format_coint_report(
    result: &CointResult,
    name1: &str,
    name2: &str,
    significance: f64,
) -> String {
    let mut out = String::new();

    out.push_str("=== Engle-Granger Cointegration Test ===\n");
    out.push_str(&format!("Pair: {name1} / {name2}\n"));
    out.push_str(&format!(
        "Observations: {} (ADF lag={})\n",
        result.nobs, result.used_lag
    ));
    out.push_str(&format!(
        "Long-run fit: {name1} = {:.6} * {name2} + {:.6}\n",
        result.hedge_ratio, result.intercept
    ));
    out.push_str(&format!("ADF statistic: {}\n", fmt_stat(result.statistic)));
    out.push_str(&format!("P-value: {}\n", fmt_p(result.p_value)));
    let crit = &result.critical_values;
    out.push_str(&format!(
        "Critical values: 1%: {:.4}  5%: {:.4}  10%: {:.4}\n",
        crit.one_pct, crit.five_pct, crit.ten_pct
    ));

    let verdict = if result.is_cointegrated(significance) {
        "COINTEGRATED"
    } else {
        "NOT COINTEGRATED"
    };
    out.push_str(&format!(
        "Result: {verdict} at {:.0}% significance\n",
        significance * 100.0
    ));

    out
}

/// Format the regression summary.
pub fn format_ols_summary(fit: &OlsFit) -> String {
    let d = &fit.diagnostics;
    let mut out = String::new();

    out.push_str("=== OLS Regression Results ===\n");
    out.push_str(&kv(
        "Dep. Variable:",
        &fit.dep_name,
        "No. Observations:",
        &d.nobs.to_string(),
    ));
    out.push_str(&kv(
        "R-squared:",
        &format!("{:.4}", d.r_squared),
        "Df Residuals:",
        &d.df_resid.to_string(),
    ));
    out.push_str(&kv(
        "Adj. R-squared:",
        &format!("{:.4}", d.adj_r_squared),
        "Df Model:",
        &d.df_model.to_string(),
    ));
    out.push_str(&kv(
        "F-statistic:",
        &fmt_stat(d.f_statistic),
        "Prob (F-statistic):",
        &fmt_p(d.f_p_value),
    ));
    out.push_str(&kv(
        "Log-Likelihood:",
        &format!("{:.2}", d.log_likelihood),
        "AIC:",
        &format!("{:.2}", d.aic),
    ));
    out.push_str(&kv("", "", "BIC:", &format!("{:.2}", d.bic)));
    out.push('\n');

    out.push_str(&format!(
        "{:<16} {:>12} {:>12} {:>10} {:>8} {:>12} {:>12}\n",
        "variable", "coef", "std err", "t", "P>|t|", "[0.025", "0.975]"
    ));
    out.push_str(&format!("{:-<86}\n", ""));
    for c in &fit.coefficients {
        out.push_str(&format!(
            "{:<16} {:>12.6} {:>12.6} {:>10} {:>8} {:>12.6} {:>12.6}\n",
            truncate(&c.name, 16),
            c.estimate,
            c.std_err,
            fmt_stat(c.t_stat),
            fmt_p(c.p_value),
            c.conf_low,
            c.conf_high,
        ));
    }
    out.push('\n');

    out.push_str(&kv(
        "Durbin-Watson:",
        &format!("{:.3}", d.durbin_watson),
        "Jarque-Bera:",
        &format!("{:.3} (p={})", d.jarque_bera, fmt_p(d.jb_p_value)),
    ));
    out.push_str(&kv(
        "Skew:",
        &format!("{:.3}", d.skew),
        "Kurtosis:",
        &format!("{:.3}", d.kurtosis),
    ));
    out.push_str(&kv(
        "Cond. No.:",
        &format!("{:.3e}", d.condition_number),
        "",
        "",
    ));

    out
}

fn kv(left_label: &str, left_value: &str, right_label: &str, right_value: &str) -> String {
    format!("{left_label:<18}{left_value:>14}    {right_label:<20}{right_value:>14}\n")
        .trim_end()
        .to_string()
        + "\n"
}

fn fmt_stat(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.4}")
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if v == f64::INFINITY {
        "inf".to_string()
    } else {
        "nan".to_string()
    }
}

fn fmt_p(p: f64) -> String {
    if !p.is_finite() {
        return "nan".to_string();
    }
    if p != 0.0 && p < 0.001 {
        format!("{p:.2e}")
    } else {
        format!("{p:.3}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
