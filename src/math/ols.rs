//! Least squares solver.
//!
//! Every regression in this project (the cointegrating regression, the ADF
//! auxiliary regressions, the spread fit) is a small problem of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - We solve via SVD, which stays robust when the design matrix is tall
//!   (many more rows than columns). (Nalgebra's `QR::solve` is intended for
//!   square systems and will panic for non-square matrices.)
//! - Parameter dimensions here are tiny (2-15 columns), so SVD performance is
//!   a non-issue even for long daily histories.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if the strict solve fails. Lagged
    // difference columns in an ADF regression can be nearly collinear for
    // slow-moving series, so we balance numerical stability with acceptance.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Condition number of a design matrix (ratio of extreme singular values).
///
/// Returns `None` for an empty or numerically rank-deficient matrix, which
/// callers treat as perfect collinearity.
pub fn condition_number(x: &DMatrix<f64>) -> Option<f64> {
    let svd = x.clone().svd(false, false);
    let sv = &svd.singular_values;
    if sv.is_empty() {
        return None;
    }

    let mut max_sv = f64::NEG_INFINITY;
    let mut min_sv = f64::INFINITY;
    for &s in sv.iter() {
        max_sv = max_sv.max(s);
        min_sv = min_sv.min(s);
    }

    if !(max_sv.is_finite() && max_sv > 0.0) {
        return None;
    }
    if min_sv <= max_sv * 1e-12 {
        return None;
    }
    Some(max_sv / min_sv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn condition_number_flags_duplicate_columns() {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0]);
        assert!(condition_number(&x).is_none());
    }

    #[test]
    fn condition_number_of_orthogonal_columns_is_modest() {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.0, 0.0, 1.0, -1.0, 0.0, 0.0, -1.0]);
        let cond = condition_number(&x).unwrap();
        assert!((cond - 1.0).abs() < 1e-12);
    }
}
