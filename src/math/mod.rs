//! Numerical helpers shared by the statistical routines.

mod ols;

pub use ols::{condition_number, solve_least_squares};
