//! Statistical routines: OLS with inference, unit-root testing, cointegration.

pub mod adf;
pub mod coint;
pub mod mackinnon;
pub mod ols;
