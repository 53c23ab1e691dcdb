//! Formatted terminal output.

mod format;

pub use format::{format_coint_report, format_ols_summary};
