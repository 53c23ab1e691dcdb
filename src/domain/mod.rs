//! Domain model for the pair analyzer.

mod types;

pub use types::*;
