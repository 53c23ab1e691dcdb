//! Synthetic data generation.

mod sample;

pub use sample::{
    GeneratedSample, SPREAD_FILE, STOCK1_FILE, STOCK2_FILE, SampleSpec, generate_pair,
    write_sample_files,
};
