//! Synthetic cointegrated-pair generation.
//!
//! The generator produces the three fixture files the analyzer consumes:
//! two price series plus the spread dataset. By default the pair shares a
//! stochastic trend — series 1 tracks `alpha + beta * series2` through a
//! stationary AR(1) disturbance — so the cointegration test has a known
//! positive case, and the spread regression has known true coefficients.
//! `independent: true` breaks the link for a known negative case.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{PriceSeries, SpreadTable};
use crate::error::AppError;

/// Mean-reversion speed of the disturbance tying the pair together.
const DISTURBANCE_PHI: f64 = 0.3;

/// Daily volatility of the shared random-walk leg.
const WALK_SIGMA: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub count: usize,
    pub seed: u64,
    /// True slope linking series 1 to series 2.
    pub hedge_ratio: f64,
    /// True intercept of the link.
    pub intercept: f64,
    /// Generate an unrelated pair instead of a cointegrated one.
    pub independent: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratedSample {
    pub stock1: PriceSeries,
    pub stock2: PriceSeries,
    pub spread: SpreadTable,
    pub spec: SampleSpec,
}

pub fn generate_pair(spec: &SampleSpec) -> Result<GeneratedSample, AppError> {
    if spec.count < 30 {
        return Err(AppError::new(
            2,
            format!("Sample count must be at least 30, got {}.", spec.count),
        ));
    }
    if !(spec.hedge_ratio.is_finite() && spec.intercept.is_finite()) {
        return Err(AppError::new(2, "Invalid hedge ratio / intercept settings."));
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let start = NaiveDate::from_ymd_opt(2024, 1, 2)
        .ok_or_else(|| AppError::new(4, "Invalid sample start date."))?;
    let dates: Vec<NaiveDate> = (0..spec.count)
        .map(|i| start + Duration::days(i as i64))
        .collect();

    // Leg 2 is a plain random walk around a reference price level.
    let mut level = 100.0;
    let stock2_values: Vec<f64> = (0..spec.count)
        .map(|_| {
            level += WALK_SIGMA * normal.sample(&mut rng);
            level
        })
        .collect();

    let stock1_values: Vec<f64> = if spec.independent {
        // A second, unrelated walk with its own drift.
        let mut level = 80.0;
        (0..spec.count)
            .map(|_| {
                level += 0.2 + WALK_SIGMA * normal.sample(&mut rng);
                level
            })
            .collect()
    } else {
        let mut u = 0.0;
        stock2_values
            .iter()
            .map(|&x| {
                u = DISTURBANCE_PHI * u + normal.sample(&mut rng);
                spec.intercept + spec.hedge_ratio * x + u
            })
            .collect()
    };

    let stock1 = PriceSeries {
        name: "stock_1".to_string(),
        dates: Some(dates.clone()),
        values: stock1_values,
    };
    let stock2 = PriceSeries {
        name: "stock_2".to_string(),
        dates: Some(dates),
        values: stock2_values,
    };

    // The spread dataset carries the same observations in regression layout:
    // the endogenous leg first, the exogenous leg after.
    let spread = SpreadTable {
        endog_name: stock1.name.clone(),
        endog: stock1.values.clone(),
        exog_names: vec![stock2.name.clone()],
        exog: vec![stock2.values.clone()],
    };

    Ok(GeneratedSample {
        stock1,
        stock2,
        spread,
        spec: spec.clone(),
    })
}

/// File names the analyzer looks for by default.
pub const STOCK1_FILE: &str = "stock_price_1.csv";
pub const STOCK2_FILE: &str = "stock_price_2.csv";
pub const SPREAD_FILE: &str = "spread_of_stock_prices.csv";

/// Write the three fixture CSVs into `dir`; returns the paths written.
pub fn write_sample_files(dir: &Path, sample: &GeneratedSample) -> Result<[PathBuf; 3], AppError> {
    let stock1_path = dir.join(STOCK1_FILE);
    let stock2_path = dir.join(STOCK2_FILE);
    let spread_path = dir.join(SPREAD_FILE);

    write_price_csv(&stock1_path, &sample.stock1)?;
    write_price_csv(&stock2_path, &sample.stock2)?;
    write_spread_csv(&spread_path, sample)?;

    Ok([stock1_path, stock2_path, spread_path])
}

fn write_price_csv(path: &Path, series: &PriceSeries) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;

    let write_err =
        |e: csv::Error| AppError::new(2, format!("Failed to write '{}': {e}", path.display()));

    writer
        .write_record(["date", series.name.as_str()])
        .map_err(write_err)?;
    let dates = series
        .dates
        .as_ref()
        .ok_or_else(|| AppError::new(4, "Generated series is missing dates."))?;
    for (date, value) in dates.iter().zip(series.values.iter()) {
        writer
            .write_record([date.to_string(), format!("{value:.6}")])
            .map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush '{}': {e}", path.display())))
}

fn write_spread_csv(path: &Path, sample: &GeneratedSample) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;

    let write_err =
        |e: csv::Error| AppError::new(2, format!("Failed to write '{}': {e}", path.display()));

    let spread = &sample.spread;
    let mut header = vec![spread.endog_name.clone()];
    header.extend(spread.exog_names.iter().cloned());
    writer.write_record(&header).map_err(write_err)?;

    for i in 0..spread.n_obs() {
        let mut row = vec![format!("{:.6}", spread.endog[i])];
        for col in &spread.exog {
            row.push(format!("{:.6}", col[i]));
        }
        writer.write_record(&row).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(seed: u64, independent: bool) -> SampleSpec {
        SampleSpec {
            count: 200,
            seed,
            hedge_ratio: 0.8,
            intercept: 5.0,
            independent,
        }
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let a = generate_pair(&spec(42, false)).unwrap();
        let b = generate_pair(&spec(42, false)).unwrap();
        assert_eq!(a.stock1.values, b.stock1.values);
        assert_eq!(a.stock2.values, b.stock2.values);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_pair(&spec(1, false)).unwrap();
        let b = generate_pair(&spec(2, false)).unwrap();
        assert_ne!(a.stock1.values, b.stock1.values);
    }

    #[test]
    fn cointegrated_sample_tracks_the_true_relationship() {
        let sample = generate_pair(&spec(42, false)).unwrap();
        // The disturbance is stationary with modest variance, so the spread
        // around the true line stays bounded.
        let max_dev = sample
            .stock1
            .values
            .iter()
            .zip(sample.stock2.values.iter())
            .map(|(&y, &x)| (y - (5.0 + 0.8 * x)).abs())
            .fold(0.0, f64::max);
        assert!(max_dev < 6.0, "max deviation {max_dev}");
    }

    #[test]
    fn tiny_sample_count_is_rejected() {
        let err = generate_pair(&SampleSpec {
            count: 10,
            seed: 1,
            hedge_ratio: 1.0,
            intercept: 0.0,
            independent: false,
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn written_files_round_trip_through_ingest() {
        let dir = std::env::temp_dir().join(format!("pair-coint-sample-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let sample = generate_pair(&spec(7, false)).unwrap();
        let [p1, p2, ps] = write_sample_files(&dir, &sample).unwrap();

        let s1 = crate::io::ingest::load_price_series(&p1).unwrap();
        let s2 = crate::io::ingest::load_price_series(&p2).unwrap();
        let table = crate::io::ingest::load_spread_table(&ps).unwrap();

        assert_eq!(s1.len(), 200);
        crate::io::ingest::validate_alignment(&s1, &s2).unwrap();
        assert_eq!(table.endog_name, "stock_1");
        assert_eq!(table.n_exog(), 1);
        // Values survive the 6-decimal round trip.
        assert!((s1.values[0] - sample.stock1.values[0]).abs() < 1e-5);

        std::fs::remove_dir_all(&dir).ok();
    }
}
