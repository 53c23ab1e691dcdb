//! CSV ingest for price series and the spread dataset.
//!
//! Design goals:
//! - **Strict schema**: clear errors + exit code 2 for structural problems
//! - **Fail-fast rows**: a malformed cell aborts the load with its line number;
//!   there is no skip-and-continue, because a silently shortened series would
//!   corrupt the row alignment the tests depend on
//! - **Separation of concerns**: no statistics here
//!
//! Layout conventions:
//! - price file: optional leading `date` column, then exactly one value column
//! - spread file: optional leading `date` column, then the endogenous column,
//!   then one or more exogenous columns

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{PriceSeries, SpreadTable};
use crate::error::AppError;

/// Load a single-instrument price series.
pub fn load_price_series(path: &Path) -> Result<PriceSeries, AppError> {
    let (headers, records) = read_records(path)?;
    let layout = resolve_layout(&headers, path)?;

    if layout.value_columns.len() != 1 {
        return Err(AppError::new(
            2,
            format!(
                "Expected a single value column in '{}', found {}: [{}].",
                path.display(),
                layout.value_columns.len(),
                layout.join_names(&headers),
            ),
        ));
    }
    let value_idx = layout.value_columns[0];
    let name = normalize_header_name(&headers[value_idx]);

    let mut dates = layout.date_column.map(|_| Vec::with_capacity(records.len()));
    let mut values = Vec::with_capacity(records.len());

    for (line, record) in records {
        if let (Some(date_idx), Some(dates)) = (layout.date_column, dates.as_mut()) {
            dates.push(parse_date(get_cell(&record, date_idx, "date", path, line)?, path, line)?);
        }
        values.push(parse_f64(
            get_cell(&record, value_idx, &name, path, line)?,
            &name,
            path,
            line,
        )?);
    }

    if values.is_empty() {
        return Err(AppError::new(
            3,
            format!("No observations in '{}'.", path.display()),
        ));
    }

    Ok(PriceSeries { name, dates, values })
}

/// Load the spread dataset: endogenous column first, exogenous columns after.
pub fn load_spread_table(path: &Path) -> Result<SpreadTable, AppError> {
    let (headers, records) = read_records(path)?;
    let layout = resolve_layout(&headers, path)?;

    if layout.value_columns.len() < 2 {
        return Err(AppError::new(
            2,
            format!(
                "Spread dataset '{}' needs an endogenous column plus at least one \
                 exogenous column, found {}: [{}].",
                path.display(),
                layout.value_columns.len(),
                layout.join_names(&headers),
            ),
        ));
    }

    let endog_idx = layout.value_columns[0];
    let endog_name = normalize_header_name(&headers[endog_idx]);
    let exog_idx = &layout.value_columns[1..];
    let exog_names: Vec<String> = exog_idx
        .iter()
        .map(|&i| normalize_header_name(&headers[i]))
        .collect();

    let mut endog = Vec::with_capacity(records.len());
    let mut exog: Vec<Vec<f64>> = vec![Vec::with_capacity(records.len()); exog_idx.len()];

    for (line, record) in records {
        endog.push(parse_f64(
            get_cell(&record, endog_idx, &endog_name, path, line)?,
            &endog_name,
            path,
            line,
        )?);
        for ((col, &idx), name) in exog.iter_mut().zip(exog_idx.iter()).zip(exog_names.iter()) {
            col.push(parse_f64(
                get_cell(&record, idx, name, path, line)?,
                name,
                path,
                line,
            )?);
        }
    }

    if endog.is_empty() {
        return Err(AppError::new(
            3,
            format!("No observations in '{}'.", path.display()),
        ));
    }

    Ok(SpreadTable {
        endog_name,
        endog,
        exog_names,
        exog,
    })
}

/// Explicit precondition check for the pair: equal length, and when both files
/// carry dates, row-by-row agreement (no silent positional join).
pub fn validate_alignment(a: &PriceSeries, b: &PriceSeries) -> Result<(), AppError> {
    if a.len() != b.len() {
        return Err(AppError::new(
            3,
            format!(
                "Price series are not aligned: `{}` has {} observations, `{}` has {}.",
                a.name,
                a.len(),
                b.name,
                b.len()
            ),
        ));
    }

    if let (Some(dates_a), Some(dates_b)) = (&a.dates, &b.dates) {
        for (row, (da, db)) in dates_a.iter().zip(dates_b.iter()).enumerate() {
            if da != db {
                return Err(AppError::new(
                    3,
                    format!(
                        "Price series dates diverge at row {}: {da} vs {db}.",
                        row + 1
                    ),
                ));
            }
        }
    }

    Ok(())
}

/// Resolved column layout of an input file.
struct Layout {
    date_column: Option<usize>,
    value_columns: Vec<usize>,
}

impl Layout {
    fn join_names(&self, headers: &StringRecord) -> String {
        self.value_columns
            .iter()
            .map(|&i| normalize_header_name(&headers[i]))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn resolve_layout(headers: &StringRecord, path: &Path) -> Result<Layout, AppError> {
    let mut date_column = None;
    let mut value_columns = Vec::new();

    for (idx, raw) in headers.iter().enumerate() {
        let name = normalize_header_name(raw);
        if name == "date" {
            if date_column.is_some() {
                return Err(AppError::new(
                    2,
                    format!("Duplicate `date` column in '{}'.", path.display()),
                ));
            }
            date_column = Some(idx);
        } else if name.is_empty() {
            return Err(AppError::new(
                2,
                format!("Empty column header (index {idx}) in '{}'.", path.display()),
            ));
        } else {
            value_columns.push(idx);
        }
    }

    if value_columns.is_empty() {
        return Err(AppError::new(
            2,
            format!("No value columns in '{}'.", path.display()),
        ));
    }

    Ok(Layout {
        date_column,
        value_columns,
    })
}

fn read_records(path: &Path) -> Result<(StringRecord, Vec<(usize, StringRecord)>), AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers in '{}': {e}", path.display())))?
        .clone();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header row, and CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| {
            AppError::new(
                2,
                format!("CSV parse error in '{}' line {line}: {e}", path.display()),
            )
        })?;
        records.push((line, record));
    }

    Ok((headers, records))
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿date"). If we don't strip it, schema resolution
    // will misclassify the column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_cell<'a>(
    record: &'a StringRecord,
    idx: usize,
    name: &str,
    path: &Path,
    line: usize,
) -> Result<&'a str, AppError> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            AppError::new(
                2,
                format!(
                    "Missing `{name}` value in '{}' line {line}.",
                    path.display()
                ),
            )
        })
}

fn parse_f64(s: &str, name: &str, path: &Path, line: usize) -> Result<f64, AppError> {
    let v: f64 = s.parse().map_err(|_| {
        AppError::new(
            2,
            format!(
                "Invalid numeric `{name}` value '{s}' in '{}' line {line}.",
                path.display()
            ),
        )
    })?;
    if !v.is_finite() {
        return Err(AppError::new(
            2,
            format!(
                "Non-finite `{name}` value '{s}' in '{}' line {line}.",
                path.display()
            ),
        ));
    }
    Ok(v)
}

fn parse_date(s: &str, path: &Path, line: usize) -> Result<NaiveDate, AppError> {
    // ISO dates are recommended, but broker exports often use D/M/Y variants.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(AppError::new(
        2,
        format!(
            "Invalid date '{s}' in '{}' line {line}. Expected one of: \
             YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD.",
            path.display()
        ),
    ))
}
