//! Write the analysis output to JSON.
//!
//! The export is the "portable" representation of a run: the cointegration
//! triple and the regression fit, suitable for downstream scripts that don't
//! want to parse the terminal report.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::app::pipeline::RunOutput;
use crate::domain::{CointResult, OlsFit};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
pub struct ExportFile {
    pub tool: String,
    pub pair: [String; 2],
    pub cointegration: CointResult,
    pub regression: OlsFit,
}

/// Write a results JSON file.
pub fn write_results_json(path: &Path, output: &RunOutput) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create results JSON '{}': {e}", path.display()),
        )
    })?;

    let export = ExportFile {
        tool: "coint".to_string(),
        pair: [output.stock1.name.clone(), output.stock2.name.clone()],
        cointegration: output.coint.clone(),
        regression: output.ols.clone(),
    };

    serde_json::to_writer_pretty(file, &export)
        .map_err(|e| AppError::new(2, format!("Failed to write results JSON: {e}")))?;

    Ok(())
}
