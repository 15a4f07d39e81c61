//! Read/write estimate JSON files.
//!
//! An estimate file is the portable record of one answered query: the query,
//! the prediction with its insight, and enough run metadata (data seed and
//! forest configuration) to reproduce it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ForestConfig, PriceQuery, Prediction};
use crate::error::AppError;
use crate::report::{EstimateOutcome, Insight};

pub const TOOL_NAME: &str = "hpe";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub query: PriceQuery,
    pub prediction: Prediction,
    pub insight: Insight,
    pub data_seed: u64,
    pub forest: ForestConfig,
}

impl EstimateFile {
    pub fn outcome(&self) -> EstimateOutcome {
        EstimateOutcome {
            query: self.query.clone(),
            prediction: self.prediction.clone(),
            insight: self.insight.clone(),
        }
    }
}

/// Write an estimate JSON file.
pub fn write_estimate_json(
    path: &Path,
    outcome: &EstimateOutcome,
    data_seed: u64,
    forest: &ForestConfig,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create estimate JSON '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    let doc = EstimateFile {
        tool: TOOL_NAME.to_string(),
        generated_at: Utc::now(),
        query: outcome.query.clone(),
        prediction: outcome.prediction.clone(),
        insight: outcome.insight.clone(),
        data_seed,
        forest: forest.clone(),
    };

    serde_json::to_writer_pretty(&mut out, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write estimate JSON: {e}")))?;
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush estimate JSON '{}': {e}", path.display())))?;
    Ok(())
}

/// Read an estimate JSON file.
pub fn read_estimate_json(path: &Path) -> Result<EstimateFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open estimate JSON '{}': {e}", path.display())))?;
    let doc: EstimateFile = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid estimate JSON: {e}")))?;
    Ok(doc)
}
