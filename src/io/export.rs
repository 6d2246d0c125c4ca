//! Export simulation results to CSV and JSON.
//!
//! The CSV is meant to be easy to consume in spreadsheets; the JSON keeps the
//! input provenance and rule parameters alongside the series.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{InputProvenance, SeriesCatalog, SimulationConfig, SimulationOutput};
use crate::error::AppError;
use crate::models::TaylorRule;
use crate::plot::monthly_axis;

/// Write one row per month to a CSV file.
pub fn write_results_csv(path: &Path, output: &SimulationOutput, epoch: NaiveDate) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "date,simulated_rate,inflation,output_gap,policy_rate")
        .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    let axis = monthly_axis(epoch, output.len());
    for (i, date) in axis.iter().enumerate() {
        writeln!(
            file,
            "{},{},{},{},{}",
            date,
            fmt_cell(output.rates.values().get(i)),
            fmt_cell(output.inflation.values().get(i)),
            fmt_cell(output.output_gap.values().get(i)),
            fmt_cell(output.policy_rate.values().get(i)),
        )
        .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

fn fmt_cell(value: Option<&f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.6}"),
        _ => String::new(),
    }
}

/// JSON export schema.
#[derive(Debug, Serialize)]
pub struct RunExport<'a> {
    pub tool: &'static str,
    pub rule: TaylorRule,
    pub catalog: &'a SeriesCatalog,
    pub provenance: &'a InputProvenance,
    pub zero_potential_positions: usize,
    pub dates: Vec<NaiveDate>,
    /// Non-finite values are written as `null`.
    pub simulated_rate: Vec<Option<f64>>,
    pub inflation: Vec<Option<f64>>,
    pub output_gap: Vec<Option<f64>>,
    pub policy_rate: Vec<Option<f64>>,
}

impl<'a> RunExport<'a> {
    pub fn new(output: &'a SimulationOutput, config: &'a SimulationConfig) -> Self {
        let finite = |values: &[f64]| -> Vec<Option<f64>> {
            values.iter().map(|v| v.is_finite().then_some(*v)).collect()
        };
        Self {
            tool: "taylor",
            rule: TaylorRule::from_config(config),
            catalog: &config.catalog,
            provenance: &output.provenance,
            zero_potential_positions: output.zero_potential_positions,
            dates: monthly_axis(config.epoch, output.len()),
            simulated_rate: finite(output.rates.values()),
            inflation: finite(output.inflation.values()),
            output_gap: finite(output.output_gap.values()),
            policy_rate: finite(output.policy_rate.values()),
        }
    }
}

/// Write the run (series + provenance) as pretty JSON.
pub fn write_results_json(path: &Path, output: &SimulationOutput, config: &SimulationConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &RunExport::new(output, config))
        .map_err(|e| AppError::usage(format!("Failed to write export JSON: {e}")))?;

    Ok(())
}
