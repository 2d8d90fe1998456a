// src/io/reporting.rs

use crate::error::DataError;
use crate::model::results::{ForecastResult, MonteCarloResult};
use crate::strategy::sweep::CostSweep;
use log::info;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct SimulationRow {
    run: usize,
    lead_time_demand: f64,
}

#[derive(Serialize)]
struct ForecastRow {
    date: String,
    demand: f64,
    lower: f64,
    upper: f64,
}

/// Writes the cost sweep to a CSV file, one row per service level.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/sweep.csv").
/// * `sweep` - Output of the cost sweep engine.
pub fn write_cost_sweep(file_path: impl AsRef<Path>, sweep: &CostSweep) -> Result<(), DataError> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;
    for point in &sweep.points {
        wtr.serialize(point)?;
    }
    wtr.flush()?;

    info!("Exported {} sweep rows to '{}'", sweep.points.len(), path.display());
    Ok(())
}

/// Writes the sorted simulated lead-time demands to a CSV file.
pub fn write_simulations(
    file_path: impl AsRef<Path>,
    result: &MonteCarloResult,
) -> Result<(), DataError> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;
    for (run, &lead_time_demand) in result.simulations.iter().enumerate() {
        wtr.serialize(SimulationRow {
            run,
            lead_time_demand,
        })?;
    }
    wtr.flush()?;

    info!(
        "Exported {} simulated runs to '{}'",
        result.simulations.len(),
        path.display()
    );
    Ok(())
}

/// Writes forecast days with their confidence bounds to a CSV file.
pub fn write_forecast(
    file_path: impl AsRef<Path>,
    result: &ForecastResult,
) -> Result<(), DataError> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;
    let bounds = result.confidence.lower.iter().zip(&result.confidence.upper);
    for (obs, (&lower, &upper)) in result.forecast.iter().zip(bounds) {
        wtr.serialize(ForecastRow {
            date: obs.date.format("%Y-%m-%d").to_string(),
            demand: obs.demand,
            lower,
            upper,
        })?;
    }
    wtr.flush()?;

    info!("Exported {} forecast days to '{}'", result.forecast.len(), path.display());
    Ok(())
}
