// src/io/demand.rs

use crate::error::{DataError, EngineError, EngineResult};
use crate::model::series::{DemandObservation, DemandSeries};
use chrono::{Datelike, Days, NaiveDate};
use log::info;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;
use std::f64::consts::PI;
use std::io::Read;
use std::path::Path;

// =========================================================================
// 1. CSV Ingestion
// =========================================================================

#[derive(Debug, Deserialize)]
struct DemandRow {
    date: NaiveDate,
    demand: f64,
}

/// Reads a `date,demand` CSV (ISO dates) into a user input series.
///
/// Rows may come in any order; they are sorted by date. Duplicate dates,
/// negative demand and fewer than seven days are rejected.
pub fn load_demand_csv(path: impl AsRef<Path>) -> Result<DemandSeries, DataError> {
    let path = path.as_ref();
    let reader = csv::Reader::from_path(path)?;
    let series = read_series(reader)?;
    info!("Loaded {} days of demand from {}", series.len(), path.display());
    Ok(series)
}

/// Same as [`load_demand_csv`] over any reader.
pub fn read_demand_csv<R: Read>(source: R) -> Result<DemandSeries, DataError> {
    read_series(csv::Reader::from_reader(source))
}

fn read_series<R: Read>(mut reader: csv::Reader<R>) -> Result<DemandSeries, DataError> {
    let mut observations = Vec::new();
    for row in reader.deserialize() {
        let row: DemandRow = row?;
        observations.push(DemandObservation::new(row.date, row.demand));
    }
    observations.sort_by_key(|o| o.date);
    Ok(DemandSeries::from_input(observations)?)
}

// =========================================================================
// 2. Demo Data
// =========================================================================

/// Shape of a synthetic demand history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoProfile {
    pub days: usize,
    /// Mean daily demand on the first day.
    pub base: f64,
    pub trend_per_day: f64,
    /// Peak deviation of the weekly cycle.
    pub weekly_amplitude: f64,
    pub noise_std_dev: f64,
}

impl Default for DemoProfile {
    fn default() -> Self {
        Self {
            days: 90,
            base: 100.0,
            trend_per_day: 0.2,
            weekly_amplitude: 15.0,
            noise_std_dev: 10.0,
        }
    }
}

/// Generates a plausible daily history ending on `end_date`.
///
/// Demand = base + trend * day + weekly sine cycle + Normal noise, rounded
/// to whole units and clamped at zero (demand cannot be negative).
pub fn generate_demo_series<R: Rng + ?Sized>(
    profile: &DemoProfile,
    end_date: NaiveDate,
    rng: &mut R,
) -> EngineResult<DemandSeries> {
    if profile.days == 0 {
        return Err(EngineError::EmptySeries);
    }
    let noise = Normal::new(0.0, profile.noise_std_dev).map_err(|_| EngineError::InvalidConfig {
        field: "noise_std_dev",
        value: profile.noise_std_dev,
        reason: "must be finite and non-negative",
    })?;
    let start = end_date
        .checked_sub_days(Days::new(profile.days as u64 - 1))
        .ok_or(EngineError::InvalidConfig {
            field: "days",
            value: profile.days as f64,
            reason: "reaches before the earliest representable date",
        })?;

    let observations = start
        .iter_days()
        .take(profile.days)
        .enumerate()
        .map(|(day, date)| {
            let weekday = date.weekday().num_days_from_monday() as f64;
            let seasonal = profile.weekly_amplitude * (2.0 * PI * weekday / 7.0).sin();
            let mean = profile.base + profile.trend_per_day * day as f64 + seasonal;
            let value = (mean + noise.sample(rng)).round();
            DemandObservation::new(date, value.max(0.0))
        })
        .collect();

    DemandSeries::new(observations)
}
