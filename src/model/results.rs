// src/model/results.rs

//! Result shapes produced by the engine.
//!
//! These are also the wire shapes of the remote optimization service, hence
//! the camelCase serde names.

use crate::model::series::{DemandObservation, DemandSeries};
use serde::{Deserialize, Serialize};

/// Output of the closed-form safety stock calculation.
///
/// Unit and currency figures are rounded to whole numbers, demand
/// statistics and percentages to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyStockResult {
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub average_demand: f64,
    pub demand_std_dev: f64,
    /// Percent, `(1 - service level) * 100`.
    pub stockout_probability: f64,
    pub expected_annual_holding_cost: f64,
    pub expected_annual_stockout_cost: f64,
    pub total_cost: f64,
    /// Percent, as requested by the caller.
    pub service_level: f64,
    /// Set when the service level fell outside the z-score table and was clamped.
    #[serde(default)]
    pub service_level_clamped: bool,
}

/// Selected percentiles of simulated lead-time demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Percentiles {
    pub fn is_monotonic(&self) -> bool {
        self.p50 <= self.p75 && self.p75 <= self.p90 && self.p90 <= self.p95 && self.p95 <= self.p99
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloResult {
    /// Lead-time demand totals, one per run, sorted ascending.
    pub simulations: Vec<f64>,
    pub stockout_count: usize,
    /// Percent of runs where lead-time demand exceeded the reorder point.
    pub stockout_probability: f64,
    pub mean_demand: f64,
    pub percentiles: Percentiles,
}

/// Lower and upper bounds, index-aligned with the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub historical: DemandSeries,
    pub forecast: Vec<DemandObservation>,
    pub demand_mean: f64,
    pub demand_std_dev: f64,
    pub confidence: ConfidenceBand,
}
