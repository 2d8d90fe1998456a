// src/strategy/sweep.rs

use crate::error::{EngineError, EngineResult};
use crate::model::series::DemandSeries;
use crate::simulation::config::SafetyStockConfig;
use crate::strategy::optimization::SafetyStockCalculator;
use crate::stats::round_to;
use log::debug;
use serde::{Deserialize, Serialize};

/// Cost projection at one service level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepPoint {
    pub service_level: f64,
    pub safety_stock: f64,
    pub holding_cost: f64,
    pub stockout_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSweep {
    pub points: Vec<SweepPoint>,
    /// Cheapest point; the first one in grid order on ties.
    pub optimal: SweepPoint,
}

impl CostSweep {
    /// Grid point matching `service_level`, if it was swept.
    pub fn point_at(&self, service_level: f64) -> Option<&SweepPoint> {
        self.points
            .iter()
            .find(|p| (p.service_level - service_level).abs() < 1e-9)
    }
}

/// Service levels 0.900, 0.905, ..., 0.995.
pub fn default_grid() -> Vec<f64> {
    (0..=19).map(|i| round_to(0.90 + i as f64 * 0.005, 3)).collect()
}

/// Sweeps the service level while every other config field stays fixed.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostSweepEngine {
    calculator: SafetyStockCalculator,
}

impl CostSweepEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the calculator once per grid point.
    ///
    /// # Arguments
    /// * `base` - Config whose service level is replaced at each point.
    /// * `series` - Demand history, shared by every point.
    /// * `grid` - Service levels in the order they should be evaluated.
    pub fn sweep(
        &self,
        base: &SafetyStockConfig,
        series: &DemandSeries,
        grid: &[f64],
    ) -> EngineResult<CostSweep> {
        let points = grid
            .iter()
            .map(|&service_level| -> EngineResult<SweepPoint> {
                let config = base.with_service_level(service_level);
                let result = self.calculator.calculate(&config, series)?;
                Ok(SweepPoint {
                    service_level,
                    safety_stock: result.safety_stock,
                    holding_cost: result.expected_annual_holding_cost,
                    stockout_cost: result.expected_annual_stockout_cost,
                    total_cost: result.total_cost,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        // Strict `<` keeps the earliest point on ties.
        let optimal = points
            .iter()
            .copied()
            .reduce(|best, p| if p.total_cost < best.total_cost { p } else { best })
            .ok_or(EngineError::EmptyGrid)?;

        debug!(
            "cost sweep over {} points: optimum at {} (total {})",
            points.len(),
            optimal.service_level,
            optimal.total_cost
        );

        Ok(CostSweep { points, optimal })
    }

    pub fn sweep_default(
        &self,
        base: &SafetyStockConfig,
        series: &DemandSeries,
    ) -> EngineResult<CostSweep> {
        self.sweep(base, series, &default_grid())
    }

    /// Total cost at `current_service_level` minus the optimum's total cost.
    ///
    /// Positive means the current setting costs more than the optimum.
    pub fn cost_delta(
        &self,
        sweep: &CostSweep,
        base: &SafetyStockConfig,
        series: &DemandSeries,
        current_service_level: f64,
    ) -> EngineResult<f64> {
        let current = match sweep.point_at(current_service_level) {
            Some(point) => point.total_cost,
            None => {
                self.calculator
                    .calculate(&base.with_service_level(current_service_level), series)?
                    .total_cost
            }
        };
        Ok(current - sweep.optimal.total_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn history() -> DemandSeries {
        DemandSeries::from_daily(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            &[120.0, 135.0, 128.0, 142.0, 115.0, 130.0, 125.0],
        )
        .unwrap()
    }

    #[test]
    fn default_grid_spans_the_table() {
        let grid = default_grid();
        assert_eq!(grid.len(), 20);
        assert_eq!(grid[0], 0.9);
        assert_eq!(grid[1], 0.905);
        assert_eq!(*grid.last().unwrap(), 0.995);
    }

    #[test]
    fn optimum_is_no_worse_than_any_point() {
        let sweep = CostSweepEngine::new()
            .sweep_default(&SafetyStockConfig::default(), &history())
            .unwrap();
        assert_eq!(sweep.points.len(), 20);
        for p in &sweep.points {
            assert!(sweep.optimal.total_cost <= p.total_cost);
        }
    }

    #[test]
    fn expensive_holding_pushes_optimum_down() {
        let base = SafetyStockConfig {
            holding_cost_per_unit: 500.0,
            stockout_cost_per_unit: 0.5,
            ..Default::default()
        };
        let sweep = CostSweepEngine::new().sweep_default(&base, &history()).unwrap();
        assert_eq!(sweep.optimal.service_level, 0.9);
    }

    #[test]
    fn ties_resolve_to_first_grid_point() {
        // No cost at all: every point totals zero.
        let base = SafetyStockConfig {
            holding_cost_per_unit: 0.0,
            stockout_cost_per_unit: 0.0,
            ..Default::default()
        };
        let sweep = CostSweepEngine::new()
            .sweep(&base, &history(), &[0.97, 0.95, 0.99])
            .unwrap();
        assert_eq!(sweep.optimal.service_level, 0.97);
    }

    #[test]
    fn delta_is_zero_at_optimum_and_positive_elsewhere() {
        let engine = CostSweepEngine::new();
        let base = SafetyStockConfig::default();
        let sweep = engine.sweep_default(&base, &history()).unwrap();

        let at_optimum = engine
            .cost_delta(&sweep, &base, &history(), sweep.optimal.service_level)
            .unwrap();
        assert_eq!(at_optimum, 0.0);

        for p in &sweep.points {
            let delta = engine.cost_delta(&sweep, &base, &history(), p.service_level).unwrap();
            assert!(delta >= 0.0);
        }

        // Off-grid levels are computed on demand.
        let off_grid = engine.cost_delta(&sweep, &base, &history(), 0.9525).unwrap();
        assert!(off_grid >= 0.0);
    }

    #[test]
    fn empty_grid_is_rejected() {
        let err = CostSweepEngine::new()
            .sweep(&SafetyStockConfig::default(), &history(), &[])
            .unwrap_err();
        assert_eq!(err, EngineError::EmptyGrid);
    }
}
