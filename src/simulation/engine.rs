// src/simulation/engine.rs

use crate::error::{EngineError, EngineResult};
use crate::model::results::{MonteCarloResult, Percentiles};
use crate::model::series::DemandSeries;
use crate::simulation::config::SafetyStockConfig;
use crate::simulation::sampler::BoxMullerNormal;
use crate::stats;
use crate::strategy::optimization::SafetyStockCalculator;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

pub const DEFAULT_RUN_COUNT: usize = 10_000;

/// Runs per rayon task in [`MonteCarloSimulator::simulate_parallel`].
pub const PARALLEL_BATCH_SIZE: usize = 1_024;

/// Everything a single trial needs, fixed for the whole simulation.
#[derive(Debug, Clone, Copy)]
struct Scenario {
    daily_demand: BoxMullerNormal,
    lead_time_days: usize,
    reorder_point: f64,
}

impl Scenario {
    /// Total demand over one simulated lead time.
    fn trial<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        (0..self.lead_time_days)
            .map(|_| self.daily_demand.sample_demand(rng))
            .sum()
    }
}

/// Empirical stockout estimate by repeated sampling of lead-time demand.
///
/// Each run draws one normally distributed demand per lead-time day (mean
/// and population std dev of the history), floors it at zero and sums the
/// days. A run stocks out when that total exceeds the calculator's safety
/// stock plus average demand over the same rounded number of days.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonteCarloSimulator {
    calculator: SafetyStockCalculator,
}

impl MonteCarloSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates with the thread-local random source.
    pub fn simulate(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
        runs: usize,
    ) -> EngineResult<MonteCarloResult> {
        self.simulate_with_rng(config, series, runs, &mut rand::thread_rng())
    }

    /// Simulates with a caller supplied random source.
    ///
    /// # Arguments
    /// * `config` - Policy parameters; lead time is rounded to whole days.
    /// * `series` - Demand history the daily distribution is fitted to.
    /// * `runs` - Number of independent lead-time trials, at least 1.
    /// * `rng` - Source of uniform draws; seed it for reproducible output.
    pub fn simulate_with_rng<R: Rng + ?Sized>(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
        runs: usize,
        rng: &mut R,
    ) -> EngineResult<MonteCarloResult> {
        let scenario = self.scenario(config, series, runs)?;
        let totals: Vec<f64> = (0..runs).map(|_| scenario.trial(rng)).collect();
        summarize(totals, scenario.reorder_point)
    }

    /// Simulates across the rayon pool in fixed-size batches.
    ///
    /// Batch `i` draws from `StdRng::seed_from_u64(seed + i)`, so the result
    /// depends only on `seed` and not on thread scheduling.
    pub fn simulate_parallel(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
        runs: usize,
        seed: u64,
    ) -> EngineResult<MonteCarloResult> {
        let scenario = self.scenario(config, series, runs)?;
        let batches = runs.div_ceil(PARALLEL_BATCH_SIZE);

        let totals: Vec<f64> = (0..batches)
            .into_par_iter()
            .flat_map_iter(|batch| {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(batch as u64));
                let start = batch * PARALLEL_BATCH_SIZE;
                let len = PARALLEL_BATCH_SIZE.min(runs - start);
                (0..len).map(move |_| scenario.trial(&mut rng))
            })
            .collect();

        summarize(totals, scenario.reorder_point)
    }

    fn scenario(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
        runs: usize,
    ) -> EngineResult<Scenario> {
        if runs == 0 {
            return Err(EngineError::InvalidRunCount);
        }

        let baseline = self.calculator.calculate(config, series)?;
        let demands = series.demands();
        let avg_demand = stats::mean(&demands)?;
        let demand_std_dev = stats::std_dev(&demands)?;

        // Threshold covers the same whole days each trial sums.
        let lead_time_days = config.lead_time_days();
        let scenario = Scenario {
            daily_demand: BoxMullerNormal::new(avg_demand, demand_std_dev),
            lead_time_days,
            reorder_point: baseline.safety_stock + avg_demand * lead_time_days as f64,
        };
        debug!(
            "simulating {} runs of {} days against reorder point {:.2}",
            runs, scenario.lead_time_days, scenario.reorder_point
        );
        Ok(scenario)
    }
}

fn summarize(mut totals: Vec<f64>, reorder_point: f64) -> EngineResult<MonteCarloResult> {
    totals.sort_by(f64::total_cmp);

    let stockout_count = totals.iter().filter(|&&t| t > reorder_point).count();
    let stockout_probability = stockout_count as f64 / totals.len() as f64 * 100.0;
    let mean_demand = stats::mean(&totals)?;

    let percentiles = Percentiles {
        p50: stats::percentile(&totals, 50.0)?,
        p75: stats::percentile(&totals, 75.0)?,
        p90: stats::percentile(&totals, 90.0)?,
        p95: stats::percentile(&totals, 95.0)?,
        p99: stats::percentile(&totals, 99.0)?,
    };

    info!(
        "Monte Carlo: {} of {} runs stocked out ({:.2}%)",
        stockout_count,
        totals.len(),
        stockout_probability
    );

    Ok(MonteCarloResult {
        simulations: totals,
        stockout_count,
        stockout_probability,
        mean_demand,
        percentiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn history() -> DemandSeries {
        DemandSeries::from_daily(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            &[120.0, 135.0, 128.0, 142.0, 115.0, 130.0, 125.0],
        )
        .unwrap()
    }

    #[test]
    fn result_shape_and_bounds() {
        let sim = MonteCarloSimulator::new();
        let mut rng = StdRng::seed_from_u64(11);
        let runs = 2_000;
        let result = sim
            .simulate_with_rng(&SafetyStockConfig::default(), &history(), runs, &mut rng)
            .unwrap();

        assert_eq!(result.simulations.len(), runs);
        assert!(result.stockout_count <= runs);
        assert!(result.simulations.windows(2).all(|w| w[0] <= w[1]));
        assert!(result.percentiles.is_monotonic());
        assert_eq!(
            result.stockout_probability,
            result.stockout_count as f64 / runs as f64 * 100.0
        );
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let sim = MonteCarloSimulator::new();
        let config = SafetyStockConfig::default();
        let a = sim
            .simulate_with_rng(&config, &history(), 500, &mut StdRng::seed_from_u64(99))
            .unwrap();
        let b = sim
            .simulate_with_rng(&config, &history(), 500, &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parallel_runs_depend_only_on_seed() {
        let sim = MonteCarloSimulator::new();
        let config = SafetyStockConfig::default();
        let runs = 3 * PARALLEL_BATCH_SIZE + 17;
        let a = sim.simulate_parallel(&config, &history(), runs, 5).unwrap();
        let b = sim.simulate_parallel(&config, &history(), runs, 5).unwrap();
        assert_eq!(a.simulations.len(), runs);
        assert_eq!(a, b);
    }

    #[test]
    fn mean_tracks_expected_lead_time_demand() {
        let sim = MonteCarloSimulator::new();
        let result = sim
            .simulate_with_rng(
                &SafetyStockConfig::default(),
                &history(),
                20_000,
                &mut StdRng::seed_from_u64(2024),
            )
            .unwrap();
        // 7 days at ~127.86 per day.
        assert!((result.mean_demand - 895.0).abs() < 5.0, "{}", result.mean_demand);
    }

    #[test]
    fn constant_demand_never_stocks_out() {
        let flat =
            DemandSeries::from_daily(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), &[40.0; 7])
                .unwrap();
        let config = SafetyStockConfig {
            lead_time_std_dev: 0.0,
            ..Default::default()
        };
        let result = MonteCarloSimulator::new()
            .simulate_with_rng(&config, &flat, 100, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(result.stockout_count, 0);
        assert!(result.simulations.iter().all(|&t| t == 280.0));
        assert_eq!(result.percentiles.p99, 280.0);
    }

    #[test]
    fn fractional_lead_time_is_rounded_on_both_sides_of_the_comparison() {
        let flat =
            DemandSeries::from_daily(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), &[40.0; 7])
                .unwrap();
        for (lead_time, days) in [(7.5, 8.0), (0.4, 1.0)] {
            let config = SafetyStockConfig {
                lead_time,
                lead_time_std_dev: 0.0,
                ..Default::default()
            };
            let result = MonteCarloSimulator::new()
                .simulate_with_rng(&config, &flat, 1_000, &mut StdRng::seed_from_u64(3))
                .unwrap();
            assert_eq!(result.stockout_count, 0, "lead time {}", lead_time);
            assert!(result.simulations.iter().all(|&t| t == 40.0 * days));
        }
    }

    #[test]
    fn zero_runs_is_an_input_error() {
        let err = MonteCarloSimulator::new()
            .simulate(&SafetyStockConfig::default(), &history(), 0)
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidRunCount);
    }
}
