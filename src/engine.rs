// src/engine.rs

use crate::error::{EngineError, EngineResult, ServiceError};
use crate::forecast::engine::{ForecastEngine, Source, Sourced};
use crate::forecast::remote::{HttpOptimizationService, RemoteConfig};
use crate::model::results::{ForecastResult, MonteCarloResult, SafetyStockResult};
use crate::model::series::DemandSeries;
use crate::simulation::config::SafetyStockConfig;
use crate::simulation::engine::MonteCarloSimulator;
use crate::strategy::optimization::SafetyStockCalculator;
use crate::strategy::sweep::{CostSweep, CostSweepEngine};
use crate::strategy::traits::OptimizationService;
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Everything the presentation layer renders for one (config, series) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub safety_stock: Sourced<SafetyStockResult>,
    pub simulation: Sourced<MonteCarloResult>,
    pub forecast: Sourced<ForecastResult>,
}

impl Analysis {
    /// True when every part came from the remote service.
    pub fn fully_remote(&self) -> bool {
        [
            self.safety_stock.source,
            self.simulation.source,
            self.forecast.source,
        ]
        .iter()
        .all(|&s| s == Source::Remote)
    }
}

/// Entry point for callers.
///
/// Each computation first tries the remote service, when one is configured,
/// and otherwise (or on any failure) runs locally. Input errors are checked
/// up front so they surface the same way on both paths.
#[derive(Debug, Clone, Default)]
pub struct InventoryEngine {
    service: Option<Arc<dyn OptimizationService>>,
    forecaster: ForecastEngine,
    calculator: SafetyStockCalculator,
    simulator: MonteCarloSimulator,
    sweeper: CostSweepEngine,
    seed: Option<u64>,
}

impl InventoryEngine {
    /// Local computation only.
    pub fn local() -> Self {
        Self::default()
    }

    pub fn with_service(service: Arc<dyn OptimizationService>) -> Self {
        Self {
            forecaster: ForecastEngine::with_service(Arc::clone(&service)),
            service: Some(service),
            ..Self::default()
        }
    }

    /// Builds an engine backed by the HTTP service at `remote.base_url`.
    pub fn with_remote(remote: RemoteConfig) -> Result<Self, ServiceError> {
        let service = HttpOptimizationService::new(remote)?;
        Ok(Self::with_service(Arc::new(service)))
    }

    /// Makes local Monte Carlo output reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn service_available(&self) -> bool {
        self.service.as_ref().is_some_and(|s| s.is_available())
    }

    pub fn safety_stock(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
    ) -> EngineResult<Sourced<SafetyStockResult>> {
        config.validate()?;
        if let Some(service) = &self.service {
            match service.safety_stock(config, series) {
                Ok(result) => return Ok(Sourced::remote(result)),
                Err(e) => warn!("remote safety stock failed, computing locally: {}", e),
            }
        }
        Ok(Sourced::local(self.calculator.calculate(config, series)?))
    }

    pub fn simulate(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
        runs: usize,
    ) -> EngineResult<Sourced<MonteCarloResult>> {
        config.validate()?;
        if runs == 0 {
            return Err(EngineError::InvalidRunCount);
        }
        if let Some(service) = &self.service {
            match service.simulate(config, series, runs) {
                Ok(result) => return Ok(Sourced::remote(result)),
                Err(e) => warn!("remote simulation failed, simulating locally: {}", e),
            }
        }
        let seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
        Ok(Sourced::local(
            self.simulator.simulate_parallel(config, series, runs, seed)?,
        ))
    }

    pub fn forecast(
        &self,
        series: &DemandSeries,
        horizon_days: usize,
    ) -> EngineResult<Sourced<ForecastResult>> {
        self.forecaster.forecast(series, horizon_days)
    }

    /// Cost sweep over `grid`; always local.
    pub fn sweep(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
        grid: &[f64],
    ) -> EngineResult<CostSweep> {
        self.sweeper.sweep(config, series, grid)
    }

    pub fn sweeper(&self) -> &CostSweepEngine {
        &self.sweeper
    }

    /// Runs safety stock, simulation and forecast concurrently and waits for all three.
    pub fn analyze(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
        runs: usize,
        horizon_days: usize,
    ) -> EngineResult<Analysis> {
        let (safety_stock, (simulation, forecast)) = rayon::join(
            || self.safety_stock(config, series),
            || {
                rayon::join(
                    || self.simulate(config, series, runs),
                    || self.forecast(series, horizon_days),
                )
            },
        );

        let analysis = Analysis {
            safety_stock: safety_stock?,
            simulation: simulation?,
            forecast: forecast?,
        };
        info!(
            "analysis complete: safety stock {} ({:?}), simulated stockout {:.2}% ({:?}), forecast {:?}",
            analysis.safety_stock.value.safety_stock,
            analysis.safety_stock.source,
            analysis.simulation.value.stockout_probability,
            analysis.simulation.source,
            analysis.forecast.source
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::traits::mock::StubService;
    use chrono::NaiveDate;

    fn history() -> DemandSeries {
        DemandSeries::from_daily(
            NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            &[120.0, 135.0, 128.0, 142.0, 115.0, 130.0, 125.0],
        )
        .unwrap()
    }

    #[test]
    fn local_analysis_gathers_all_three() {
        let engine = InventoryEngine::local().with_seed(17);
        let analysis = engine
            .analyze(&SafetyStockConfig::default(), &history(), 1_000, 14)
            .unwrap();

        assert_eq!(analysis.safety_stock.source, Source::Local);
        assert_eq!(analysis.simulation.source, Source::Local);
        assert_eq!(analysis.forecast.source, Source::Local);
        assert_eq!(analysis.simulation.value.simulations.len(), 1_000);
        assert_eq!(analysis.forecast.value.forecast.len(), 14);
        assert!(!engine.service_available());
    }

    #[test]
    fn seeded_engine_is_reproducible() {
        let engine = InventoryEngine::local().with_seed(3);
        let config = SafetyStockConfig::default();
        let a = engine.simulate(&config, &history(), 2_500).unwrap();
        let b = engine.simulate(&config, &history(), 2_500).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn dead_service_degrades_to_local_results() {
        let stub = Arc::new(StubService::down());
        let engine = InventoryEngine::with_service(stub.clone()).with_seed(1);
        let config = SafetyStockConfig::default();

        let analysis = engine.analyze(&config, &history(), 500, 7).unwrap();
        assert_eq!(stub.call_count(), 3);
        assert_eq!(
            analysis.safety_stock.value,
            SafetyStockCalculator::new().calculate(&config, &history()).unwrap()
        );
        assert!(!analysis.fully_remote());
    }

    #[test]
    fn live_service_answers_are_tagged_remote() {
        let config = SafetyStockConfig::default();
        let local = InventoryEngine::local().with_seed(9);
        let canned = local.analyze(&config, &history(), 100, 5).unwrap();
        let stub = Arc::new(StubService {
            forecast: Some(canned.forecast.value.clone()),
            safety_stock: Some(canned.safety_stock.value.clone()),
            simulation: Some(canned.simulation.value.clone()),
            available: true,
            ..Default::default()
        });

        let engine = InventoryEngine::with_service(stub);
        let analysis = engine.analyze(&config, &history(), 100, 5).unwrap();
        assert!(analysis.fully_remote());
        assert!(engine.service_available());
        assert_eq!(analysis.safety_stock.value, canned.safety_stock.value);
    }

    #[test]
    fn input_errors_are_raised_before_calling_out() {
        let stub = Arc::new(StubService::down());
        let engine = InventoryEngine::with_service(stub.clone());
        let bad = SafetyStockConfig::default().with_service_level(1.5);

        assert!(matches!(
            engine.safety_stock(&bad, &history()),
            Err(EngineError::InvalidConfig { .. })
        ));
        assert_eq!(
            engine.simulate(&SafetyStockConfig::default(), &history(), 0),
            Err(EngineError::InvalidRunCount)
        );
        assert_eq!(stub.call_count(), 0);
    }
}
