// src/strategy/traits.rs

use crate::error::ServiceError;
use crate::model::results::{ForecastResult, MonteCarloResult, SafetyStockResult};
use crate::model::series::DemandSeries;
use crate::simulation::config::SafetyStockConfig;
use std::fmt::Debug;

/// An external forecasting/optimization service.
///
/// Every operation is idempotent and side-effect free on the remote end.
/// Any `Err` is treated as "unavailable" and answered locally by the caller.
///
/// We require `Send` + `Sync` so the engine can dispatch the three
/// computations concurrently.
pub trait OptimizationService: Debug + Send + Sync {
    /// Forecasts `horizon_days` days past the end of `series`.
    fn forecast(
        &self,
        series: &DemandSeries,
        horizon_days: usize,
    ) -> Result<ForecastResult, ServiceError>;

    fn safety_stock(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
    ) -> Result<SafetyStockResult, ServiceError>;

    fn simulate(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
        runs: usize,
    ) -> Result<MonteCarloResult, ServiceError>;

    /// Used to annotate output only; never needed for correctness.
    fn is_available(&self) -> bool;
}
