//! Safety stock recommendations from historical demand.
//!
//! The engine estimates demand statistics, sizes safety stock and the
//! reorder point for a target service level, checks stockout risk with a
//! Monte Carlo simulation, sweeps service levels for the cheapest policy and
//! forecasts the next days of demand. An optional remote service can answer
//! any of these; when it cannot, the local computation is used instead.

pub mod engine;
pub mod error;
pub mod forecast;
pub mod io;
pub mod model;
pub mod simulation;
pub mod stats;
pub mod strategy;

pub use engine::{Analysis, InventoryEngine};
pub use error::{DataError, EngineError, EngineResult, ServiceError};
pub use forecast::engine::{ForecastEngine, Source, Sourced};
pub use forecast::remote::{HttpOptimizationService, RemoteConfig};
pub use model::results::{
    ConfidenceBand, ForecastResult, MonteCarloResult, Percentiles, SafetyStockResult,
};
pub use model::series::{DemandObservation, DemandSeries};
pub use simulation::config::SafetyStockConfig;
pub use simulation::engine::MonteCarloSimulator;
pub use strategy::optimization::{z_score, SafetyStockCalculator, ZScoreTable};
pub use strategy::sweep::{CostSweep, CostSweepEngine, SweepPoint};
pub use strategy::traits::OptimizationService;
