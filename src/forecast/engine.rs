// src/forecast/engine.rs

use crate::error::EngineResult;
use crate::forecast::smoothing::exponential_smoothing_forecast;
use crate::model::results::ForecastResult;
use crate::model::series::DemandSeries;
use crate::strategy::traits::OptimizationService;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Local,
}

/// A result tagged with the path that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Sourced<T> {
    pub fn remote(value: T) -> Self {
        Self {
            value,
            source: Source::Remote,
        }
    }

    pub fn local(value: T) -> Self {
        Self {
            value,
            source: Source::Local,
        }
    }
}

/// Demand forecast with a remote-first, local-fallback strategy.
///
/// Primary: ask the remote service (if one is configured). On any failure
/// fall back to exponential smoothing. The caller always gets a result
/// unless the series itself is unusable.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    service: Option<Arc<dyn OptimizationService>>,
}

impl ForecastEngine {
    /// Local smoothing only.
    pub fn local() -> Self {
        Self { service: None }
    }

    pub fn with_service(service: Arc<dyn OptimizationService>) -> Self {
        Self {
            service: Some(service),
        }
    }

    pub fn forecast(
        &self,
        series: &DemandSeries,
        horizon_days: usize,
    ) -> EngineResult<Sourced<ForecastResult>> {
        if let Some(service) = &self.service {
            match service.forecast(series, horizon_days) {
                Ok(result) => return Ok(Sourced::remote(result)),
                Err(e) => warn!("remote forecast failed: {}", e),
            }
            info!("falling back to local exponential smoothing forecast");
        }
        Ok(Sourced::local(self.forecast_local(series, horizon_days)?))
    }

    /// The fallback path on its own.
    pub fn forecast_local(
        &self,
        series: &DemandSeries,
        horizon_days: usize,
    ) -> EngineResult<ForecastResult> {
        exponential_smoothing_forecast(series, horizon_days)
    }
}
