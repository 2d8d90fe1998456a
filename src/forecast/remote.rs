// src/forecast/remote.rs

use crate::error::ServiceError;
use crate::model::results::{ForecastResult, MonteCarloResult, SafetyStockResult};
use crate::model::series::DemandSeries;
use crate::simulation::config::SafetyStockConfig;
use crate::strategy::traits::OptimizationService;
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the remote service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ForecastRequest<'a> {
    historical: &'a DemandSeries,
    horizon_days: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SafetyStockRequest<'a> {
    config: &'a SafetyStockConfig,
    historical: &'a DemandSeries,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateRequest<'a> {
    config: &'a SafetyStockConfig,
    historical: &'a DemandSeries,
    run_count: usize,
}

/// JSON over HTTP client for the remote service.
///
/// One attempt per call, bounded by the configured timeout. No retries.
#[derive(Debug, Clone)]
pub struct HttpOptimizationService {
    config: RemoteConfig,
    client: Client,
}

impl HttpOptimizationService {
    pub fn new(config: RemoteConfig) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        let url = self.endpoint(path);
        debug!("POST {}", url);
        let response = self.client.post(&url).json(body).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }
        response
            .json::<T>()
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

impl OptimizationService for HttpOptimizationService {
    fn forecast(
        &self,
        series: &DemandSeries,
        horizon_days: usize,
    ) -> Result<ForecastResult, ServiceError> {
        let result: ForecastResult = self.post(
            "forecast",
            &ForecastRequest {
                historical: series,
                horizon_days,
            },
        )?;
        check_forecast(&result, horizon_days)?;
        Ok(result)
    }

    fn safety_stock(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
    ) -> Result<SafetyStockResult, ServiceError> {
        let result: SafetyStockResult = self.post(
            "safety-stock",
            &SafetyStockRequest {
                config,
                historical: series,
            },
        )?;
        check_safety_stock(&result)?;
        Ok(result)
    }

    fn simulate(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
        runs: usize,
    ) -> Result<MonteCarloResult, ServiceError> {
        let result: MonteCarloResult = self.post(
            "simulate",
            &SimulateRequest {
                config,
                historical: series,
                run_count: runs,
            },
        )?;
        check_simulation(&result, runs)?;
        Ok(result)
    }

    fn is_available(&self) -> bool {
        match self.client.get(self.endpoint("health")).send() {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("health check failed: {}", e);
                false
            }
        }
    }
}

// =========================================================================
// Response checks: a well-formed but nonsensical answer counts as a failure.
// =========================================================================

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn check_forecast(result: &ForecastResult, horizon_days: usize) -> Result<(), ServiceError> {
    if result.forecast.len() != horizon_days {
        return Err(ServiceError::Decode(format!(
            "expected {} forecast days, got {}",
            horizon_days,
            result.forecast.len()
        )));
    }
    if result.confidence.lower.len() != horizon_days
        || result.confidence.upper.len() != horizon_days
    {
        return Err(ServiceError::Decode(
            "confidence bounds are not aligned with the forecast".into(),
        ));
    }
    let demands: Vec<f64> = result.forecast.iter().map(|o| o.demand).collect();
    if !all_finite(&demands)
        || !all_finite(&result.confidence.lower)
        || !all_finite(&result.confidence.upper)
        || !all_finite(&[result.demand_mean, result.demand_std_dev])
    {
        return Err(ServiceError::Decode("forecast contains non-finite values".into()));
    }
    Ok(())
}

fn check_safety_stock(result: &SafetyStockResult) -> Result<(), ServiceError> {
    let figures = [
        result.safety_stock,
        result.reorder_point,
        result.average_demand,
        result.demand_std_dev,
        result.stockout_probability,
        result.expected_annual_holding_cost,
        result.expected_annual_stockout_cost,
        result.total_cost,
        result.service_level,
    ];
    if !all_finite(&figures) {
        return Err(ServiceError::Decode(
            "safety stock result contains non-finite values".into(),
        ));
    }
    Ok(())
}

fn check_simulation(result: &MonteCarloResult, runs: usize) -> Result<(), ServiceError> {
    if result.simulations.len() != runs || result.stockout_count > runs {
        return Err(ServiceError::Decode(format!(
            "expected {} simulated runs, got {} with {} stockouts",
            runs,
            result.simulations.len(),
            result.stockout_count
        )));
    }
    if !all_finite(&result.simulations) || !result.percentiles.is_monotonic() {
        return Err(ServiceError::Decode("simulation result is malformed".into()));
    }
    Ok(())
}
