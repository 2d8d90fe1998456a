// src/forecast/smoothing.rs

//! Local forecast used whenever the remote service cannot answer.
//!
//! Simple exponential smoothing produces a flat forecast at the last
//! smoothed level. The band is +/- 1.96 population std devs of the history,
//! constant over the horizon; it is not a proper prediction interval.

use crate::error::EngineResult;
use crate::model::results::{ConfidenceBand, ForecastResult};
use crate::model::series::{DemandObservation, DemandSeries};
use crate::stats;

/// Weight of the newest observation.
pub const SMOOTHING_ALPHA: f64 = 0.3;

/// Two-sided 95% normal quantile.
pub const CONFIDENCE_Z: f64 = 1.96;

pub const DEFAULT_HORIZON_DAYS: usize = 14;

/// Final smoothed level of `demands`, seeded with the first value.
pub fn smoothed_level(demands: &[f64], alpha: f64) -> Option<f64> {
    let (&first, rest) = demands.split_first()?;
    Some(
        rest.iter()
            .fold(first, |level, &demand| alpha * demand + (1.0 - alpha) * level),
    )
}

/// Forecasts `horizon_days` days after the last observation.
pub fn exponential_smoothing_forecast(
    series: &DemandSeries,
    horizon_days: usize,
) -> EngineResult<ForecastResult> {
    let demands = series.demands();
    let demand_mean = stats::mean(&demands)?;
    let demand_std_dev = stats::std_dev(&demands)?;
    let level = smoothed_level(&demands, SMOOTHING_ALPHA).unwrap_or(demand_mean);

    let forecast: Vec<DemandObservation> = series
        .last()
        .date
        .iter_days()
        .skip(1)
        .take(horizon_days)
        .map(|date| DemandObservation::new(date, level))
        .collect();

    let margin = CONFIDENCE_Z * demand_std_dev;
    let confidence = ConfidenceBand {
        lower: vec![level - margin; forecast.len()],
        upper: vec![level + margin; forecast.len()],
    };

    Ok(ForecastResult {
        historical: series.clone(),
        forecast,
        demand_mean,
        demand_std_dev,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
    }

    #[test]
    fn flat_history_gives_flat_forecast_and_zero_width_band() {
        let series = DemandSeries::from_daily(start(), &[100.0; 7]).unwrap();
        let result = exponential_smoothing_forecast(&series, DEFAULT_HORIZON_DAYS).unwrap();

        assert_eq!(result.forecast.len(), 14);
        for i in 0..result.forecast.len() {
            assert_relative_eq!(result.forecast[i].demand, 100.0, epsilon = 1e-9);
            assert_relative_eq!(result.confidence.lower[i], 100.0, epsilon = 1e-9);
            assert_relative_eq!(result.confidence.upper[i], 100.0, epsilon = 1e-9);
        }
        assert_eq!(result.demand_std_dev, 0.0);
    }

    #[test]
    fn smoothing_weights_recent_values() {
        // 10 -> 0.3*20 + 0.7*10 = 13 -> 0.3*30 + 0.7*13 = 18.1
        assert_relative_eq!(
            smoothed_level(&[10.0, 20.0, 30.0], SMOOTHING_ALPHA).unwrap(),
            18.1,
            epsilon = 1e-12
        );
        assert_eq!(smoothed_level(&[], SMOOTHING_ALPHA), None);
    }

    #[test]
    fn forecast_dates_continue_after_history() {
        let series = DemandSeries::from_daily(start(), &[5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0])
            .unwrap();
        let result = exponential_smoothing_forecast(&series, 3).unwrap();
        let dates: Vec<NaiveDate> = result.forecast.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn band_is_constant_and_aligned() {
        let series = DemandSeries::from_daily(start(), &[10.0, 30.0, 20.0, 25.0, 15.0]).unwrap();
        let result = exponential_smoothing_forecast(&series, 5).unwrap();
        let sd = stats::std_dev(&series.demands()).unwrap();

        assert_eq!(result.confidence.lower.len(), result.forecast.len());
        assert_eq!(result.confidence.upper.len(), result.forecast.len());
        for (i, obs) in result.forecast.iter().enumerate() {
            assert_relative_eq!(result.confidence.upper[i] - obs.demand, 1.96 * sd, epsilon = 1e-9);
            assert_relative_eq!(obs.demand - result.confidence.lower[i], 1.96 * sd, epsilon = 1e-9);
        }
        assert_eq!(result.historical, series);
    }

    #[test]
    fn zero_horizon_is_empty() {
        let series = DemandSeries::from_daily(start(), &[1.0, 2.0]).unwrap();
        let result = exponential_smoothing_forecast(&series, 0).unwrap();
        assert!(result.forecast.is_empty());
        assert!(result.confidence.lower.is_empty());
    }
}
