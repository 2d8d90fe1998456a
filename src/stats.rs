// src/stats.rs

//! Descriptive statistics over demand values.
//!
//! All functions reject empty input with [`EngineError::EmptySeries`]
//! instead of returning NaN.

use crate::error::{EngineError, EngineResult};

/// Arithmetic mean.
pub fn mean(xs: &[f64]) -> EngineResult<f64> {
    if xs.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Population standard deviation (divides by N, not N - 1).
pub fn std_dev(xs: &[f64]) -> EngineResult<f64> {
    let mu = mean(xs)?;
    let variance = xs.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / xs.len() as f64;
    Ok(variance.sqrt())
}

/// Nearest-rank percentile of an already sorted slice.
///
/// Index is `floor(p / 100 * len)`, clamped into the slice, so `p = 100`
/// returns the maximum. No interpolation between ranks.
pub fn percentile(sorted: &[f64], p: f64) -> EngineResult<f64> {
    if sorted.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    let raw = (p / 100.0 * sorted.len() as f64).floor();
    let index = if raw.is_nan() || raw < 0.0 {
        0
    } else {
        (raw as usize).min(sorted.len() - 1)
    };
    Ok(sorted[index])
}

/// Rounds to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
