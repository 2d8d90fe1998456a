// src/strategy/optimization.rs

//! Module for safety stock and reorder point calculations.
//!
//! This module sizes the buffer inventory needed to hit a target service
//! level given variable daily demand and a variable replenishment lead time,
//! and projects the yearly cost of holding that buffer against the cost of
//! the stockouts it does not prevent.

use crate::error::EngineResult;
use crate::model::results::SafetyStockResult;
use crate::model::series::DemandSeries;
use crate::simulation::config::SafetyStockConfig;
use crate::stats::{self, round_to};
use log::{debug, warn};

// =========================================================================
// 1. Z-Score Table
// =========================================================================

/// Anchor points of the standard normal quantile function, `(service level, z)`.
const Z_ANCHORS: [(f64, f64); 7] = [
    (0.90, 1.282),
    (0.95, 1.645),
    (0.96, 1.751),
    (0.97, 1.881),
    (0.98, 2.054),
    (0.99, 2.326),
    (0.995, 2.576),
];

/// A z-score together with whether the requested service level had to be clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZLookup {
    pub z: f64,
    pub clamped: bool,
}

/// Piecewise-linear approximation of the inverse standard normal CDF.
///
/// Only accurate for service levels in [0.90, 0.995]. Outside that range the
/// nearest anchor is returned and the lookup is flagged as clamped; there is
/// no extrapolation.
pub struct ZScoreTable;

impl ZScoreTable {
    pub const MIN_SERVICE_LEVEL: f64 = 0.90;
    pub const MAX_SERVICE_LEVEL: f64 = 0.995;

    pub fn lookup(service_level: f64) -> ZLookup {
        let (min_sl, min_z) = Z_ANCHORS[0];
        let (_, max_z) = Z_ANCHORS[Z_ANCHORS.len() - 1];

        if service_level <= min_sl {
            return ZLookup {
                z: min_z,
                clamped: service_level < min_sl,
            };
        }

        for pair in Z_ANCHORS.windows(2) {
            let (lo_sl, lo_z) = pair[0];
            let (hi_sl, hi_z) = pair[1];
            if service_level == hi_sl {
                return ZLookup {
                    z: hi_z,
                    clamped: false,
                };
            }
            if service_level < hi_sl {
                let fraction = (service_level - lo_sl) / (hi_sl - lo_sl);
                return ZLookup {
                    z: lo_z + fraction * (hi_z - lo_z),
                    clamped: false,
                };
            }
        }

        ZLookup {
            z: max_z,
            clamped: true,
        }
    }
}

/// Z-score for a service level, see [`ZScoreTable`].
pub fn z_score(service_level: f64) -> f64 {
    ZScoreTable::lookup(service_level).z
}

// =========================================================================
// 2. Safety Stock Calculator
// =========================================================================

/// Closed-form safety stock with combined demand and lead-time variability.
///
/// # Formula
/// SafetyStock = Z * sqrt(L * sigma_d^2 + mu_d^2 * sigma_L^2)
/// ReorderPoint = mu_d * L + SafetyStock
///
/// Where:
/// - mu_d, sigma_d = mean and population std dev of daily demand
/// - L, sigma_L = lead time and its std dev, in days
/// - Z = z-score of the target service level
///
/// Demand and lead time are assumed independent and normally distributed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyStockCalculator;

impl SafetyStockCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Computes the buffer, reorder point and yearly cost projection.
    ///
    /// # Arguments
    /// * `config` - Policy parameters; validated before use.
    /// * `series` - Full demand history; no windowing is applied.
    ///
    /// # Returns
    /// A fresh [`SafetyStockResult`]. Holding cost is charged against the
    /// safety stock only, and the stockout probability is the nominal
    /// `1 - service level`, not re-derived from the buffer.
    pub fn calculate(
        &self,
        config: &SafetyStockConfig,
        series: &DemandSeries,
    ) -> EngineResult<SafetyStockResult> {
        config.validate()?;

        let demands = series.demands();
        let avg_demand = stats::mean(&demands)?;
        let demand_std_dev = stats::std_dev(&demands)?;

        let lookup = ZScoreTable::lookup(config.service_level);
        if lookup.clamped {
            warn!(
                "service level {} is outside [{}, {}]; z-score clamped to {}",
                config.service_level,
                ZScoreTable::MIN_SERVICE_LEVEL,
                ZScoreTable::MAX_SERVICE_LEVEL,
                lookup.z
            );
        }

        let combined_variance = config.lead_time * demand_std_dev.powi(2)
            + avg_demand.powi(2) * config.lead_time_std_dev.powi(2);
        let safety_stock = lookup.z * combined_variance.sqrt();
        let reorder_point = avg_demand * config.lead_time + safety_stock;

        let holding_cost = safety_stock * config.holding_cost_per_unit;
        let stockout_probability = 1.0 - config.service_level;
        let stockout_cost =
            avg_demand * 365.0 * stockout_probability * config.stockout_cost_per_unit;
        let total_cost = holding_cost + stockout_cost;

        debug!(
            "safety stock {:.2} (z = {:.3}), reorder point {:.2}, total cost {:.2}",
            safety_stock, lookup.z, reorder_point, total_cost
        );

        Ok(SafetyStockResult {
            safety_stock: safety_stock.round(),
            reorder_point: reorder_point.round(),
            average_demand: round_to(avg_demand, 2),
            demand_std_dev: round_to(demand_std_dev, 2),
            stockout_probability: round_to(stockout_probability * 100.0, 2),
            expected_annual_holding_cost: holding_cost.round(),
            expected_annual_stockout_cost: stockout_cost.round(),
            total_cost: total_cost.round(),
            service_level: round_to(config.service_level * 100.0, 2),
            service_level_clamped: lookup.clamped,
        })
    }
}
