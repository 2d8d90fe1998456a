// src/simulation/config.rs

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Longest accepted lead time, ten years. Bounds the days summed per simulated run.
pub const MAX_LEAD_TIME_DAYS: f64 = 3_650.0;

/// Inventory policy parameters for one computation.
///
/// Passed by value or reference per call; nothing in the engine mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyStockConfig {
    /// Target probability of not stocking out, in (0, 1).
    pub service_level: f64,
    /// Replenishment lead time in days.
    pub lead_time: f64,
    pub lead_time_std_dev: f64,
    /// Days between reviews. Carried through, not used by the formula.
    pub review_period: f64,
    /// Currency per unit per year.
    pub holding_cost_per_unit: f64,
    /// Currency per unit short.
    pub stockout_cost_per_unit: f64,
}

impl Default for SafetyStockConfig {
    fn default() -> Self {
        Self {
            service_level: 0.95,
            lead_time: 7.0,
            lead_time_std_dev: 1.5,
            review_period: 7.0,
            holding_cost_per_unit: 5.0,
            stockout_cost_per_unit: 50.0,
        }
    }
}

impl SafetyStockConfig {
    /// Copy of this config with only the service level replaced.
    pub fn with_service_level(&self, service_level: f64) -> Self {
        Self {
            service_level,
            ..*self
        }
    }

    /// Rejects non-finite or out-of-range fields before any statistic is computed.
    pub fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("service_level", self.service_level),
            ("lead_time", self.lead_time),
            ("lead_time_std_dev", self.lead_time_std_dev),
            ("review_period", self.review_period),
            ("holding_cost_per_unit", self.holding_cost_per_unit),
            ("stockout_cost_per_unit", self.stockout_cost_per_unit),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(invalid(field, value, "must be finite"));
            }
        }

        if self.service_level <= 0.0 || self.service_level >= 1.0 {
            return Err(invalid(
                "service_level",
                self.service_level,
                "must lie strictly between 0 and 1",
            ));
        }
        if self.lead_time <= 0.0 {
            return Err(invalid("lead_time", self.lead_time, "must be positive"));
        }
        if self.lead_time > MAX_LEAD_TIME_DAYS {
            return Err(invalid("lead_time", self.lead_time, "must not exceed 3650 days"));
        }
        if self.review_period <= 0.0 {
            return Err(invalid("review_period", self.review_period, "must be positive"));
        }
        for (field, value) in [
            ("lead_time_std_dev", self.lead_time_std_dev),
            ("holding_cost_per_unit", self.holding_cost_per_unit),
            ("stockout_cost_per_unit", self.stockout_cost_per_unit),
        ] {
            if value < 0.0 {
                return Err(invalid(field, value, "must not be negative"));
            }
        }
        Ok(())
    }

    /// Lead time as a whole number of simulated days (rounded, at least one).
    pub fn lead_time_days(&self) -> usize {
        (self.lead_time.round() as usize).max(1)
    }
}

fn invalid(field: &'static str, value: f64, reason: &'static str) -> EngineError {
    EngineError::InvalidConfig {
        field,
        value,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SafetyStockConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_finite_fields() {
        let config = SafetyStockConfig {
            holding_cost_per_unit: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfig {
                field: "holding_cost_per_unit",
                ..
            })
        ));
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let base = SafetyStockConfig::default();
        assert!(base.with_service_level(1.0).validate().is_err());
        assert!(base.with_service_level(0.0).validate().is_err());
        assert!(SafetyStockConfig { lead_time: 0.0, ..base }.validate().is_err());
        assert!(SafetyStockConfig { lead_time_std_dev: -0.1, ..base }.validate().is_err());
        assert!(SafetyStockConfig { review_period: 0.0, ..base }.validate().is_err());
        assert!(SafetyStockConfig { stockout_cost_per_unit: -1.0, ..base }.validate().is_err());
    }

    #[test]
    fn rejects_lead_times_beyond_ten_years() {
        let base = SafetyStockConfig::default();
        assert!(SafetyStockConfig { lead_time: MAX_LEAD_TIME_DAYS, ..base }.validate().is_ok());
        assert!(matches!(
            SafetyStockConfig { lead_time: 1e12, ..base }.validate(),
            Err(EngineError::InvalidConfig { field: "lead_time", .. })
        ));
    }

    #[test]
    fn with_service_level_changes_nothing_else() {
        let base = SafetyStockConfig::default();
        let swapped = base.with_service_level(0.99);
        assert_eq!(swapped.service_level, 0.99);
        assert_eq!(swapped.with_service_level(base.service_level), base);
    }

    #[test]
    fn lead_time_days_rounds() {
        let base = SafetyStockConfig::default();
        assert_eq!(SafetyStockConfig { lead_time: 7.4, ..base }.lead_time_days(), 7);
        assert_eq!(SafetyStockConfig { lead_time: 7.5, ..base }.lead_time_days(), 8);
        assert_eq!(SafetyStockConfig { lead_time: 0.2, ..base }.lead_time_days(), 1);
    }
}
