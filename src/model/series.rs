// src/model/series.rs

use crate::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minimum number of distinct days a user supplied series must cover.
pub const MIN_INPUT_DAYS: usize = 7;

/// Demand recorded (or forecast) for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandObservation {
    pub date: NaiveDate,
    pub demand: f64,
}

impl DemandObservation {
    pub fn new(date: NaiveDate, demand: f64) -> Self {
        Self { date, demand }
    }
}

/// A validated demand history.
///
/// Observations are strictly ascending by date (one per day at most) and
/// every demand value is finite and non-negative. The series is never
/// patched in place; callers build a new one to replace it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DemandObservation>", into = "Vec<DemandObservation>")]
pub struct DemandSeries {
    observations: Vec<DemandObservation>,
}

impl DemandSeries {
    /// Builds a series usable for statistics (at least one observation).
    pub fn new(observations: Vec<DemandObservation>) -> EngineResult<Self> {
        if observations.is_empty() {
            return Err(EngineError::EmptySeries);
        }

        for obs in &observations {
            if !obs.demand.is_finite() || obs.demand < 0.0 {
                return Err(EngineError::InvalidDemand {
                    date: obs.date,
                    value: obs.demand,
                });
            }
        }

        for pair in observations.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(EngineError::DuplicateDate(pair[1].date));
            }
            if pair[1].date < pair[0].date {
                return Err(EngineError::UnorderedDates);
            }
        }

        Ok(Self { observations })
    }

    /// Builds a series from user supplied data, which must also span at
    /// least [`MIN_INPUT_DAYS`] distinct days.
    pub fn from_input(observations: Vec<DemandObservation>) -> EngineResult<Self> {
        let series = Self::new(observations)?;
        if series.len() < MIN_INPUT_DAYS {
            return Err(EngineError::SeriesTooShort {
                len: series.len(),
                min: MIN_INPUT_DAYS,
            });
        }
        Ok(series)
    }

    /// Convenience constructor: consecutive days starting at `start`.
    pub fn from_daily(start: NaiveDate, demands: &[f64]) -> EngineResult<Self> {
        let observations = start
            .iter_days()
            .zip(demands.iter())
            .map(|(date, &demand)| DemandObservation::new(date, demand))
            .collect();
        Self::new(observations)
    }

    pub fn observations(&self) -> &[DemandObservation] {
        &self.observations
    }

    /// Demand values in date order.
    pub fn demands(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.demand).collect()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first(&self) -> &DemandObservation {
        // Non-empty by construction.
        &self.observations[0]
    }

    pub fn last(&self) -> &DemandObservation {
        &self.observations[self.observations.len() - 1]
    }
}

impl TryFrom<Vec<DemandObservation>> for DemandSeries {
    type Error = EngineError;

    fn try_from(observations: Vec<DemandObservation>) -> EngineResult<Self> {
        Self::new(observations)
    }
}

impl From<DemandSeries> for Vec<DemandObservation> {
    fn from(series: DemandSeries) -> Self {
        series.observations
    }
}
