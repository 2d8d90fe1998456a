// src/error.rs

use chrono::NaiveDate;
use thiserror::Error;

/// Hard failures the engine hands back to the caller.
///
/// Every variant is an input problem: the engine refuses to compute rather
/// than emit NaN or Infinity.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("demand series is empty")]
    EmptySeries,
    #[error("demand series has {len} distinct days, at least {min} are required")]
    SeriesTooShort { len: usize, min: usize },
    #[error("demand series is not ordered by date")]
    UnorderedDates,
    #[error("demand series contains more than one observation for {0}")]
    DuplicateDate(NaiveDate),
    #[error("demand on {date} is {value}, expected a finite non-negative number")]
    InvalidDemand { date: NaiveDate, value: f64 },
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("simulation run count must be at least 1")]
    InvalidRunCount,
    #[error("service level grid is empty")]
    EmptyGrid,
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Failures talking to the remote optimization service.
///
/// These never reach the caller of the engine facade: they are logged and
/// answered with the local computation instead.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("remote service unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("remote service timed out")]
    Timeout,
    #[error("remote service answered with status {0}")]
    Status(u16),
    #[error("remote service returned an unusable response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else if err.is_decode() {
            ServiceError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ServiceError::Status(status.as_u16())
        } else {
            ServiceError::Transport(err)
        }
    }
}

/// Failures reading or writing demand and report files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("demand data rejected: {0}")]
    Invalid(#[from] EngineError),
}
