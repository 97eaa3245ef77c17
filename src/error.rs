//! Error types for the impingement / yield core.

use thiserror::Error;

/// Errors raised by the numeric core.
///
/// Every variant is surfaced to the caller immediately; the core never
/// returns partial results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ErosionError {
    /// Malformed, unsorted or duplicated power-curve / erosion-curve samples
    #[error("Invalid curve data: {0}")]
    InvalidCurveData(String),

    /// Empty, unsorted or out-of-domain weather series (or cap values)
    #[error("Invalid input series: {0}")]
    InvalidInputSeries(String),

    /// Lookup outside the sampled range of a curve that forbids extrapolation
    #[error("Lookup value {value:.4} outside sampled range [{min:.4}, {max:.4}]")]
    OutOfRangeLookup { value: f64, min: f64, max: f64 },

    #[error("Unknown turbine: {0}")]
    UnknownTurbine(String),

    #[error("Unknown coating: {0}")]
    UnknownCoating(String),
}

pub type Result<T> = std::result::Result<T, ErosionError>;
