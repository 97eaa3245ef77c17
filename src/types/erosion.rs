//! Coating erosion reference curves

use serde::{Deserialize, Serialize};

use crate::error::{ErosionError, Result};

/// One point of a rain-erosion test curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErosionSample {
    /// Accumulated impingement at coating failure (m)
    pub impingement_volume: f64,
    /// Rotor impact speed of the test (m/s)
    pub impact_speed: f64,
}

/// Failure curve for one coating, sorted by impact speed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErosionCurve {
    pub coating: String,
    samples: Vec<ErosionSample>,
}

impl ErosionCurve {
    /// Build a curve from samples already sorted by impact speed.
    ///
    /// Requires at least two finite samples and strictly ascending impact
    /// speeds.
    pub fn new(coating: impl Into<String>, samples: Vec<ErosionSample>) -> Result<Self> {
        let coating = coating.into();
        if samples.len() < 2 {
            return Err(ErosionError::InvalidCurveData(format!(
                "erosion curve '{coating}' needs at least 2 samples, got {}",
                samples.len()
            )));
        }
        if samples
            .iter()
            .any(|s| !s.impingement_volume.is_finite() || !s.impact_speed.is_finite())
        {
            return Err(ErosionError::InvalidCurveData(format!(
                "erosion curve '{coating}' contains non-finite values"
            )));
        }
        if let Some(i) = samples
            .windows(2)
            .position(|w| w[1].impact_speed <= w[0].impact_speed)
        {
            return Err(ErosionError::InvalidCurveData(format!(
                "erosion curve '{coating}': impact speeds must be strictly ascending ({} after {})",
                samples[i + 1].impact_speed,
                samples[i].impact_speed
            )));
        }
        Ok(Self { coating, samples })
    }

    /// Build a curve from raw `(impingement_volume, impact_speed)` pairs as
    /// they appear in the reference table: pairs with a missing half are
    /// dropped and the rest sorted by impact speed.
    pub fn from_raw_pairs(
        coating: impl Into<String>,
        pairs: impl IntoIterator<Item = (Option<f64>, Option<f64>)>,
    ) -> Result<Self> {
        let mut samples: Vec<ErosionSample> = pairs
            .into_iter()
            .filter_map(|(volume, speed)| match (volume, speed) {
                (Some(impingement_volume), Some(impact_speed)) => Some(ErosionSample {
                    impingement_volume,
                    impact_speed,
                }),
                _ => None,
            })
            .collect();
        samples.sort_by(|a, b| a.impact_speed.total_cmp(&b.impact_speed));
        Self::new(coating, samples)
    }

    pub fn samples(&self) -> &[ErosionSample] {
        &self.samples
    }

    /// Sampled impact-speed range (m/s).
    pub fn impact_speed_range(&self) -> (f64, f64) {
        let first = self.samples.first().map_or(f64::NAN, |s| s.impact_speed);
        let last = self.samples.last().map_or(f64::NAN, |s| s.impact_speed);
        (first, last)
    }
}
