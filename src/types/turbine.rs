//! Turbine parameters and power curve
//!
//! `TurbineSpec` replaces the loosely-typed parameter dictionaries of the
//! dashboard scripts: every instance is validated once at construction and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{ErosionError, Result};

/// A single power-curve sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerCurveSample {
    /// Hub-height wind speed (m/s)
    pub wind_speed: f64,
    /// Electrical power (W)
    pub power: f64,
    /// Rotor speed (rpm)
    pub rotor_speed: f64,
}

/// Discrete power / rotor-speed curve, sorted by wind speed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerCurve {
    samples: Vec<PowerCurveSample>,
}

impl PowerCurve {
    /// Build a curve from samples.
    ///
    /// Requires at least two samples, finite values and strictly ascending
    /// wind speeds (no duplicates).
    pub fn new(samples: Vec<PowerCurveSample>) -> Result<Self> {
        if samples.len() < 2 {
            return Err(ErosionError::InvalidCurveData(format!(
                "power curve needs at least 2 samples, got {}",
                samples.len()
            )));
        }

        for (i, s) in samples.iter().enumerate() {
            if !s.wind_speed.is_finite() || !s.power.is_finite() || !s.rotor_speed.is_finite() {
                return Err(ErosionError::InvalidCurveData(format!(
                    "power curve sample {i} contains a non-finite value"
                )));
            }
        }

        if let Some(i) = samples
            .windows(2)
            .position(|w| w[1].wind_speed <= w[0].wind_speed)
        {
            return Err(ErosionError::InvalidCurveData(format!(
                "power curve wind speeds must be strictly ascending (sample {} = {} after {})",
                i + 1,
                samples[i + 1].wind_speed,
                samples[i].wind_speed
            )));
        }

        Ok(Self { samples })
    }

    /// Build a curve from the three parallel columns of a power-curve table.
    pub fn from_columns(wind_speed: &[f64], power: &[f64], rotor_speed: &[f64]) -> Result<Self> {
        if wind_speed.len() != power.len() || wind_speed.len() != rotor_speed.len() {
            return Err(ErosionError::InvalidCurveData(format!(
                "power curve columns differ in length (wind_speed={}, power={}, rotor_speed={})",
                wind_speed.len(),
                power.len(),
                rotor_speed.len()
            )));
        }

        let samples = wind_speed
            .iter()
            .zip(power)
            .zip(rotor_speed)
            .map(|((&wind_speed, &power), &rotor_speed)| PowerCurveSample {
                wind_speed,
                power,
                rotor_speed,
            })
            .collect();

        Self::new(samples)
    }

    pub fn samples(&self) -> &[PowerCurveSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn wind_speeds(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.wind_speed).collect()
    }

    pub fn powers(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.power).collect()
    }

    pub fn rotor_speeds(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.rotor_speed).collect()
    }
}

impl<'de> Deserialize<'de> for PowerCurve {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let samples = Vec::<PowerCurveSample>::deserialize(deserializer)?;
        Self::new(samples).map_err(serde::de::Error::custom)
    }
}

/// Static turbine parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurbineSpec {
    pub name: String,
    /// Blade tip radius (m)
    pub radius: f64,
    /// Cut-in wind speed (m/s)
    pub cut_in_speed: f64,
    /// Cut-out wind speed (m/s)
    pub cut_out_speed: f64,
    /// Rated wind speed (m/s)
    pub rated_wind_speed: f64,
    /// Minimum rotor speed (rpm)
    pub min_rotor_speed: f64,
    /// Maximum (rated) rotor speed (rpm)
    pub max_rotor_speed: f64,
    pub power_curve: PowerCurve,
}

impl TurbineSpec {
    /// Validate and build a turbine record.
    ///
    /// Rules:
    /// - radius > 0
    /// - cut-in < rated < cut-out
    /// - 0 <= min rotor speed <= max rotor speed, max > 0
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        radius: f64,
        cut_in_speed: f64,
        cut_out_speed: f64,
        rated_wind_speed: f64,
        min_rotor_speed: f64,
        max_rotor_speed: f64,
        power_curve: PowerCurve,
    ) -> Result<Self> {
        let name = name.into();
        let scalars = [
            radius,
            cut_in_speed,
            cut_out_speed,
            rated_wind_speed,
            min_rotor_speed,
            max_rotor_speed,
        ];
        if scalars.iter().any(|v| !v.is_finite()) {
            return Err(ErosionError::InvalidCurveData(format!(
                "turbine '{name}': parameters must be finite"
            )));
        }
        if radius <= 0.0 {
            return Err(ErosionError::InvalidCurveData(format!(
                "turbine '{name}': radius must be > 0 (got {radius})"
            )));
        }
        if !(cut_in_speed < rated_wind_speed && rated_wind_speed < cut_out_speed) {
            return Err(ErosionError::InvalidCurveData(format!(
                "turbine '{name}': expected cut-in ({cut_in_speed}) < rated ({rated_wind_speed}) < cut-out ({cut_out_speed})"
            )));
        }
        if min_rotor_speed < 0.0 || max_rotor_speed <= 0.0 || min_rotor_speed > max_rotor_speed {
            return Err(ErosionError::InvalidCurveData(format!(
                "turbine '{name}': expected 0 <= min rotor speed ({min_rotor_speed}) <= max rotor speed ({max_rotor_speed}), max > 0"
            )));
        }

        Ok(Self {
            name,
            radius,
            cut_in_speed,
            cut_out_speed,
            rated_wind_speed,
            min_rotor_speed,
            max_rotor_speed,
            power_curve,
        })
    }

    /// Tip speed (m/s) at the rated maximum rotor speed.
    pub fn rated_tip_speed(&self) -> f64 {
        self.max_rotor_speed * std::f64::consts::PI / 30.0 * self.radius
    }
}
