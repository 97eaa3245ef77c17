//! One-dimensional interpolation and the turbine power-curve interpolator
//!
//! Power-curve lookups extrapolate linearly past the sampled range (cap
//! evaluation routinely queries rotor speeds below the curve), while
//! erosion-limit lookups must stay inside the tested range.

use crate::error::{ErosionError, Result};
use crate::types::TurbineSpec;

/// Behaviour outside the sampled x range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extrapolation {
    /// Extend the first / last segment linearly
    Linear,
    /// Fail with `OutOfRangeLookup`
    Forbid,
}

/// Piecewise-linear interpolant over strictly increasing knots.
#[derive(Debug, Clone, PartialEq)]
pub struct Interp1d {
    xs: Vec<f64>,
    ys: Vec<f64>,
    extrapolation: Extrapolation,
}

impl Interp1d {
    /// Build an interpolant.
    ///
    /// Requires equal-length, finite columns with at least two knots and
    /// strictly increasing `xs`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, extrapolation: Extrapolation) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(ErosionError::InvalidCurveData(format!(
                "interpolation columns differ in length ({} vs {})",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(ErosionError::InvalidCurveData(format!(
                "interpolation needs at least 2 knots, got {}",
                xs.len()
            )));
        }
        if xs.iter().chain(&ys).any(|v| !v.is_finite()) {
            return Err(ErosionError::InvalidCurveData(
                "interpolation knots must be finite".to_string(),
            ));
        }
        if let Some(i) = xs.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ErosionError::InvalidCurveData(format!(
                "interpolation x values must be strictly increasing ({} after {})",
                xs[i + 1],
                xs[i]
            )));
        }
        Ok(Self {
            xs,
            ys,
            extrapolation,
        })
    }

    /// Sampled x range.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Evaluate at `x`.
    pub fn eval(&self, x: f64) -> Result<f64> {
        if !x.is_finite() {
            return Err(ErosionError::InvalidInputSeries(format!(
                "interpolation query must be finite (got {x})"
            )));
        }

        let (min, max) = self.domain();
        if self.extrapolation == Extrapolation::Forbid && (x < min || x > max) {
            return Err(ErosionError::OutOfRangeLookup { value: x, min, max });
        }

        // Right knot of the bracketing segment; boundary segments extend outward
        let n = self.xs.len();
        let hi = self.xs.partition_point(|&v| v <= x).clamp(1, n - 1);
        let lo = hi - 1;

        let t = (x - self.xs[lo]) / (self.xs[hi] - self.xs[lo]);
        Ok(self.ys[lo] + t * (self.ys[hi] - self.ys[lo]))
    }
}

/// Interpolants derived from a turbine's power curve.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerCurveInterpolator {
    rotor_speed_by_wind: Interp1d,
    power_by_wind: Interp1d,
    /// Fails for fixed-speed rotors; only cap-power lookups need it
    power_by_rotor_speed: Result<Interp1d>,
    wind_by_power: Option<Interp1d>,
}

impl PowerCurveInterpolator {
    /// Build the interpolants for `turbine`.
    ///
    /// Only the wind-speed interpolants must succeed. A curve without a
    /// usable rotor speed → power relation still builds; `power_at` then
    /// returns the construction error.
    pub fn new(turbine: &TurbineSpec) -> Result<Self> {
        let curve = &turbine.power_curve;

        let rotor_speed_by_wind =
            Interp1d::new(curve.wind_speeds(), curve.rotor_speeds(), Extrapolation::Linear)?;
        let power_by_wind =
            Interp1d::new(curve.wind_speeds(), curve.powers(), Extrapolation::Linear)?;
        let power_by_rotor_speed = Self::build_power_by_rotor_speed(turbine);
        let wind_by_power = Self::build_wind_by_power(turbine);

        Ok(Self {
            rotor_speed_by_wind,
            power_by_wind,
            power_by_rotor_speed,
            wind_by_power,
        })
    }

    /// Rotor speed (rpm) at a wind speed, extrapolated past the curve.
    pub fn rotor_speed_at(&self, wind_speed: f64) -> Result<f64> {
        self.rotor_speed_by_wind.eval(wind_speed)
    }

    /// Power (W) at a rotor speed (rpm), from the cut-in/cut-out band only.
    pub fn power_at(&self, rotor_speed: f64) -> Result<f64> {
        self.power_by_rotor_speed()?.eval(rotor_speed)
    }

    /// The rotor speed → power interpolant, or why it could not be built.
    pub fn power_by_rotor_speed(&self) -> Result<&Interp1d> {
        self.power_by_rotor_speed.as_ref().map_err(Clone::clone)
    }

    /// Power (W) at a wind speed over the full curve, extrapolated.
    pub fn power_at_wind(&self, wind_speed: f64) -> Result<f64> {
        self.power_by_wind.eval(wind_speed)
    }

    /// Wind speed (m/s) producing `power` on the rising part of the curve.
    ///
    /// No extrapolation: powers outside the rising segment are rejected.
    pub fn wind_speed_at_power(&self, power: f64) -> Result<f64> {
        match &self.wind_by_power {
            Some(interp) => interp.eval(power),
            None => Err(ErosionError::InvalidCurveData(
                "power curve has no strictly rising segment between cut-in and rated".to_string(),
            )),
        }
    }

    /// Rotor speed → power knots from samples with cut-in < wind < cut-out.
    ///
    /// Rotor speed must not decrease with wind speed inside the band.
    /// Plateaus (minimum-rpm and rated-rpm regions) collapse to one knot
    /// carrying the highest power reached at that speed.
    fn build_power_by_rotor_speed(turbine: &TurbineSpec) -> Result<Interp1d> {
        let band: Vec<_> = turbine
            .power_curve
            .samples()
            .iter()
            .filter(|s| s.wind_speed > turbine.cut_in_speed && s.wind_speed < turbine.cut_out_speed)
            .collect();

        if let Some(pair) = band.windows(2).find(|w| w[1].rotor_speed < w[0].rotor_speed) {
            return Err(ErosionError::InvalidCurveData(format!(
                "turbine '{}': rotor speed decreases from {} to {} rpm between cut-in and cut-out",
                turbine.name, pair[0].rotor_speed, pair[1].rotor_speed
            )));
        }

        let mut rotor_speeds: Vec<f64> = Vec::with_capacity(band.len());
        let mut powers: Vec<f64> = Vec::with_capacity(band.len());
        for s in band {
            if rotor_speeds.last() == Some(&s.rotor_speed) {
                if let Some(last_power) = powers.last_mut() {
                    *last_power = last_power.max(s.power);
                }
            } else {
                rotor_speeds.push(s.rotor_speed);
                powers.push(s.power);
            }
        }

        if rotor_speeds.len() < 2 {
            return Err(ErosionError::InvalidCurveData(format!(
                "turbine '{}': fewer than 2 distinct rotor speeds between cut-in ({}) and cut-out ({})",
                turbine.name, turbine.cut_in_speed, turbine.cut_out_speed
            )));
        }

        Interp1d::new(rotor_speeds, powers, Extrapolation::Linear)
    }

    /// Power → wind knots over the strictly rising run that starts above cut-in.
    fn build_wind_by_power(turbine: &TurbineSpec) -> Option<Interp1d> {
        let mut powers = Vec::new();
        let mut winds = Vec::new();
        for s in turbine
            .power_curve
            .samples()
            .iter()
            .filter(|s| s.wind_speed > turbine.cut_in_speed && s.wind_speed <= turbine.rated_wind_speed)
        {
            if powers.last().is_some_and(|&p| s.power <= p) {
                break;
            }
            powers.push(s.power);
            winds.push(s.wind_speed);
        }
        Interp1d::new(powers, winds, Extrapolation::Forbid).ok()
    }
}
