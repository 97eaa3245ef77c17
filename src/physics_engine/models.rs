//! Rotor speed models
//!
//! Maps a wind speed to the rotor speed the controller would run at
//! without a rain cap.

use crate::config::{LinearRampConfig, RotorSpeedModel};
use crate::error::Result;
use crate::types::TurbineSpec;

use super::interpolation::PowerCurveInterpolator;

/// Rotor speed (rpm) for `wind_speed` under the configured model.
///
/// `Curve` interpolates the turbine's tabulated rotor speeds and
/// extrapolates linearly outside them; `LinearRamp` uses the turbine's
/// operating limits only.
pub fn rotor_speed_rpm(
    model: RotorSpeedModel,
    interpolator: &PowerCurveInterpolator,
    turbine: &TurbineSpec,
    ramp: &LinearRampConfig,
    wind_speed: f64,
) -> Result<f64> {
    match model {
        RotorSpeedModel::Curve => interpolator.rotor_speed_at(wind_speed),
        RotorSpeedModel::LinearRamp => Ok(linear_ramp_rotor_speed(turbine, ramp, wind_speed)),
    }
}

/// Piecewise-linear rotor speed schedule
///
/// n(U) =
/// - 0                                   for U < U_idle
/// - n_min                               for U_idle <= U < U_start
/// - n_min + (n_max - n_min) × (U - U_start) / (U_rated - U_start)
///                                       for U_start <= U <= U_rated
/// - n_max                               for U > U_rated
///
/// Where:
/// - U_idle = wind speed below which the rotor idles
/// - U_start = wind speed where the rotor begins to speed up
/// - U_rated = turbine rated wind speed
pub fn linear_ramp_rotor_speed(turbine: &TurbineSpec, ramp: &LinearRampConfig, wind_speed: f64) -> f64 {
    let n_min = turbine.min_rotor_speed;
    let n_max = turbine.max_rotor_speed;
    let u_rated = turbine.rated_wind_speed;

    if wind_speed < ramp.idle_wind_speed {
        0.0
    } else if wind_speed < ramp.ramp_start_wind_speed {
        n_min
    } else if wind_speed > u_rated || u_rated <= ramp.ramp_start_wind_speed {
        n_max
    } else {
        n_min + (n_max - n_min) * (wind_speed - ramp.ramp_start_wind_speed)
            / (u_rated - ramp.ramp_start_wind_speed)
    }
}
