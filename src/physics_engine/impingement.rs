//! Rain impingement physics for the blade tip
//!
//! Key calculations per weather sample:
//! - Rotor speed unit conversions
//! - Rain-event tip-speed cap
//! - Relative droplet impact speed
//! - Impingement rate
//! - Linear efficiency degradation

use std::f64::consts::PI;

use crate::config::defaults::{DENSITY_NORMALISATION, SECONDS_PER_HOUR};

// ============================================================================
// Unit Conversions
// ============================================================================

/// Rotor speed in rpm to angular speed in rad/s.
pub fn rpm_to_rad_per_sec(rpm: f64) -> f64 {
    rpm * 2.0 * PI / 60.0
}

/// Angular speed in rad/s to rotor speed in rpm.
pub fn rad_per_sec_to_rpm(omega: f64) -> f64 {
    omega * 60.0 / (2.0 * PI)
}

// ============================================================================
// Tip Speed Cap
// ============================================================================

/// Maximum permissible angular speed (rad/s) for a tip-speed cap.
///
/// omega_max = V_cap / radius, floored at `floor_rpm` so that a zero cap
/// parks the rotor instead of producing a zero divisor downstream.
pub fn cap_angular_speed(cap_value: f64, radius: f64, floor_rpm: f64) -> f64 {
    (cap_value / radius).max(rpm_to_rad_per_sec(floor_rpm))
}

/// Apply the rain cap to an angular speed.
///
/// The cap only binds when it is raining (`rain_flux > rain_threshold`)
/// and the rotor would otherwise spin faster than `omega_max`.
pub fn capped_angular_speed(omega: f64, omega_max: f64, rain_flux: f64, rain_threshold: f64) -> f64 {
    if rain_flux > rain_threshold && omega > omega_max {
        omega_max
    } else {
        omega
    }
}

// ============================================================================
// Impact Speed and Impingement
// ============================================================================

/// Relative droplet impact speed at the blade tip (m/s).
///
/// Wind and rotation are treated as orthogonal components:
/// v = sqrt(U² + (omega × R)²)
pub fn relative_tip_speed(wind_speed: f64, omega: f64, radius: f64) -> f64 {
    wind_speed.hypot(omega * radius)
}

/// Instantaneous impingement rate (m/h).
///
/// r = q × v × 3600 × (rho / 1000)
///
/// Where:
/// - q = rain flux (kg/m²/h)
/// - v = relative impact speed (m/s)
/// - rho = air density (kg/m³), a density correction factor
pub fn impingement_rate(rain_flux: f64, relative_speed: f64, air_density: f64) -> f64 {
    rain_flux * relative_speed * SECONDS_PER_HOUR * (air_density / DENSITY_NORMALISATION)
}

/// Remaining turbine efficiency (%) for an accumulated impingement.
///
/// Linear degradation model: efficiency drops by `power_loss_fraction` once
/// the accumulated impingement reaches the coating failure threshold, and
/// keeps dropping at the same slope beyond it. This is a modelling
/// assumption, not a physical law.
pub fn efficiency_pct(cumulative: f64, r_acc_limit: f64, power_loss_fraction: f64) -> f64 {
    (1.0 - cumulative / r_acc_limit * power_loss_fraction) * 100.0
}
