//! Coating failure threshold lookup

use crate::error::{ErosionError, Result};
use crate::types::{ErosionCurve, TurbineSpec};

use super::interpolation::{Extrapolation, Interp1d};

/// Coating failure threshold for a turbine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErosionLimit {
    /// Tip speed at rated rotor speed (m/s)
    pub impact_speed: f64,
    /// Accumulated impingement at coating failure for that speed (m)
    pub r_acc_limit: f64,
}

/// Look up the accumulated impingement at which `coating` fails when hit at
/// the turbine's rated tip speed.
///
/// The rated tip speed must lie inside the tested impact-speed range of the
/// curve; there is no extrapolation.
pub fn erosion_limit(turbine: &TurbineSpec, coating: &ErosionCurve) -> Result<ErosionLimit> {
    let impact_speed = turbine.rated_tip_speed();

    let (speeds, volumes): (Vec<f64>, Vec<f64>) = coating
        .samples()
        .iter()
        .map(|s| (s.impact_speed, s.impingement_volume))
        .unzip();
    let lookup = Interp1d::new(speeds, volumes, Extrapolation::Forbid)?;
    let r_acc_limit = lookup.eval(impact_speed)?;

    if r_acc_limit <= 0.0 {
        return Err(ErosionError::InvalidCurveData(format!(
            "coating '{}': failure threshold at {impact_speed:.2} m/s is {r_acc_limit} (must be > 0)",
            coating.coating
        )));
    }

    Ok(ErosionLimit {
        impact_speed,
        r_acc_limit,
    })
}
