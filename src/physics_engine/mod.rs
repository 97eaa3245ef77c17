//! Physics Engine Module
//!
//! Deterministic rain-erosion calculations for a turbine blade tip.
//! Everything here is a pure batch transform over a weather series.
//!
//! ## Building Blocks
//! - `Interp1d` / `PowerCurveInterpolator` - power-curve lookups
//! - `rotor_speed_rpm()` - rotor speed from wind speed
//! - `erosion_limit()` - coating failure threshold at rated tip speed
//! - `impingement_rate()` / `efficiency_pct()` - per-row physics
//!
//! ## Entry Points
//! - `compute_impingement()` - one run for a single tip-speed cap
//! - `count_gaps()` - sampling gaps in a weather series

pub mod erosion_limit;
pub mod impingement;
pub mod interpolation;
pub mod models;

pub use erosion_limit::{erosion_limit, ErosionLimit};
pub use impingement::{
    cap_angular_speed, capped_angular_speed, efficiency_pct, impingement_rate,
    rad_per_sec_to_rpm, relative_tip_speed, rpm_to_rad_per_sec,
};
pub use interpolation::{Extrapolation, Interp1d, PowerCurveInterpolator};
pub use models::{linear_ramp_rotor_speed, rotor_speed_rpm};

use tracing::debug;

use crate::config::ModelConfig;
use crate::error::{ErosionError, Result};
use crate::types::{
    ErosionCurve, ImpingementRow, ImpingementRun, ImpingementSeries, TurbineSpec, WeatherSample,
};

// ============================================================================
// Impingement Run
// ============================================================================

/// Compute the impingement series for one tip-speed cap.
///
/// Per sample, in order:
/// 1. Rotor speed from the configured rotor-speed model
/// 2. Cap the angular speed while it rains above the threshold
/// 3. Relative impact speed and impingement rate
/// 4. Running impingement total and remaining efficiency
///
/// The coating failure threshold is looked up once at the turbine's rated
/// tip speed. Any invalid input fails the whole run, including a `model`
/// that fails `ModelConfig::check`.
pub fn compute_impingement(
    series: &[WeatherSample],
    turbine: &TurbineSpec,
    cap_value: f64,
    coating: &ErosionCurve,
    model: &ModelConfig,
) -> Result<ImpingementRun> {
    validate_series(series)?;
    validate_cap(cap_value)?;
    model
        .check()
        .map_err(|e| ErosionError::InvalidInputSeries(format!("model config: {e}")))?;

    let interpolator = PowerCurveInterpolator::new(turbine)?;
    let limit = erosion_limit(turbine, coating)?;
    let omega_max = cap_angular_speed(cap_value, turbine.radius, model.zero_cap_floor_rpm);

    let mut rows = Vec::with_capacity(series.len());
    let mut cumulative = 0.0;

    for sample in series {
        let rpm = rotor_speed_rpm(
            model.rotor_speed_model,
            &interpolator,
            turbine,
            &model.linear_ramp,
            sample.wind_speed,
        )?;
        let omega = rpm_to_rad_per_sec(rpm);
        let omega_capped =
            capped_angular_speed(omega, omega_max, sample.rain_flux, model.rain_threshold_kg_m2_h);

        let v = relative_tip_speed(sample.wind_speed, omega_capped, turbine.radius);
        let rate = impingement_rate(sample.rain_flux, v, air_density(sample, model));
        cumulative += rate;

        rows.push(ImpingementRow {
            timestamp: sample.timestamp,
            wind_speed: sample.wind_speed,
            rain_flux: sample.rain_flux,
            rotor_speed_rpm: rpm,
            rotor_speed_capped_rpm: if omega_capped < omega {
                rad_per_sec_to_rpm(omega_capped)
            } else {
                rpm
            },
            relative_tip_speed: v,
            impingement_rate: rate,
            impingement_cumulative: cumulative,
            efficiency_pct: efficiency_pct(cumulative, limit.r_acc_limit, model.power_loss_fraction),
        });
    }

    let series = ImpingementSeries { rows };
    debug!(
        cap_value,
        coating = %coating.coating,
        rows = series.len(),
        capped_rows = series.capped_rows(),
        r_acc_limit = limit.r_acc_limit,
        final_cumulative = series.final_cumulative(),
        "Impingement run complete"
    );

    Ok(ImpingementRun {
        series,
        r_acc_limit: limit.r_acc_limit,
        impact_speed_limit: limit.impact_speed,
        cap_value,
        coating: coating.coating.clone(),
    })
}

fn air_density(sample: &WeatherSample, model: &ModelConfig) -> f64 {
    match sample.air_density {
        Some(rho) if model.use_measured_air_density => rho,
        _ => model.reference_air_density,
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Check a weather series before any computation.
///
/// Rejects empty series, non-increasing timestamps, negative or non-finite
/// wind speed / rain flux, and non-positive air density.
pub fn validate_series(series: &[WeatherSample]) -> Result<()> {
    if series.is_empty() {
        return Err(ErosionError::InvalidInputSeries(
            "weather series is empty".to_string(),
        ));
    }

    for (i, s) in series.iter().enumerate() {
        if !s.wind_speed.is_finite() || s.wind_speed < 0.0 {
            return Err(ErosionError::InvalidInputSeries(format!(
                "row {i} ({}): wind speed {} must be finite and >= 0",
                s.timestamp, s.wind_speed
            )));
        }
        if !s.rain_flux.is_finite() || s.rain_flux < 0.0 {
            return Err(ErosionError::InvalidInputSeries(format!(
                "row {i} ({}): rain flux {} must be finite and >= 0",
                s.timestamp, s.rain_flux
            )));
        }
        if let Some(rho) = s.air_density {
            if !rho.is_finite() || rho <= 0.0 {
                return Err(ErosionError::InvalidInputSeries(format!(
                    "row {i} ({}): air density {rho} must be finite and > 0",
                    s.timestamp
                )));
            }
        }
    }

    if let Some(i) = series
        .windows(2)
        .position(|w| w[1].timestamp <= w[0].timestamp)
    {
        return Err(ErosionError::InvalidInputSeries(format!(
            "timestamps must be strictly increasing ({} follows {})",
            series[i + 1].timestamp,
            series[i].timestamp
        )));
    }

    Ok(())
}

pub(crate) fn validate_cap(cap_value: f64) -> Result<()> {
    if !cap_value.is_finite() || cap_value < 0.0 {
        return Err(ErosionError::InvalidInputSeries(format!(
            "cap value {cap_value} must be finite and >= 0"
        )));
    }
    Ok(())
}

/// Number of gaps between consecutive samples longer than
/// `factor × interval_hours`.
pub fn count_gaps(series: &[WeatherSample], interval_hours: f64, factor: f64) -> usize {
    let max_gap_secs = interval_hours * factor * 3600.0;
    series
        .windows(2)
        .filter(|w| (w[1].timestamp - w[0].timestamp).num_seconds() as f64 > max_gap_secs)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErosionSample, PowerCurve};
    use chrono::{Duration, TimeZone, Utc};

    fn turbine() -> TurbineSpec {
        // Flat 6 rpm rotor up to 9 m/s, rated 7.56 rpm from 10.66 m/s
        let curve = PowerCurve::from_columns(
            &[3.0, 5.0, 7.0, 9.0, 10.66, 15.0, 25.0],
            &[0.0, 1.5e6, 5.0e6, 10.0e6, 15.0e6, 15.0e6, 15.0e6],
            &[6.0, 6.0, 6.0, 6.0, 7.56, 7.56, 7.56],
        )
        .unwrap();
        TurbineSpec::new("IEA 15 240", 120.0, 3.0, 25.0, 10.66, 5.0, 7.56, curve).unwrap()
    }

    fn coating() -> ErosionCurve {
        ErosionCurve::new(
            "GS",
            vec![
                ErosionSample { impingement_volume: 10_000.0, impact_speed: 60.0 },
                ErosionSample { impingement_volume: 2_000.0, impact_speed: 120.0 },
            ],
        )
        .unwrap()
    }

    fn sample(hour: i64, wind: f64, rain: f64) -> WeatherSample {
        let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        WeatherSample::new(t0 + Duration::hours(hour), wind, rain)
    }

    #[test]
    fn test_reference_rain_row() {
        let series = vec![sample(0, 7.0, 1.0)];
        let run = compute_impingement(&series, &turbine(), 200.0, &coating(), &ModelConfig::default())
            .unwrap();

        let row = run.series.rows[0];
        assert!((row.rotor_speed_rpm - 6.0).abs() < 1e-9);
        assert!((rpm_to_rad_per_sec(row.rotor_speed_capped_rpm) - 0.62832).abs() < 1e-5);
        assert!((row.relative_tip_speed - 75.722).abs() < 1e-3);
        assert!((row.impingement_rate - 333.93).abs() < 0.01);
        assert_eq!(row.impingement_cumulative, row.impingement_rate);
    }

    #[test]
    fn test_dry_row_has_no_impingement_and_no_cap() {
        let series = vec![sample(0, 10.0, 0.0)];
        let run = compute_impingement(&series, &turbine(), 1.0, &coating(), &ModelConfig::default())
            .unwrap();

        let row = run.series.rows[0];
        assert_eq!(row.impingement_rate, 0.0);
        assert_eq!(row.rotor_speed_capped_rpm, row.rotor_speed_rpm);
        assert!((row.efficiency_pct - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_cap_reduces_tip_speed_in_rain() {
        let series = vec![sample(0, 12.0, 2.0)];
        let model = ModelConfig::default();
        let loose = compute_impingement(&series, &turbine(), 200.0, &coating(), &model).unwrap();
        let tight = compute_impingement(&series, &turbine(), 60.0, &coating(), &model).unwrap();

        let l = loose.series.rows[0];
        let t = tight.series.rows[0];
        assert!(t.is_capped());
        assert!(!l.is_capped());
        assert!(t.relative_tip_speed < l.relative_tip_speed);
        // omega_max × R equals the cap
        assert!((rpm_to_rad_per_sec(t.rotor_speed_capped_rpm) * 120.0 - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_cap_parks_rotor_in_rain() {
        let series = vec![sample(0, 12.0, 2.0), sample(1, 12.0, 0.0)];
        let run = compute_impingement(&series, &turbine(), 0.0, &coating(), &ModelConfig::default())
            .unwrap();

        assert!((run.series.rows[0].rotor_speed_capped_rpm - 1e-4).abs() < 1e-12);
        assert!((run.series.rows[1].rotor_speed_capped_rpm - 7.56).abs() < 1e-9);
        assert!(run.series.rows.iter().all(|r| r.efficiency_pct.is_finite()));
    }

    #[test]
    fn test_cumulative_and_efficiency_monotonic() {
        let series: Vec<_> = (0..48)
            .map(|h| sample(h, 4.0 + (h % 12) as f64, if h % 5 == 0 { 1.5 } else { 0.0 }))
            .collect();
        let run = compute_impingement(&series, &turbine(), 80.0, &coating(), &ModelConfig::default())
            .unwrap();

        for w in run.series.rows.windows(2) {
            assert!(w[1].impingement_cumulative >= w[0].impingement_cumulative);
            assert!(w[1].efficiency_pct <= w[0].efficiency_pct);
        }
    }

    #[test]
    fn test_measured_density_used_when_enabled() {
        let series = vec![sample(0, 7.0, 1.0).with_air_density(1.0)];
        let mut model = ModelConfig::default();

        let reference = compute_impingement(&series, &turbine(), 200.0, &coating(), &model).unwrap();
        model.use_measured_air_density = true;
        let measured = compute_impingement(&series, &turbine(), 200.0, &coating(), &model).unwrap();

        let ratio = measured.series.rows[0].impingement_rate / reference.series.rows[0].impingement_rate;
        assert!((ratio - 1.0 / 1.225).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_model_config_rejected() {
        let series = vec![sample(0, 7.0, 1.0), sample(1, 8.0, 2.0)];
        let model = ModelConfig {
            reference_air_density: -1.225,
            ..ModelConfig::default()
        };
        let err = compute_impingement(&series, &turbine(), 200.0, &coating(), &model).unwrap_err();
        assert!(err.to_string().contains("reference_air_density"), "{err}");

        let model = ModelConfig {
            power_loss_fraction: f64::NAN,
            ..ModelConfig::default()
        };
        assert!(matches!(
            compute_impingement(&series, &turbine(), 200.0, &coating(), &model),
            Err(ErosionError::InvalidInputSeries(_))
        ));
    }

    #[test]
    fn test_empty_series_rejected() {
        let err = compute_impingement(&[], &turbine(), 80.0, &coating(), &ModelConfig::default())
            .unwrap_err();
        assert!(matches!(err, ErosionError::InvalidInputSeries(_)));
    }

    #[test]
    fn test_unsorted_timestamps_rejected() {
        let series = vec![sample(1, 7.0, 0.0), sample(0, 7.0, 0.0)];
        assert!(matches!(
            validate_series(&series),
            Err(ErosionError::InvalidInputSeries(_))
        ));
    }

    #[test]
    fn test_negative_rain_rejected() {
        let series = vec![sample(0, 7.0, -0.1)];
        assert!(validate_series(&series).is_err());
    }

    #[test]
    fn test_negative_cap_rejected() {
        let series = vec![sample(0, 7.0, 0.0)];
        let err = compute_impingement(&series, &turbine(), -1.0, &coating(), &ModelConfig::default())
            .unwrap_err();
        assert!(matches!(err, ErosionError::InvalidInputSeries(_)));
    }

    #[test]
    fn test_count_gaps() {
        let series = vec![sample(0, 7.0, 0.0), sample(1, 7.0, 0.0), sample(5, 7.0, 0.0), sample(6, 7.0, 0.0)];
        assert_eq!(count_gaps(&series, 1.0, 1.5), 1);
        assert_eq!(count_gaps(&series, 4.0, 1.5), 0);
    }
}
