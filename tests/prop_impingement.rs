//! Property-based tests for the impingement engine and power-curve
//! interpolation using proptest.
//!
//! Covers: cumulative impingement monotonicity, efficiency bounds, cap
//! effect on impact speed, and the wind -> power -> wind round trip.

use blade_erosion::config::ModelConfig;
use blade_erosion::physics_engine::{capped_angular_speed, relative_tip_speed, rpm_to_rad_per_sec};
use blade_erosion::{
    compute_impingement, ErosionCurve, ErosionSample, PowerCurve, PowerCurveInterpolator,
    TurbineSpec, WeatherSample,
};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

fn turbine() -> TurbineSpec {
    let curve = PowerCurve::from_columns(
        &[3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 10.66, 12.0, 20.0, 25.0],
        &[0.07e6, 0.8e6, 1.8e6, 3.1e6, 4.9e6, 7.3e6, 10.3e6, 13.5e6, 15.0e6, 15.0e6, 15.0e6, 15.0e6],
        &[5.0, 5.0, 5.0, 5.0, 5.0, 5.73, 6.45, 7.16, 7.56, 7.56, 7.56, 7.56],
    )
    .unwrap();
    TurbineSpec::new("IEA 15 240", 120.0, 3.0, 25.0, 10.66, 5.0, 7.56, curve).unwrap()
}

fn coating() -> ErosionCurve {
    ErosionCurve::new(
        "GS",
        vec![
            ErosionSample { impingement_volume: 40_000.0, impact_speed: 60.0 },
            ErosionSample { impingement_volume: 6_000.0, impact_speed: 120.0 },
        ],
    )
    .unwrap()
}

fn to_series(rows: &[(f64, f64)]) -> Vec<WeatherSample> {
    let t0 = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    rows.iter()
        .enumerate()
        .map(|(i, &(wind, rain))| WeatherSample::new(t0 + Duration::hours(i as i64), wind, rain))
        .collect()
}

fn weather_rows() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec(
        (0.0f64..30.0, prop_oneof![Just(0.0f64), 0.0f64..8.0]),
        1..120,
    )
}

// ── Impingement Series Properties ────────────────────────────────────

proptest! {
    /// Cumulative impingement never decreases and starts at the first rate.
    #[test]
    fn cumulative_is_non_decreasing(rows in weather_rows(), cap in 0.0f64..150.0) {
        let run = compute_impingement(&to_series(&rows), &turbine(), cap, &coating(), &ModelConfig::default())
            .unwrap();

        let first = run.series.rows[0];
        prop_assert_eq!(first.impingement_cumulative, first.impingement_rate);
        for w in run.series.rows.windows(2) {
            prop_assert!(w[1].impingement_cumulative >= w[0].impingement_cumulative);
            prop_assert!(w[1].impingement_rate >= 0.0);
        }
    }

    /// Efficiency is 100 % with nothing accumulated and never rises.
    #[test]
    fn efficiency_non_increasing(rows in weather_rows(), cap in 0.0f64..150.0) {
        let run = compute_impingement(&to_series(&rows), &turbine(), cap, &coating(), &ModelConfig::default())
            .unwrap();

        for r in &run.series.rows {
            prop_assert!(r.efficiency_pct <= 100.0 + 1e-12);
            if r.impingement_cumulative == 0.0 {
                prop_assert!((r.efficiency_pct - 100.0).abs() < 1e-12);
            }
        }
        for w in run.series.rows.windows(2) {
            prop_assert!(w[1].efficiency_pct <= w[0].efficiency_pct);
        }
    }

    /// A tighter cap never yields more accumulated impingement.
    #[test]
    fn tighter_cap_never_erodes_more(rows in weather_rows(), a in 0.0f64..150.0, b in 0.0f64..150.0) {
        let (tight, loose) = if a <= b { (a, b) } else { (b, a) };
        let series = to_series(&rows);
        let model = ModelConfig::default();
        let t = compute_impingement(&series, &turbine(), tight, &coating(), &model).unwrap();
        let l = compute_impingement(&series, &turbine(), loose, &coating(), &model).unwrap();

        prop_assert!(t.series.final_cumulative() <= l.series.final_cumulative() + 1e-9);
    }
}

// ── Per-Row Physics Properties ───────────────────────────────────────

proptest! {
    /// Capping never increases the relative impact speed while it rains.
    #[test]
    fn cap_never_increases_tip_speed(
        wind in 0.0f64..30.0,
        rpm in 0.0f64..15.0,
        rain in 0.001f64..10.0,
        omega_max in 0.0f64..2.0,
    ) {
        let omega = rpm_to_rad_per_sec(rpm);
        let capped = capped_angular_speed(omega, omega_max, rain, 0.0);
        prop_assert!(capped <= omega);
        prop_assert!(relative_tip_speed(wind, capped, 120.0) <= relative_tip_speed(wind, omega, 120.0));
    }

    /// Without rain the cap has no effect.
    #[test]
    fn dry_rows_are_never_capped(rpm in 0.0f64..15.0, omega_max in 0.0f64..2.0) {
        let omega = rpm_to_rad_per_sec(rpm);
        prop_assert_eq!(capped_angular_speed(omega, omega_max, 0.0, 0.0), omega);
    }
}

// ── Power Curve Round Trip ───────────────────────────────────────────

proptest! {
    /// wind -> power -> wind recovers the wind speed on the rising segment.
    #[test]
    fn wind_power_round_trip(wind in 3.01f64..10.66) {
        let interp = PowerCurveInterpolator::new(&turbine()).unwrap();
        let power = interp.power_at_wind(wind).unwrap();
        // Inverse covers cut-in < w <= rated knots only
        prop_assume!(power >= 0.8e6);
        let back = interp.wind_speed_at_power(power).unwrap();
        prop_assert!((back - wind).abs() < 1e-9, "wind {} -> {} W -> {}", wind, power, back);
    }
}
