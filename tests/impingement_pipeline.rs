//! Impingement Pipeline Integration Test
//!
//! Exercises the single-cap path end to end:
//! turbine catalog + erosion table + weather samples -> compute_impingement.

use std::path::Path;

use blade_erosion::config::{ModelConfig, RotorSpeedModel};
use blade_erosion::physics_engine::rpm_to_rad_per_sec;
use blade_erosion::{
    compute_impingement, ErosionError, ErosionTable, TurbineCatalog, TurbineSpec, WeatherSample,
};
use chrono::{Duration, TimeZone, Utc};

const CATALOG: &str = r#"
[[turbine]]
name = "Flat6"
radius = 120.0
cut_in_speed = 3.0
cut_out_speed = 25.0
rated_wind_speed = 10.66
min_rotor_speed = 6.0
max_rotor_speed = 7.56

[turbine.power_curve]
wind_speed = [3.0, 5.0, 7.0, 9.0, 10.66, 15.0, 25.0]
power = [0.0, 1.5e6, 5.0e6, 10.0e6, 15.0e6, 15.0e6, 15.0e6]
rotor_speed = [6.0, 6.0, 6.0, 6.0, 7.56, 7.56, 7.56]
"#;

const EROSION: &str = "\
GS_X,GS_Y,3L_X,3L_Y
12000,60,900,140
6000,90,4000,100
2000,120,,
";

fn turbine() -> std::sync::Arc<TurbineSpec> {
    TurbineCatalog::from_toml_str(CATALOG, Path::new("."))
        .unwrap()
        .get("Flat6")
        .unwrap()
}

fn sample(hour: i64, wind: f64, rain: f64) -> WeatherSample {
    let t0 = Utc.with_ymd_and_hms(2019, 10, 1, 0, 0, 0).unwrap();
    WeatherSample::new(t0 + Duration::hours(hour), wind, rain)
}

#[test]
fn rain_row_matches_hand_calculation() {
    let table = ErosionTable::from_csv_str(EROSION).unwrap();
    let series = vec![sample(0, 7.0, 1.0)];

    let run = compute_impingement(&series, &turbine(), 150.0, table.get("GS").unwrap(), &ModelConfig::default())
        .unwrap();
    let row = run.series.rows[0];

    // omega = 6 rpm * 2pi/60
    assert!((rpm_to_rad_per_sec(row.rotor_speed_capped_rpm) - 0.628_32).abs() < 1e-5);
    // v = sqrt(7^2 + (0.62832 * 120)^2)
    assert!((row.relative_tip_speed - 75.722).abs() < 1e-3, "v = {}", row.relative_tip_speed);
    // rate = 1 * v * 3600 * 1.225 / 1000
    assert!((row.impingement_rate - 333.93).abs() < 0.01, "rate = {}", row.impingement_rate);
    assert_eq!(row.impingement_cumulative, row.impingement_rate);
}

#[test]
fn dry_series_keeps_full_efficiency() {
    let table = ErosionTable::from_csv_str(EROSION).unwrap();
    let series: Vec<_> = (0..24).map(|h| sample(h, 10.0, 0.0)).collect();

    let run = compute_impingement(&series, &turbine(), 1.0, table.get("GS").unwrap(), &ModelConfig::default())
        .unwrap();

    assert_eq!(run.series.final_cumulative(), 0.0);
    assert_eq!(run.series.capped_rows(), 0);
    assert!(run.series.efficiency_pct().iter().all(|&e| (e - 100.0).abs() < 1e-12));
}

#[test]
fn failure_threshold_taken_at_rated_tip_speed() {
    let table = ErosionTable::from_csv_str(EROSION).unwrap();
    let t = turbine();
    let run = compute_impingement(&[sample(0, 8.0, 0.5)], &t, 80.0, table.get("GS").unwrap(), &ModelConfig::default())
        .unwrap();

    // 7.56 rpm at 120 m lies between the 90 and 120 m/s test points
    let v = t.rated_tip_speed();
    assert!((run.impact_speed_limit - v).abs() < 1e-12);
    let expected = 6000.0 + (v - 90.0) / 30.0 * (2000.0 - 6000.0);
    assert!((run.r_acc_limit - expected).abs() < 1e-6);
}

#[test]
fn coating_without_rated_speed_coverage_fails() {
    let table = ErosionTable::from_csv_str(EROSION).unwrap();
    let err = compute_impingement(
        &[sample(0, 8.0, 0.5)],
        &turbine(),
        80.0,
        table.get("3L").unwrap(),
        &ModelConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ErosionError::OutOfRangeLookup { .. }));
}

#[test]
fn linear_ramp_model_is_selectable() {
    let table = ErosionTable::from_csv_str(EROSION).unwrap();
    let model = ModelConfig {
        rotor_speed_model: RotorSpeedModel::LinearRamp,
        ..ModelConfig::default()
    };
    let series = vec![sample(0, 2.0, 0.0), sample(1, 5.0, 0.0), sample(2, 14.0, 0.0)];

    let run = compute_impingement(&series, &turbine(), 80.0, table.get("GS").unwrap(), &model).unwrap();
    let rpm: Vec<f64> = run.series.rows.iter().map(|r| r.rotor_speed_rpm).collect();
    assert_eq!(rpm, vec![0.0, 6.0, 7.56]);
}

#[test]
fn non_increasing_timestamps_fail_whole_run() {
    let table = ErosionTable::from_csv_str(EROSION).unwrap();
    let series = vec![sample(0, 8.0, 0.5), sample(0, 9.0, 0.5)];
    let err = compute_impingement(&series, &turbine(), 80.0, table.get("GS").unwrap(), &ModelConfig::default())
        .unwrap_err();
    assert!(matches!(err, ErosionError::InvalidInputSeries(_)));
}

#[test]
fn efficiency_crosses_loss_fraction_at_threshold() {
    let table = ErosionTable::from_csv_str(EROSION).unwrap();
    let t = turbine();
    // Heavy rain every hour until cumulative passes r_acc_limit
    let series: Vec<_> = (0..200).map(|h| sample(h, 12.0, 5.0)).collect();
    let run = compute_impingement(&series, &t, 200.0, table.get("GS").unwrap(), &ModelConfig::default())
        .unwrap();

    let crossing = run
        .series
        .rows
        .iter()
        .find(|r| r.impingement_cumulative >= run.r_acc_limit)
        .expect("series should exceed the failure threshold");
    assert!(crossing.efficiency_pct <= 98.0 + 1e-9);
    assert!(run.series.final_efficiency_pct() < 98.0);
}

#[test]
fn fixed_speed_rotor_runs_without_rotor_speed_power_relation() {
    let fixed = r#"
[[turbine]]
name = "Fixed15"
radius = 40.0
cut_in_speed = 3.0
cut_out_speed = 25.0
rated_wind_speed = 10.0
min_rotor_speed = 15.0
max_rotor_speed = 15.0

[turbine.power_curve]
wind_speed = [3.0, 10.0, 25.0]
power = [0.0, 2.0e6, 2.0e6]
rotor_speed = [15.0, 15.0, 15.0]
"#;
    let t = TurbineCatalog::from_toml_str(fixed, Path::new("."))
        .unwrap()
        .get("Fixed15")
        .unwrap();
    let table = ErosionTable::from_csv_str(EROSION).unwrap();
    let series = vec![sample(0, 6.0, 0.0), sample(1, 8.0, 1.0)];

    // Rated tip speed 15 rpm at 40 m (~62.8 m/s) is inside the GS test range
    let run = compute_impingement(&series, &t, 100.0, table.get("GS").unwrap(), &ModelConfig::default())
        .unwrap();

    assert!(run.series.rows.iter().all(|r| r.rotor_speed_rpm == 15.0));
    assert_eq!(run.series.capped_rows(), 0);
    assert!(run.series.final_cumulative() > 0.0);
}
