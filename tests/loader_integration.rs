//! Loader Integration Test
//!
//! Writes catalog, erosion table and weather files to a temp directory,
//! loads them through the public loaders and runs one impingement pass.

use std::fs;
use std::path::Path;

use blade_erosion::config::ModelConfig;
use blade_erosion::{
    compute_impingement, load_weather_csv, ErosionError, ErosionTable, SourceError, TurbineCatalog,
};

const POWER_CURVE_CSV: &str = "\
IEA 3.4 MW reference power curve
Wind speed [m/s],Power [kW],Rotor speed [rpm]
4.0,100,3.8
6.0,700,6.0
8.0,1800,9.5
9.8,3370,12.9
15.0,3370,12.9
25.0,3370,12.9
";

const CATALOG: &str = r#"
[[turbine]]
name = "IEA 3.4 130"
radius = 65.0
cut_in_speed = 4.0
cut_out_speed = 25.0
rated_wind_speed = 9.8
min_rotor_speed = 3.8
max_rotor_speed = 12.9
power_curve_csv = "curves/IEA_3p4_powercurve.csv"
power_scale = 1000.0
"#;

const EROSION: &str = "\
3L_X,3L_Y,GS_X,GS_Y
20000,70,30000,60
8000,90,,
3000,110,5000,120
";

const WEATHER: &str = "\
timestamp,wsp_100.0,wsp_150.0,qrain_150.0,rho_150.0
2020-01-01 00:00:00,7.0,8.0,0.0,1.21
2020-01-01 01:00:00,7.5,,0.2,1.21
2020-01-01 02:00:00,8.0,9.0,0.4,1.20
\"2020-01-01 03:00:00\",8.5,9.5,0.0,
not-a-date,1,1,1,1
2020-01-01 04:00:00,9.0,10.0,1.1,1.19
";

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
fn catalog_resolves_relative_power_curve_csv() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "curves/IEA_3p4_powercurve.csv", POWER_CURVE_CSV);
    write(dir.path(), "turbines.toml", CATALOG);

    let catalog = TurbineCatalog::load(dir.path().join("turbines.toml")).unwrap();
    let t = catalog.get("IEA 3.4 130").unwrap();

    assert_eq!(t.power_curve.len(), 6);
    assert_eq!(t.power_curve.powers()[3], 3.37e6);
    assert!((t.rated_tip_speed() - 12.9 * std::f64::consts::PI / 30.0 * 65.0).abs() < 1e-12);
}

#[test]
fn missing_power_curve_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "turbines.toml", CATALOG);

    let err = TurbineCatalog::load(dir.path().join("turbines.toml")).unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
}

#[test]
fn weather_loader_counts_skipped_and_error_rows() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "weather.csv", WEATHER);

    let load = load_weather_csv(dir.path().join("weather.csv"), "150.0").unwrap();
    assert_eq!(load.samples.len(), 4);
    assert_eq!(load.skipped_rows, 1);
    assert_eq!(load.error_rows, 1);

    assert_eq!(load.samples[0].wind_speed, 8.0);
    assert_eq!(load.samples[0].air_density, Some(1.21));
    assert_eq!(load.samples[2].air_density, None);
}

#[test]
fn weather_loader_missing_height_columns() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "weather.csv", WEATHER);

    let err = load_weather_csv(dir.path().join("weather.csv"), "120.0").unwrap_err();
    assert!(err.to_string().contains("wsp_120.0"));
}

#[test]
fn loaded_inputs_drive_impingement() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "curves/IEA_3p4_powercurve.csv", POWER_CURVE_CSV);
    write(dir.path(), "turbines.toml", CATALOG);
    write(dir.path(), "erosion.csv", EROSION);
    write(dir.path(), "weather.csv", WEATHER);

    let turbine = TurbineCatalog::load(dir.path().join("turbines.toml"))
        .unwrap()
        .get("IEA 3.4 130")
        .unwrap();
    let table = ErosionTable::load(dir.path().join("erosion.csv")).unwrap();
    let weather = load_weather_csv(dir.path().join("weather.csv"), "150.0").unwrap();

    let model = ModelConfig {
        use_measured_air_density: true,
        ..ModelConfig::default()
    };
    let run = compute_impingement(&weather.samples, &turbine, 60.0, table.get("3L").unwrap(), &model)
        .unwrap();

    assert_eq!(run.series.len(), 4);
    assert_eq!(run.coating, "3L");
    assert_eq!(run.series.rows[0].impingement_rate, 0.0);
    assert!(run.series.final_cumulative() > 0.0);

    // GS was tested at 60 and 120 m/s only; rated tip speed ~87.8 m/s is covered
    assert!(compute_impingement(&weather.samples, &turbine, 60.0, table.get("GS").unwrap(), &model).is_ok());
    assert_eq!(
        table.get("GAG20").unwrap_err(),
        ErosionError::UnknownCoating("GAG20".to_string())
    );
}

#[test]
fn erosion_table_keeps_valid_coatings_next_to_a_broken_one() {
    let dir = tempfile::tempdir().unwrap();
    // DUP was digitised with two points at the same impact speed
    write(
        dir.path(),
        "erosion.csv",
        "GS_X,GS_Y,DUP_X,DUP_Y\n30000,60,9000,100\n5000,120,7000,100\n",
    );

    let table = ErosionTable::load(dir.path().join("erosion.csv")).unwrap();
    assert_eq!(table.coatings(), vec!["GS"]);
    assert!(table.get("GS").is_ok());
    assert!(matches!(table.get("DUP"), Err(ErosionError::InvalidCurveData(_))));
}
