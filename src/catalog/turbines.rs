//! Turbine catalog loaded from TOML
//!
//! ```toml
//! [[turbine]]
//! name = "IEA 15 240"
//! radius = 120.0
//! cut_in_speed = 3.0
//! cut_out_speed = 25.0
//! rated_wind_speed = 10.66
//! min_rotor_speed = 5.0
//! max_rotor_speed = 7.56
//! power_curve_csv = "IEA_15_powercurve.csv"   # relative to this file
//! power_scale = 1000.0                        # kW -> W
//!
//! [[turbine]]
//! name = "Demo"
//! # ...
//! [turbine.power_curve]
//! wind_speed = [3.0, 10.0, 25.0]
//! power = [0.0, 2.0e6, 2.0e6]
//! rotor_speed = [6.0, 12.0, 12.0]
//! ```
//!
//! A power-curve CSV has wind speed, power and rotor speed in its first
//! three columns; title and header lines are skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{ErosionError, Result};
use crate::sources::{csv_split, parse_cell, SourceError};
use crate::types::{PowerCurve, TurbineSpec};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    turbine: Vec<TurbineEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TurbineEntry {
    name: String,
    radius: f64,
    cut_in_speed: f64,
    cut_out_speed: f64,
    rated_wind_speed: f64,
    min_rotor_speed: f64,
    max_rotor_speed: f64,
    #[serde(default)]
    power_curve: Option<PowerCurveColumns>,
    #[serde(default)]
    power_curve_csv: Option<PathBuf>,
    #[serde(default = "default_power_scale")]
    power_scale: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PowerCurveColumns {
    wind_speed: Vec<f64>,
    power: Vec<f64>,
    rotor_speed: Vec<f64>,
}

fn default_power_scale() -> f64 {
    1.0
}

/// Immutable set of turbine definitions keyed by name.
#[derive(Debug, Clone, Default)]
pub struct TurbineCatalog {
    turbines: BTreeMap<String, Arc<TurbineSpec>>,
}

impl TurbineCatalog {
    /// Build a catalog from already validated turbines.
    ///
    /// Later entries replace earlier ones with the same name.
    pub fn from_specs(specs: impl IntoIterator<Item = TurbineSpec>) -> Self {
        let turbines = specs
            .into_iter()
            .map(|spec| (spec.name.clone(), Arc::new(spec)))
            .collect();
        Self { turbines }
    }

    /// Load a catalog file. Power-curve CSV paths resolve relative to it.
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, SourceError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let catalog = Self::from_toml_str(&contents, base_dir).map_err(|e| match e {
            SourceError::Parse { message, .. } => SourceError::parse(path, message),
            other => other,
        })?;

        info!(
            file = %path.display(),
            turbines = catalog.len(),
            "Turbine catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse catalog TOML; `base_dir` anchors relative `power_curve_csv` paths.
    pub fn from_toml_str(contents: &str, base_dir: &Path) -> std::result::Result<Self, SourceError> {
        let file: CatalogFile =
            toml::from_str(contents).map_err(|e| SourceError::parse("<catalog>", e.to_string()))?;

        let mut turbines = BTreeMap::new();
        for entry in file.turbine {
            let spec = build_spec(entry, base_dir)?;
            if turbines.contains_key(&spec.name) {
                return Err(SourceError::parse(
                    "<catalog>",
                    format!("duplicate turbine name '{}'", spec.name),
                ));
            }
            debug!(
                turbine = %spec.name,
                radius = spec.radius,
                rated_tip_speed = spec.rated_tip_speed(),
                curve_samples = spec.power_curve.len(),
                "Turbine registered"
            );
            turbines.insert(spec.name.clone(), Arc::new(spec));
        }

        Ok(Self { turbines })
    }

    /// Look up a turbine by exact name.
    pub fn get(&self, name: &str) -> Result<Arc<TurbineSpec>> {
        self.turbines
            .get(name)
            .cloned()
            .ok_or_else(|| ErosionError::UnknownTurbine(name.to_string()))
    }

    /// Turbine names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.turbines.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.turbines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turbines.is_empty()
    }
}

fn build_spec(entry: TurbineEntry, base_dir: &Path) -> std::result::Result<TurbineSpec, SourceError> {
    if !entry.power_scale.is_finite() || entry.power_scale <= 0.0 {
        return Err(SourceError::parse(
            "<catalog>",
            format!(
                "turbine '{}': power_scale must be > 0 (got {})",
                entry.name, entry.power_scale
            ),
        ));
    }

    let (wind, power, rotor) = match (entry.power_curve, entry.power_curve_csv) {
        (Some(cols), None) => (cols.wind_speed, cols.power, cols.rotor_speed),
        (None, Some(csv)) => read_power_curve_csv(&base_dir.join(csv))?,
        (Some(_), Some(_)) => {
            return Err(SourceError::parse(
                "<catalog>",
                format!(
                    "turbine '{}': give either power_curve or power_curve_csv, not both",
                    entry.name
                ),
            ))
        }
        (None, None) => {
            return Err(SourceError::parse(
                "<catalog>",
                format!("turbine '{}': missing power_curve", entry.name),
            ))
        }
    };

    let power: Vec<f64> = power.iter().map(|p| p * entry.power_scale).collect();
    let curve = PowerCurve::from_columns(&wind, &power, &rotor)?;

    Ok(TurbineSpec::new(
        entry.name,
        entry.radius,
        entry.cut_in_speed,
        entry.cut_out_speed,
        entry.rated_wind_speed,
        entry.min_rotor_speed,
        entry.max_rotor_speed,
        curve,
    )?)
}

type CurveColumns = (Vec<f64>, Vec<f64>, Vec<f64>);

/// Read wind speed, power and rotor speed from the first three columns.
fn read_power_curve_csv(path: &Path) -> std::result::Result<CurveColumns, SourceError> {
    let contents = fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
    let (columns, dropped) = parse_power_curve_csv(&contents);

    for (line, reason) in &dropped {
        warn!(file = %path.display(), line, reason = %reason, "Power-curve row skipped");
    }
    if columns.0.is_empty() {
        return Err(SourceError::parse(path, "no numeric power-curve rows"));
    }
    debug!(
        file = %path.display(),
        samples = columns.0.len(),
        skipped = dropped.len(),
        "Power curve read"
    );
    Ok(columns)
}

/// Split a power-curve CSV into columns.
///
/// Lines before the first numeric row are title and header lines and are
/// ignored. Any later row that is not three numbers is returned with its
/// line number and the reason it was dropped.
fn parse_power_curve_csv(contents: &str) -> (CurveColumns, Vec<(usize, String)>) {
    let mut wind = Vec::new();
    let mut power = Vec::new();
    let mut rotor = Vec::new();
    let mut dropped = Vec::new();

    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields = csv_split(line);
        let row = (0..3)
            .map(|col| match parse_cell(fields.get(col).map_or("", String::as_str)) {
                Ok(Some(v)) => Ok(v),
                Ok(None) => Err(format!("column {} is empty", col + 1)),
                Err(e) => Err(e),
            })
            .collect::<std::result::Result<Vec<f64>, String>>();

        match row {
            Ok(v) => {
                wind.push(v[0]);
                power.push(v[1]);
                rotor.push(v[2]);
            }
            Err(_) if wind.is_empty() => {}
            Err(reason) => dropped.push((idx + 1, reason)),
        }
    }

    ((wind, power, rotor), dropped)
}
