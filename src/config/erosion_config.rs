//! Erosion Configuration - model constants, sweep grid and data sources as TOML values
//!
//! Each struct implements `Default` with the values in [`super::defaults`],
//! so a missing config file reproduces the reference analysis exactly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "BLADE_EROSION_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "erosion_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an impingement / sweep analysis.
///
/// Load with `ErosionConfig::load()` which searches:
/// 1. `$BLADE_EROSION_CONFIG`
/// 2. `./erosion_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErosionConfig {
    /// Impingement model constants
    #[serde(default)]
    pub model: ModelConfig,

    /// Cap sweep and yield integration
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Input data locations and selections
    #[serde(default)]
    pub data: DataConfig,
}

impl ErosionConfig {
    /// Load configuration using the standard search order:
    /// 1. `$BLADE_EROSION_CONFIG` environment variable
    /// 2. `./erosion_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), turbine = %config.data.turbine, "Loaded erosion config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./erosion_config.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(turbine = %config.data.turbine, "Loaded erosion config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let config = Self::from_toml_str(&contents)
            .map_err(|e| match e {
                ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
                other => other,
            })?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are reported as warnings (with "did you mean?"
    /// suggestions) and never fail the load.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in &super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Erosion config saved");
        Ok(())
    }

    /// Validate all values for internal consistency.
    ///
    /// Rules:
    /// - Every numeric value must be finite
    /// - Rain threshold and zero-cap floor must be non-negative / positive
    /// - Power loss fraction must lie in (0, 1]
    /// - Sweep grid must be non-empty with cap_min <= cap_max
    /// - Sample interval must be positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();
        let m = &self.model;
        let s = &self.sweep;

        for (name, value) in [
            ("model.rain_threshold_kg_m2_h", m.rain_threshold_kg_m2_h),
            ("model.reference_air_density", m.reference_air_density),
            ("model.power_loss_fraction", m.power_loss_fraction),
            ("model.zero_cap_floor_rpm", m.zero_cap_floor_rpm),
            ("model.linear_ramp.idle_wind_speed", m.linear_ramp.idle_wind_speed),
            ("model.linear_ramp.ramp_start_wind_speed", m.linear_ramp.ramp_start_wind_speed),
            ("sweep.cap_min", s.cap_min),
            ("sweep.cap_max", s.cap_max),
            ("sweep.sample_interval_hours", s.sample_interval_hours),
            ("sweep.gap_warning_factor", s.gap_warning_factor),
            ("sweep.min_final_efficiency_pct", s.min_final_efficiency_pct),
        ] {
            Self::check_finite(value, name, &mut errors);
        }

        if m.reference_air_density <= 0.0 {
            errors.push("model.reference_air_density must be > 0 (used as a multiplier)".to_string());
        }
        if m.zero_cap_floor_rpm <= 0.0 {
            errors.push("model.zero_cap_floor_rpm must be > 0".to_string());
        }
        if m.linear_ramp.ramp_start_wind_speed < m.linear_ramp.idle_wind_speed {
            errors.push(format!(
                "model.linear_ramp.ramp_start_wind_speed ({:.2}) must be >= idle_wind_speed ({:.2})",
                m.linear_ramp.ramp_start_wind_speed, m.linear_ramp.idle_wind_speed
            ));
        }

        if s.cap_max < s.cap_min {
            errors.push(format!(
                "sweep.cap_max ({:.3}) must be >= cap_min ({:.3})",
                s.cap_max, s.cap_min
            ));
        }
        if s.cap_steps == 0 {
            errors.push("sweep.cap_steps must be > 0".to_string());
        }
        if s.sample_interval_hours <= 0.0 {
            errors.push("sweep.sample_interval_hours must be > 0".to_string());
        }
        if s.gap_warning_factor < 1.0 {
            errors.push("sweep.gap_warning_factor must be >= 1".to_string());
        }

        if self.data.coating.trim().is_empty() {
            errors.push("data.coating must not be empty".to_string());
        }

        // Physical range validation
        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_finite(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() {
            errors.push(format!("{name}: value must be finite (got {value})"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Model
// ============================================================================

/// How rotor speed is derived from wind speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotorSpeedModel {
    /// Interpolate the turbine's wind-speed → rotor-speed curve (authoritative)
    #[default]
    Curve,
    /// Legacy piecewise-linear ramp between hardcoded wind-speed breakpoints
    LinearRamp,
}

/// Impingement model constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Rain flux above which the tip-speed cap applies (kg/m²/h, strict)
    #[serde(default = "default_rain_threshold")]
    pub rain_threshold_kg_m2_h: f64,

    /// Air density used when a sample has none, or when measured density is ignored (kg/m³)
    #[serde(default = "default_reference_air_density")]
    pub reference_air_density: f64,

    /// Use per-sample air density when the weather series provides it
    #[serde(default)]
    pub use_measured_air_density: bool,

    /// Efficiency lost at the coating failure threshold (fraction)
    #[serde(default = "default_power_loss_fraction")]
    pub power_loss_fraction: f64,

    /// Floor on the capped rotor speed when Vtip,max is zero (rpm)
    #[serde(default = "default_zero_cap_floor")]
    pub zero_cap_floor_rpm: f64,

    #[serde(default)]
    pub rotor_speed_model: RotorSpeedModel,

    #[serde(default)]
    pub linear_ramp: LinearRampConfig,
}

fn default_rain_threshold() -> f64 { defaults::RAIN_THRESHOLD }
fn default_reference_air_density() -> f64 { defaults::REFERENCE_AIR_DENSITY }
fn default_power_loss_fraction() -> f64 { defaults::POWER_LOSS_FRACTION }
fn default_zero_cap_floor() -> f64 { defaults::ZERO_CAP_FLOOR_RPM }

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            rain_threshold_kg_m2_h: default_rain_threshold(),
            reference_air_density: default_reference_air_density(),
            use_measured_air_density: false,
            power_loss_fraction: default_power_loss_fraction(),
            zero_cap_floor_rpm: default_zero_cap_floor(),
            rotor_speed_model: RotorSpeedModel::default(),
            linear_ramp: LinearRampConfig::default(),
        }
    }
}

impl ModelConfig {
    /// First value that would break the impingement computation, if any.
    ///
    /// A subset of `ErosionConfig::validate` for callers that build a
    /// `ModelConfig` directly.
    pub fn check(&self) -> Result<(), String> {
        let finite = [
            ("rain_threshold_kg_m2_h", self.rain_threshold_kg_m2_h),
            ("reference_air_density", self.reference_air_density),
            ("power_loss_fraction", self.power_loss_fraction),
            ("zero_cap_floor_rpm", self.zero_cap_floor_rpm),
            ("linear_ramp.idle_wind_speed", self.linear_ramp.idle_wind_speed),
            ("linear_ramp.ramp_start_wind_speed", self.linear_ramp.ramp_start_wind_speed),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{name} must be finite (got {value})"));
        }
        if self.rain_threshold_kg_m2_h < 0.0 {
            return Err(format!(
                "rain_threshold_kg_m2_h must be >= 0 (got {})",
                self.rain_threshold_kg_m2_h
            ));
        }
        if self.reference_air_density <= 0.0 {
            return Err(format!(
                "reference_air_density must be > 0 (got {})",
                self.reference_air_density
            ));
        }
        if self.power_loss_fraction <= 0.0 || self.power_loss_fraction > 1.0 {
            return Err(format!(
                "power_loss_fraction must lie in (0, 1] (got {})",
                self.power_loss_fraction
            ));
        }
        if self.zero_cap_floor_rpm <= 0.0 {
            return Err(format!(
                "zero_cap_floor_rpm must be > 0 (got {})",
                self.zero_cap_floor_rpm
            ));
        }
        if self.linear_ramp.ramp_start_wind_speed < self.linear_ramp.idle_wind_speed {
            return Err("linear_ramp.ramp_start_wind_speed must be >= idle_wind_speed".to_string());
        }
        Ok(())
    }
}

/// Breakpoints of the legacy linear-ramp rotor speed model.
///
/// Minimum / maximum rotor speed and rated wind speed come from the turbine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRampConfig {
    /// Below this wind speed the rotor is parked (m/s)
    #[serde(default = "default_idle_wind_speed")]
    pub idle_wind_speed: f64,

    /// Wind speed where the ramp to maximum rotor speed begins (m/s)
    #[serde(default = "default_ramp_start_wind_speed")]
    pub ramp_start_wind_speed: f64,
}

fn default_idle_wind_speed() -> f64 { defaults::RAMP_IDLE_WIND_SPEED }
fn default_ramp_start_wind_speed() -> f64 { defaults::RAMP_START_WIND_SPEED }

impl Default for LinearRampConfig {
    fn default() -> Self {
        Self {
            idle_wind_speed: default_idle_wind_speed(),
            ramp_start_wind_speed: default_ramp_start_wind_speed(),
        }
    }
}

// ============================================================================
// Sweep
// ============================================================================

/// Which relation supplies per-sample turbine power in the yield sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerBasis {
    /// Wind speed → power over the full curve
    #[default]
    WindSpeed,
    /// Rotor speed → power over the cut-in/cut-out band
    RotorSpeed,
}

/// How the sweep picks its recommended cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectiveKind {
    /// Highest final yield including erosion loss
    #[default]
    MaxYieldWithErosion,
    /// Highest final yield among caps keeping final efficiency above a floor
    EfficiencyFloor,
}

/// Cap sweep grid and energy integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Smallest Vtip,max in the grid (m/s)
    #[serde(default = "default_cap_min")]
    pub cap_min: f64,

    /// Largest Vtip,max in the grid (m/s)
    #[serde(default = "default_cap_max")]
    pub cap_max: f64,

    /// Number of grid points
    #[serde(default = "default_cap_steps")]
    pub cap_steps: usize,

    /// Sample interval for energy integration (hours)
    #[serde(default = "default_sample_interval")]
    pub sample_interval_hours: f64,

    /// Gaps longer than this many sample intervals are logged
    #[serde(default = "default_gap_warning_factor")]
    pub gap_warning_factor: f64,

    #[serde(default)]
    pub power_basis: PowerBasis,

    #[serde(default)]
    pub objective: ObjectiveKind,

    /// Efficiency floor for `objective = "efficiency_floor"` (%)
    #[serde(default)]
    pub min_final_efficiency_pct: f64,
}

fn default_cap_min() -> f64 { defaults::SWEEP_CAP_MIN }
fn default_cap_max() -> f64 { defaults::SWEEP_CAP_MAX }
fn default_cap_steps() -> usize { defaults::SWEEP_CAP_STEPS }
fn default_sample_interval() -> f64 { defaults::SAMPLE_INTERVAL_HOURS }
fn default_gap_warning_factor() -> f64 { defaults::GAP_WARNING_FACTOR }

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            cap_min: default_cap_min(),
            cap_max: default_cap_max(),
            cap_steps: default_cap_steps(),
            sample_interval_hours: default_sample_interval(),
            gap_warning_factor: default_gap_warning_factor(),
            power_basis: PowerBasis::default(),
            objective: ObjectiveKind::default(),
            min_final_efficiency_pct: 0.0,
        }
    }
}

// ============================================================================
// Data
// ============================================================================

/// Input file locations and selections for the command-line tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Turbine catalog TOML
    #[serde(default = "default_turbine_catalog")]
    pub turbine_catalog: PathBuf,

    /// Wide erosion reference CSV (`<COATING>_X`, `<COATING>_Y`)
    #[serde(default = "default_erosion_table")]
    pub erosion_table: PathBuf,

    /// Weather series CSV
    #[serde(default = "default_weather")]
    pub weather: PathBuf,

    /// Column suffix of the measurement height, e.g. `wsp_150.0`
    #[serde(default = "default_measurement_height")]
    pub measurement_height: String,

    #[serde(default = "default_turbine")]
    pub turbine: String,

    #[serde(default = "default_coating")]
    pub coating: String,
}

fn default_turbine_catalog() -> PathBuf { PathBuf::from("data/turbines.toml") }
fn default_erosion_table() -> PathBuf { PathBuf::from("data/erosion/wpd_datasets_clean.csv") }
fn default_weather() -> PathBuf { PathBuf::from("data/weather.csv") }
fn default_measurement_height() -> String { defaults::MEASUREMENT_HEIGHT.to_string() }
fn default_turbine() -> String { defaults::DEFAULT_TURBINE.to_string() }
fn default_coating() -> String { defaults::DEFAULT_COATING.to_string() }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            turbine_catalog: default_turbine_catalog(),
            erosion_table: default_erosion_table(),
            weather: default_weather(),
            measurement_height: default_measurement_height(),
            turbine: default_turbine(),
            coating: default_coating(),
        }
    }
}
