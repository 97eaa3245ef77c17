//! System-wide default constants.
//!
//! Centralises the modelling constants of the impingement pipeline.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Physics
// ============================================================================

/// Reference air density (kg/m³) used when a sample carries no measurement.
pub const REFERENCE_AIR_DENSITY: f64 = 1.225;

/// Seconds per hour, converts the per-second flux product into an hourly rate.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// Density normalisation divisor in the impingement rate formula.
pub const DENSITY_NORMALISATION: f64 = 1000.0;

/// Rain flux (kg/m²/h) above which the tip-speed cap applies.
///
/// The comparison is strict, so 0.0 caps on any rain at all.
pub const RAIN_THRESHOLD: f64 = 0.0;

/// Fraction of power lost once accumulated impingement reaches the coating
/// failure threshold (linear degradation model).
pub const POWER_LOSS_FRACTION: f64 = 0.02;

/// Floor on the capped rotor speed (rpm) when Vtip,max is zero.
///
/// A zero cap parks the rotor during rain; the floor keeps `omega_max`
/// strictly positive so power-curve lookups at the cap stay well defined.
pub const ZERO_CAP_FLOOR_RPM: f64 = 1e-4;

// ============================================================================
// Legacy linear-ramp rotor speed model
// ============================================================================

/// Below this wind speed (m/s) the ramp model parks the rotor.
pub const RAMP_IDLE_WIND_SPEED: f64 = 3.0;

/// Wind speed (m/s) where the ramp from minimum to maximum rotor speed starts.
pub const RAMP_START_WIND_SPEED: f64 = 7.0;

// ============================================================================
// Sweep
// ============================================================================

/// Smallest Vtip,max of the default sweep grid (m/s).
pub const SWEEP_CAP_MIN: f64 = 1.001;

/// Largest Vtip,max of the default sweep grid (m/s).
pub const SWEEP_CAP_MAX: f64 = 100.0;

/// Number of points in the default sweep grid.
pub const SWEEP_CAP_STEPS: usize = 20;

/// Weather sample interval used for energy integration (hours).
pub const SAMPLE_INTERVAL_HOURS: f64 = 1.0;

/// A gap longer than this many sample intervals is reported as a data gap.
pub const GAP_WARNING_FACTOR: f64 = 1.5;

// ============================================================================
// Data sources
// ============================================================================

/// Measurement height suffix used by the weather CSV columns.
pub const MEASUREMENT_HEIGHT: &str = "150.0";

/// Default coating for the erosion-limit lookup.
pub const DEFAULT_COATING: &str = "GS";

/// Default turbine from the catalog.
pub const DEFAULT_TURBINE: &str = "IEA 15 240";

/// Maximum per-row parse errors written to the log while loading a file.
pub const MAX_LOGGED_PARSE_ERRORS: usize = 10;
