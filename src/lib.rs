//! Blade Erosion: Rain Impingement and Tip-Speed Cap Yield Sweep
//!
//! Estimates leading-edge erosion of a wind-turbine blade from a hub-height
//! weather series and evaluates how a rain-event tip-speed cap (Vtip,max)
//! trades energy yield against erosion-driven efficiency loss.
//!
//! ## Architecture
//!
//! - **Catalog**: turbine definitions and coating erosion curves
//! - **Sources**: weather CSV loading
//! - **Physics Engine**: power-curve interpolation, rotor speed, impingement
//! - **Sweep**: per-cap yield aggregation and recommended cap selection
//!
//! ```ignore
//! let config = ErosionConfig::load();
//! let turbine = TurbineCatalog::load(&config.data.turbine_catalog)?.get("IEA 15 240")?;
//! let table = ErosionTable::load(&config.data.erosion_table)?;
//! let weather = load_weather_csv(&config.data.weather, &config.data.measurement_height)?;
//!
//! let caps = cap_grid(config.sweep.cap_min, config.sweep.cap_max, config.sweep.cap_steps);
//! let report = sweep_yield(&weather.samples, &turbine, &caps, table.get("GS")?, &config)?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod physics_engine;
pub mod sources;
pub mod sweep;
pub mod types;

// Re-export configuration
pub use config::ErosionConfig;

// Re-export errors
pub use error::{ErosionError, Result};
pub use sources::SourceError;

// Re-export commonly used types
pub use types::{
    CapSweepResult, CapYieldSeries, ErosionCurve, ErosionSample, ImpingementRow, ImpingementRun,
    ImpingementSeries, PowerCurve, PowerCurveSample, SweepReport, TurbineSpec, WeatherSample,
};

// Re-export entry points
pub use catalog::{ErosionTable, TurbineCatalog};
pub use physics_engine::{compute_impingement, count_gaps, PowerCurveInterpolator};
pub use sources::{load_weather_csv, WeatherLoad};
pub use sweep::{cap_grid, sweep_yield, OptimalCapFinder, SweepObjective};
