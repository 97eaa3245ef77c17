//! Erosion Model Configuration
//!
//! Provides the model, sweep and data-source settings loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `BLADE_EROSION_CONFIG` environment variable (path to TOML file)
//! 2. `erosion_config.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! The config is passed explicitly into the engine; there is no global
//! instance.
//!
//! ```ignore
//! let config = ErosionConfig::load();
//! let run = compute_impingement(&series, &turbine, 80.0, &coating, &config.model)?;
//! ```

mod erosion_config;
pub mod defaults;
pub mod validation;

pub use erosion_config::*;
