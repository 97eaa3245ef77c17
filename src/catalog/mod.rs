//! Reference data catalogs
//!
//! - `TurbineCatalog` - turbine geometry, operating limits and power curves
//! - `ErosionTable` - coating failure curves from rain-erosion tests
//!
//! Both are loaded once and shared read-only across runs.

pub mod erosion_table;
pub mod turbines;

pub use erosion_table::ErosionTable;
pub use turbines::TurbineCatalog;
