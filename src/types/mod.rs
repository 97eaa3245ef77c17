//! Shared data structures for the impingement / yield pipeline
//!
//! - `WeatherSample`: input time series rows
//! - `TurbineSpec` / `PowerCurve`: static turbine parameters
//! - `ErosionCurve`: coating failure reference curves
//! - `ImpingementSeries` / `ImpingementRun`: impingement engine outputs
//! - `CapSweepResult` / `SweepReport`: yield aggregator outputs

mod erosion;
mod impingement;
mod sweep;
mod turbine;
mod weather;

pub use erosion::*;
pub use impingement::*;
pub use sweep::*;
pub use turbine::*;
pub use weather::*;
