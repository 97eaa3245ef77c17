//! Vtip,max Cap Sweep
//!
//! Evaluates energy yield over a grid of rain tip-speed caps and selects
//! the recommended cap.
//!
//! - `aggregator` - per-cap impingement runs and yield integration
//! - `optimal` - recommended cap selection

pub mod aggregator;
pub mod optimal;

pub use aggregator::{cap_grid, sweep_yield};
pub use optimal::{OptimalCapFinder, SweepObjective};
