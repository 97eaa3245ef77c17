//! Cap-sweep yield results

use serde::{Deserialize, Serialize};

/// Summary for one swept cap value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapSweepResult {
    /// Vtip,max during rain (m/s)
    pub cap_value: f64,
    /// Final energy yield including efficiency loss (Wh)
    pub cumulative_yield_with_erosion: f64,
    /// Final energy yield ignoring efficiency loss (Wh)
    pub cumulative_yield_without_erosion: f64,
    /// Efficiency at the end of the series (%)
    pub final_efficiency_pct: f64,
    /// Rows where the rain cap bound the power output
    pub capped_rows: usize,
}

impl CapSweepResult {
    /// Energy lost to erosion at the end of the series (Wh).
    pub fn erosion_loss(&self) -> f64 {
        self.cumulative_yield_without_erosion - self.cumulative_yield_with_erosion
    }
}

/// Cumulative yield sequences for one cap value, one entry per sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapYieldSeries {
    pub cap_value: f64,
    /// Cumulative yield including efficiency loss (Wh)
    pub yield_with_erosion: Vec<f64>,
    /// Cumulative yield ignoring efficiency loss (Wh)
    pub yield_without_erosion: Vec<f64>,
}

/// Full sweep output, ordered like the requested cap values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub results: Vec<CapSweepResult>,
    pub series: Vec<CapYieldSeries>,
    /// Coating failure threshold shared by every run (m)
    pub r_acc_limit: f64,
}

impl SweepReport {
    /// Result for an exact cap value, if it was swept.
    pub fn result_for(&self, cap_value: f64) -> Option<&CapSweepResult> {
        self.results.iter().find(|r| r.cap_value == cap_value)
    }

    /// Cumulative sequences for an exact cap value, if it was swept.
    pub fn series_for(&self, cap_value: f64) -> Option<&CapYieldSeries> {
        self.series.iter().find(|s| s.cap_value == cap_value)
    }
}
