//! Optimal tip-speed cap selection
//!
//! Picks the recommended Vtip,max from a finished sweep:
//! - **MaxYieldWithErosion**: highest final yield including erosion loss
//! - **EfficiencyFloor**: same, restricted to caps that keep the final
//!   efficiency at or above a floor
//!
//! Equal yields resolve toward the lower cap, which erodes the blade less.

use serde::{Deserialize, Serialize};

use crate::config::{ObjectiveKind, SweepConfig};
use crate::types::{CapSweepResult, SweepReport};

/// Selection rule for the recommended cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum SweepObjective {
    #[default]
    MaxYieldWithErosion,
    EfficiencyFloor { min_final_efficiency_pct: f64 },
}

impl SweepObjective {
    pub fn from_config(sweep: &SweepConfig) -> Self {
        match sweep.objective {
            ObjectiveKind::MaxYieldWithErosion => Self::MaxYieldWithErosion,
            ObjectiveKind::EfficiencyFloor => Self::EfficiencyFloor {
                min_final_efficiency_pct: sweep.min_final_efficiency_pct,
            },
        }
    }

    fn admits(&self, result: &CapSweepResult) -> bool {
        match *self {
            Self::MaxYieldWithErosion => true,
            Self::EfficiencyFloor {
                min_final_efficiency_pct,
            } => result.final_efficiency_pct >= min_final_efficiency_pct,
        }
    }
}

/// Recommended cap finder over a sweep report
pub struct OptimalCapFinder;

impl OptimalCapFinder {
    /// Best cap for `objective`, or `None` if no swept cap qualifies.
    pub fn find_optimal(report: &SweepReport, objective: SweepObjective) -> Option<CapSweepResult> {
        report
            .results
            .iter()
            .filter(|r| objective.admits(r))
            .filter(|r| r.cumulative_yield_with_erosion.is_finite())
            .fold(None, |best: Option<&CapSweepResult>, r| match best {
                Some(b) if !Self::beats(r, b) => Some(b),
                _ => Some(r),
            })
            .copied()
    }

    fn beats(candidate: &CapSweepResult, current: &CapSweepResult) -> bool {
        let (c, b) = (
            candidate.cumulative_yield_with_erosion,
            current.cumulative_yield_with_erosion,
        );
        c > b || (c == b && candidate.cap_value < current.cap_value)
    }
}
