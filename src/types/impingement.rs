//! Derived impingement series

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One derived row per weather sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpingementRow {
    pub timestamp: DateTime<Utc>,
    /// Wind speed (m/s)
    pub wind_speed: f64,
    /// Rain flux (kg/m²/h)
    pub rain_flux: f64,
    /// Rotor speed from the rotor-speed model (rpm)
    pub rotor_speed_rpm: f64,
    /// Rotor speed after the rain cap (rpm)
    pub rotor_speed_capped_rpm: f64,
    /// Relative droplet impact speed at the blade tip (m/s)
    pub relative_tip_speed: f64,
    /// Instantaneous impingement rate (m/h)
    pub impingement_rate: f64,
    /// Running impingement total (m)
    pub impingement_cumulative: f64,
    /// Remaining turbine efficiency (%)
    pub efficiency_pct: f64,
}

impl ImpingementRow {
    /// Whether the rain cap reduced rotor speed on this row.
    pub fn is_capped(&self) -> bool {
        self.rotor_speed_capped_rpm < self.rotor_speed_rpm
    }
}

/// Full derived series, same order as the input weather series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpingementSeries {
    pub rows: Vec<ImpingementRow>,
}

impl ImpingementSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&ImpingementRow> {
        self.rows.last()
    }

    /// Total accumulated impingement at the end of the series (m).
    pub fn final_cumulative(&self) -> f64 {
        self.rows.last().map_or(0.0, |r| r.impingement_cumulative)
    }

    /// Efficiency at the end of the series (%).
    pub fn final_efficiency_pct(&self) -> f64 {
        self.rows.last().map_or(100.0, |r| r.efficiency_pct)
    }

    /// Efficiency loss vector, one value per row (%).
    pub fn efficiency_pct(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.efficiency_pct).collect()
    }

    pub fn impingement_cumulative(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.impingement_cumulative).collect()
    }

    /// Number of rows where the rain cap was active.
    pub fn capped_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_capped()).count()
    }
}

/// Result of one `compute_impingement` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpingementRun {
    pub series: ImpingementSeries,
    /// Accumulated impingement at which the coating is expected to fail (m)
    pub r_acc_limit: f64,
    /// Tip speed at rated rotor speed used for the erosion-limit lookup (m/s)
    pub impact_speed_limit: f64,
    /// Vtip,max applied during rain (m/s)
    pub cap_value: f64,
    pub coating: String,
}
