//! Cap-sweep yield aggregation
//!
//! Runs one impingement computation per Vtip,max value and integrates the
//! capped power output into cumulative energy yield, with and without the
//! erosion efficiency loss. Cap values are independent and evaluated on
//! the rayon pool.

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::{ErosionConfig, PowerBasis};
use crate::error::{ErosionError, Result};
use crate::physics_engine::{
    cap_angular_speed, compute_impingement, count_gaps, rad_per_sec_to_rpm, validate_series,
    PowerCurveInterpolator,
};
use crate::types::{
    CapSweepResult, CapYieldSeries, ErosionCurve, ImpingementRun, SweepReport, TurbineSpec,
    WeatherSample,
};

/// Evenly spaced cap values from `min` to `max` inclusive.
///
/// `steps == 1` yields `[min]`; `steps == 0` yields nothing.
pub fn cap_grid(min: f64, max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![min],
        n => {
            let step = (max - min) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { max } else { min + step * i as f64 })
                .collect()
        }
    }
}

/// Sweep the rain tip-speed cap and report energy yield for each value.
///
/// Results come back in the order of `cap_values`. Fails on the first
/// invalid input; no partial report is returned.
pub fn sweep_yield(
    series: &[WeatherSample],
    turbine: &TurbineSpec,
    cap_values: &[f64],
    coating: &ErosionCurve,
    config: &ErosionConfig,
) -> Result<SweepReport> {
    if cap_values.is_empty() {
        return Err(ErosionError::InvalidInputSeries(
            "cap value list is empty".to_string(),
        ));
    }
    validate_series(series)?;

    let sweep = &config.sweep;
    let gaps = count_gaps(series, sweep.sample_interval_hours, sweep.gap_warning_factor);
    if gaps > 0 {
        warn!(
            gaps,
            sample_interval_hours = sweep.sample_interval_hours,
            "Weather series has sampling gaps; yield treats every row as one interval"
        );
    }

    info!(
        turbine = %turbine.name,
        coating = %coating.coating,
        caps = cap_values.len(),
        rows = series.len(),
        "Starting cap sweep"
    );

    let interpolator = PowerCurveInterpolator::new(turbine)?;
    // Cap power comes from the rotor speed → power relation
    interpolator.power_by_rotor_speed()?;

    let per_cap: Vec<(CapSweepResult, CapYieldSeries, f64)> = cap_values
        .par_iter()
        .map(|&cap_value| -> Result<(CapSweepResult, CapYieldSeries, f64)> {
            let run = compute_impingement(series, turbine, cap_value, coating, &config.model)?;
            let (result, yields) = integrate_yield(&run, turbine, &interpolator, config)?;
            Ok((result, yields, run.r_acc_limit))
        })
        .collect::<Result<_>>()?;

    let r_acc_limit = per_cap.first().map_or(0.0, |(_, _, limit)| *limit);
    let (results, series): (Vec<_>, Vec<_>) = per_cap
        .into_iter()
        .map(|(result, yields, _)| (result, yields))
        .unzip();

    info!(caps = results.len(), r_acc_limit, "Cap sweep complete");

    Ok(SweepReport {
        results,
        series,
        r_acc_limit,
    })
}

/// Integrate capped power over one impingement run.
fn integrate_yield(
    run: &ImpingementRun,
    turbine: &TurbineSpec,
    interpolator: &PowerCurveInterpolator,
    config: &ErosionConfig,
) -> Result<(CapSweepResult, CapYieldSeries)> {
    let model = &config.model;
    let dt = config.sweep.sample_interval_hours;

    let omega_max = cap_angular_speed(run.cap_value, turbine.radius, model.zero_cap_floor_rpm);
    let p_max = interpolator.power_at(rad_per_sec_to_rpm(omega_max))?.max(0.0);

    let n = run.series.len();
    let mut yield_with_erosion = Vec::with_capacity(n);
    let mut yield_without_erosion = Vec::with_capacity(n);
    let mut with_erosion = 0.0;
    let mut without_erosion = 0.0;
    let mut capped_rows = 0;

    for row in &run.series.rows {
        let uncapped = match config.sweep.power_basis {
            PowerBasis::WindSpeed => interpolator.power_at_wind(row.wind_speed)?,
            PowerBasis::RotorSpeed => interpolator.power_at(row.rotor_speed_rpm)?,
        }
        .max(0.0);

        let power = if row.rain_flux > model.rain_threshold_kg_m2_h && uncapped > p_max {
            capped_rows += 1;
            p_max
        } else {
            uncapped
        };

        without_erosion += power * dt;
        with_erosion += power * row.efficiency_pct / 100.0 * dt;
        yield_without_erosion.push(without_erosion);
        yield_with_erosion.push(with_erosion);
    }

    let result = CapSweepResult {
        cap_value: run.cap_value,
        cumulative_yield_with_erosion: with_erosion,
        cumulative_yield_without_erosion: without_erosion,
        final_efficiency_pct: run.series.final_efficiency_pct(),
        capped_rows,
    };
    let yields = CapYieldSeries {
        cap_value: run.cap_value,
        yield_with_erosion,
        yield_without_erosion,
    };
    Ok((result, yields))
}
