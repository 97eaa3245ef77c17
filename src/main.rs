//! blade-erosion - rain impingement and Vtip,max cap sweep
//!
//! # Usage
//!
//! ```bash
//! # Impingement series for one tip-speed cap
//! blade-erosion impingement --cap 80 --output impingement.csv
//!
//! # Yield sweep over the configured cap grid
//! blade-erosion sweep --turbine "IEA 3.4 130" --coating 3L
//!
//! # Machine-readable sweep report
//! blade-erosion sweep --json > sweep.json
//! ```
//!
//! # Environment Variables
//!
//! - `BLADE_EROSION_CONFIG`: Path to the TOML config (default: ./erosion_config.toml)
//! - `RUST_LOG`: Logging level (default: info)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use blade_erosion::config::ErosionConfig;
use blade_erosion::{
    cap_grid, compute_impingement, count_gaps, load_weather_csv, sweep_yield, ErosionTable,
    ImpingementRun, OptimalCapFinder, SweepObjective, SweepReport, TurbineCatalog,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "blade-erosion")]
#[command(about = "Rain-droplet impingement and tip-speed cap yield sweep for turbine blades")]
#[command(version)]
struct CliArgs {
    /// Path to the TOML config (otherwise $BLADE_EROSION_CONFIG, then ./erosion_config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the impingement series for a single Vtip,max
    Impingement {
        /// Tip-speed cap during rain (m/s)
        #[arg(long)]
        cap: f64,

        #[command(flatten)]
        inputs: InputArgs,

        /// Write the per-sample series to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sweep Vtip,max and report energy yield with and without erosion loss
    Sweep {
        #[command(flatten)]
        inputs: InputArgs,

        /// Smallest cap in the grid (m/s)
        #[arg(long)]
        cap_min: Option<f64>,

        /// Largest cap in the grid (m/s)
        #[arg(long)]
        cap_max: Option<f64>,

        /// Number of grid points
        #[arg(long)]
        steps: Option<usize>,

        /// Write cumulative yield sequences to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List turbines and coatings available in the reference data
    List {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Print the effective configuration as TOML
    ShowConfig,
}

/// Overrides for the `[data]` config section.
#[derive(Args, Debug, Clone, Default)]
struct InputArgs {
    /// Turbine name from the catalog
    #[arg(long)]
    turbine: Option<String>,

    /// Coating name from the erosion table
    #[arg(long)]
    coating: Option<String>,

    /// Weather CSV
    #[arg(long)]
    weather: Option<PathBuf>,

    /// Measurement height suffix of the weather columns (e.g. 150.0)
    #[arg(long)]
    height: Option<String>,
}

impl InputArgs {
    fn apply(&self, config: &mut ErosionConfig) {
        if let Some(ref t) = self.turbine {
            config.data.turbine = t.clone();
        }
        if let Some(ref c) = self.coating {
            config.data.coating = c.clone();
        }
        if let Some(ref w) = self.weather {
            config.data.weather = w.clone();
        }
        if let Some(ref h) = self.height {
            config.data.measurement_height = h.clone();
        }
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let mut config = match &args.config {
        Some(path) => ErosionConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ErosionConfig::load(),
    };

    match args.command {
        Command::Impingement {
            cap,
            inputs,
            output,
            json,
        } => {
            inputs.apply(&mut config);
            run_impingement(&config, cap, output.as_deref(), json)
        }
        Command::Sweep {
            inputs,
            cap_min,
            cap_max,
            steps,
            output,
            json,
        } => {
            inputs.apply(&mut config);
            if let Some(v) = cap_min {
                config.sweep.cap_min = v;
            }
            if let Some(v) = cap_max {
                config.sweep.cap_max = v;
            }
            if let Some(v) = steps {
                config.sweep.cap_steps = v;
            }
            config.validate().context("invalid sweep overrides")?;
            run_sweep(&config, output.as_deref(), json)
        }
        Command::List { inputs } => {
            inputs.apply(&mut config);
            run_list(&config)
        }
        Command::ShowConfig => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

// ============================================================================
// Inputs
// ============================================================================

struct Inputs {
    turbine: std::sync::Arc<blade_erosion::TurbineSpec>,
    erosion: ErosionTable,
    samples: Vec<blade_erosion::WeatherSample>,
}

fn load_inputs(config: &ErosionConfig) -> Result<Inputs> {
    let data = &config.data;

    let catalog = TurbineCatalog::load(&data.turbine_catalog)
        .with_context(|| format!("loading turbine catalog {}", data.turbine_catalog.display()))?;
    let turbine = catalog.get(&data.turbine).with_context(|| {
        format!("available turbines: {}", catalog.names().join(", "))
    })?;

    let erosion = ErosionTable::load(&data.erosion_table)
        .with_context(|| format!("loading erosion table {}", data.erosion_table.display()))?;

    let weather = load_weather_csv(&data.weather, &data.measurement_height)
        .with_context(|| format!("loading weather {}", data.weather.display()))?;
    if weather.error_rows > 0 {
        warn!(
            error_rows = weather.error_rows,
            skipped_rows = weather.skipped_rows,
            "Some weather rows were dropped"
        );
    }

    Ok(Inputs {
        turbine,
        erosion,
        samples: weather.samples,
    })
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_impingement(config: &ErosionConfig, cap: f64, output: Option<&Path>, json: bool) -> Result<()> {
    let inputs = load_inputs(config)?;
    let coating = inputs.erosion.get(&config.data.coating).with_context(|| {
        format!("available coatings: {}", inputs.erosion.coatings().join(", "))
    })?;

    let gaps = count_gaps(
        &inputs.samples,
        config.sweep.sample_interval_hours,
        config.sweep.gap_warning_factor,
    );
    if gaps > 0 {
        warn!(gaps, "Weather series has sampling gaps");
    }

    let run = compute_impingement(&inputs.samples, &inputs.turbine, cap, coating, &config.model)?;

    if let Some(path) = output {
        write_impingement_csv(path, &run)?;
        info!(file = %path.display(), rows = run.series.len(), "Impingement series written");
    }

    if json {
        let summary = serde_json::json!({
            "turbine": inputs.turbine.name,
            "coating": run.coating,
            "cap_value": run.cap_value,
            "rows": run.series.len(),
            "capped_rows": run.series.capped_rows(),
            "impact_speed_limit": run.impact_speed_limit,
            "r_acc_limit": run.r_acc_limit,
            "final_cumulative": run.series.final_cumulative(),
            "final_efficiency_pct": run.series.final_efficiency_pct(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_impingement_summary(&inputs.turbine.name, &run);
    }
    Ok(())
}

fn run_sweep(config: &ErosionConfig, output: Option<&Path>, json: bool) -> Result<()> {
    let inputs = load_inputs(config)?;
    let coating = inputs.erosion.get(&config.data.coating).with_context(|| {
        format!("available coatings: {}", inputs.erosion.coatings().join(", "))
    })?;

    let caps = cap_grid(config.sweep.cap_min, config.sweep.cap_max, config.sweep.cap_steps);
    let report = sweep_yield(&inputs.samples, &inputs.turbine, &caps, coating, config)?;

    let objective = SweepObjective::from_config(&config.sweep);
    let optimal = OptimalCapFinder::find_optimal(&report, objective);

    if let Some(path) = output {
        write_sweep_csv(path, &report)?;
        info!(file = %path.display(), caps = report.results.len(), "Sweep series written");
    }

    if json {
        let out = serde_json::json!({
            "turbine": inputs.turbine.name,
            "coating": coating.coating,
            "objective": objective,
            "optimal": optimal,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "Cap sweep: {} / coating {} ({} samples, r_acc_limit {:.1} m)",
        inputs.turbine.name,
        coating.coating,
        inputs.samples.len(),
        report.r_acc_limit
    );
    println!("{}", "─".repeat(78));
    println!(
        "{:>10} {:>18} {:>18} {:>12} {:>10}",
        "Vtip,max", "Yield w/ erosion", "Yield no erosion", "Efficiency", "Capped"
    );
    println!(
        "{:>10} {:>18} {:>18} {:>12} {:>10}",
        "(m/s)", "(MWh)", "(MWh)", "(%)", "(rows)"
    );
    println!("{}", "─".repeat(78));
    for r in &report.results {
        let marker = if optimal.is_some_and(|o| o.cap_value == r.cap_value) { " *" } else { "" };
        println!(
            "{:>10.3} {:>18.1} {:>18.1} {:>12.4} {:>10}{}",
            r.cap_value,
            r.cumulative_yield_with_erosion / 1.0e6,
            r.cumulative_yield_without_erosion / 1.0e6,
            r.final_efficiency_pct,
            r.capped_rows,
            marker
        );
    }
    println!("{}", "─".repeat(78));
    match optimal {
        Some(o) => println!(
            "Recommended Vtip,max: {:.3} m/s ({:.1} MWh with erosion, {:.4} % final efficiency)",
            o.cap_value,
            o.cumulative_yield_with_erosion / 1.0e6,
            o.final_efficiency_pct
        ),
        None => println!("No cap satisfies the efficiency floor of {:.2} %", config.sweep.min_final_efficiency_pct),
    }
    Ok(())
}

fn run_list(config: &ErosionConfig) -> Result<()> {
    let catalog = TurbineCatalog::load(&config.data.turbine_catalog)
        .with_context(|| format!("loading turbine catalog {}", config.data.turbine_catalog.display()))?;
    let erosion = ErosionTable::load(&config.data.erosion_table)
        .with_context(|| format!("loading erosion table {}", config.data.erosion_table.display()))?;

    println!("Turbines:");
    for name in catalog.names() {
        let t = catalog.get(name)?;
        println!(
            "  {:<16} radius {:>6.1} m, rotor {:>5.2}-{:<5.2} rpm, rated tip speed {:>6.2} m/s",
            t.name,
            t.radius,
            t.min_rotor_speed,
            t.max_rotor_speed,
            t.rated_tip_speed()
        );
    }
    println!("Coatings:");
    for name in erosion.coatings() {
        let curve = erosion.get(name)?;
        let (lo, hi) = curve.impact_speed_range();
        println!("  {name:<16} {} samples, {lo:.1}-{hi:.1} m/s", curve.samples().len());
    }
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn print_impingement_summary(turbine: &str, run: &ImpingementRun) {
    println!();
    println!("Impingement run: {turbine} / coating {}", run.coating);
    println!("{}", "─".repeat(56));
    println!("  Vtip,max during rain:   {:>12.3} m/s", run.cap_value);
    println!("  Samples:                {:>12}", run.series.len());
    println!("  Capped samples:         {:>12}", run.series.capped_rows());
    println!("  Rated tip speed:        {:>12.3} m/s", run.impact_speed_limit);
    println!("  Coating failure limit:  {:>12.1} m", run.r_acc_limit);
    println!("  Accumulated impingement:{:>12.1} m", run.series.final_cumulative());
    println!("  Final efficiency:       {:>12.4} %", run.series.final_efficiency_pct());
}

fn write_impingement_csv(path: &Path, run: &ImpingementRun) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(
        w,
        "timestamp,wind_speed,rain_flux,rotor_speed_rpm,rotor_speed_capped_rpm,relative_tip_speed,impingement_rate,impingement_cumulative,efficiency_pct"
    )?;
    for r in &run.series.rows {
        writeln!(
            w,
            "{},{},{},{},{},{},{},{},{}",
            r.timestamp.to_rfc3339(),
            r.wind_speed,
            r.rain_flux,
            r.rotor_speed_rpm,
            r.rotor_speed_capped_rpm,
            r.relative_tip_speed,
            r.impingement_rate,
            r.impingement_cumulative,
            r.efficiency_pct
        )?;
    }
    w.flush()?;
    Ok(())
}

fn write_sweep_csv(path: &Path, report: &SweepReport) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "cap_value,row,yield_with_erosion_wh,yield_without_erosion_wh")?;
    for s in &report.series {
        for (i, (with, without)) in s
            .yield_with_erosion
            .iter()
            .zip(&s.yield_without_erosion)
            .enumerate()
        {
            writeln!(w, "{},{},{},{}", s.cap_value, i, with, without)?;
        }
    }
    w.flush()?;
    Ok(())
}
