//! Synthetic Hub-Height Weather
//!
//! Generates a reproducible hourly weather CSV for trying out
//! `blade-erosion` without reanalysis data:
//! - Wind speed: persistent Weibull-distributed series with gaussian jitter
//! - Rain: two-state wet/dry Markov chain with exponential intensities
//! - Air density: gaussian scatter around sea-level density
//!
//! # Usage
//! ```bash
//! synthetic-weather --hours 8760 --seed 7 --output data/weather.csv
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Exp, Normal, Weibull};
use tracing::info;

// ============================================================================
// Climate Constants
// ============================================================================

/// Weibull scale of hub-height wind (m/s)
const WIND_SCALE: f64 = 10.5;
/// Weibull shape of hub-height wind
const WIND_SHAPE: f64 = 2.1;
/// Hour-to-hour persistence of wind speed (0-1)
const WIND_PERSISTENCE: f64 = 0.85;
/// Standard deviation of the hourly wind jitter (m/s)
const WIND_JITTER: f64 = 0.4;

/// Probability that a dry hour is followed by rain
const P_DRY_TO_WET: f64 = 0.06;
/// Probability that a wet hour is followed by a dry one
const P_WET_TO_DRY: f64 = 0.35;
/// Mean rain flux while raining (kg/m²/h)
const MEAN_RAIN_FLUX: f64 = 1.2;

/// Mean / spread of air density (kg/m³)
const AIR_DENSITY_MEAN: f64 = 1.225;
const AIR_DENSITY_STD: f64 = 0.015;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "synthetic-weather")]
#[command(about = "Synthetic hourly hub-height weather for blade-erosion demos")]
#[command(version)]
struct Args {
    /// Number of hourly samples
    #[arg(short = 'H', long, default_value = "8760")]
    hours: u32,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// First timestamp (RFC 3339)
    #[arg(long, default_value = "2020-01-01T00:00:00Z")]
    start: String,

    /// Measurement height suffix used in the column names
    #[arg(long, default_value = "150.0")]
    height: String,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

// ============================================================================
// Generator
// ============================================================================

struct WeatherGenerator {
    rng: StdRng,
    wind: Weibull<f64>,
    jitter: Normal<f64>,
    rain: Exp<f64>,
    density: Normal<f64>,
    wind_speed: f64,
    raining: bool,
}

impl WeatherGenerator {
    fn new(seed: Option<u64>) -> Result<Self> {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let wind = Weibull::new(WIND_SCALE, WIND_SHAPE).map_err(|e| anyhow!("wind distribution: {e}"))?;
        let wind_speed = wind.sample(&mut rng);

        Ok(Self {
            rng,
            wind,
            jitter: Normal::new(0.0, WIND_JITTER).map_err(|e| anyhow!("wind jitter: {e}"))?,
            rain: Exp::new(1.0 / MEAN_RAIN_FLUX).map_err(|e| anyhow!("rain distribution: {e}"))?,
            density: Normal::new(AIR_DENSITY_MEAN, AIR_DENSITY_STD)
                .map_err(|e| anyhow!("density distribution: {e}"))?,
            wind_speed,
            raining: false,
        })
    }

    /// Next hourly `(wind_speed, rain_flux, air_density)`.
    fn step(&mut self) -> (f64, f64, f64) {
        let target = self.wind.sample(&mut self.rng);
        let jitter = self.jitter.sample(&mut self.rng);
        self.wind_speed =
            (WIND_PERSISTENCE * self.wind_speed + (1.0 - WIND_PERSISTENCE) * target + jitter).max(0.0);

        let flip = if self.raining { P_WET_TO_DRY } else { P_DRY_TO_WET };
        if self.rng.gen_bool(flip) {
            self.raining = !self.raining;
        }
        let rain_flux = if self.raining {
            self.rain.sample(&mut self.rng)
        } else {
            0.0
        };

        let density = self.density.sample(&mut self.rng);
        (self.wind_speed, rain_flux, density)
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let start: DateTime<Utc> = DateTime::parse_from_rfc3339(&args.start)
        .with_context(|| format!("invalid --start '{}'", args.start))?
        .with_timezone(&Utc);

    let sink: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(File::create(path).with_context(|| format!("creating {}", path.display()))?),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(sink);

    let h = &args.height;
    writeln!(out, "timestamp,wsp_{h},qrain_{h},rho_{h}")?;

    let mut generator = WeatherGenerator::new(args.seed)?;
    let mut rain_hours = 0u32;
    for i in 0..args.hours {
        let (wind, rain, rho) = generator.step();
        if rain > 0.0 {
            rain_hours += 1;
        }
        let ts = start + Duration::hours(i64::from(i));
        writeln!(
            out,
            "{},{wind:.3},{rain:.4},{rho:.4}",
            ts.format("%Y-%m-%d %H:%M:%S")
        )?;
    }
    out.flush()?;

    info!(
        hours = args.hours,
        rain_hours,
        seed = ?args.seed,
        "Synthetic weather generated"
    );
    Ok(())
}
