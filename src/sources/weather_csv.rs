//! Hub-height weather CSV loader
//!
//! Reads reanalysis-style exports with one row per sample:
//!
//! ```text
//! timestamp,wsp_150.0,qrain_150.0,rho_150.0
//! 2020-01-01 00:00:00,9.81,0.0,1.22
//! ```
//!
//! Wind speed (`wsp_<h>`, m/s) and rain flux (`qrain_<h>`, kg/m²/h) are
//! required at the configured measurement height; air density (`rho_<h>`,
//! kg/m³) is optional. Other columns are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use super::{csv_split, parse_cell, parse_timestamp, SourceError};
use crate::config::defaults::MAX_LOGGED_PARSE_ERRORS;
use crate::types::WeatherSample;

/// Header names that identify the timestamp column.
const TIMESTAMP_HEADERS: &[&str] = &["timestamp", "time", "datetime", "date"];

/// Loaded weather series plus row accounting.
#[derive(Debug, Clone)]
pub struct WeatherLoad {
    pub samples: Vec<WeatherSample>,
    /// Rows with a missing wind or rain value
    pub skipped_rows: usize,
    /// Rows that could not be parsed
    pub error_rows: usize,
}

/// Column indices resolved from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherColumns {
    pub timestamp: usize,
    pub wind_speed: usize,
    pub rain_flux: usize,
    pub air_density: Option<usize>,
}

impl WeatherColumns {
    /// Resolve columns for `measurement_height` (e.g. `"150.0"`).
    ///
    /// The timestamp column is matched by name; an unnamed first column
    /// (a dataframe index) is used as a fallback.
    pub fn from_header(header: &[String], measurement_height: &str) -> Result<Self, String> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let timestamp = TIMESTAMP_HEADERS
            .iter()
            .find_map(|&name| find(name))
            .or_else(|| header.first().filter(|h| h.trim().is_empty()).map(|_| 0))
            .ok_or_else(|| "no timestamp column".to_string())?;

        let wind_name = format!("wsp_{measurement_height}");
        let rain_name = format!("qrain_{measurement_height}");
        let wind_speed = find(&wind_name).ok_or_else(|| format!("missing column '{wind_name}'"))?;
        let rain_flux = find(&rain_name).ok_or_else(|| format!("missing column '{rain_name}'"))?;
        let air_density = find(&format!("rho_{measurement_height}"));

        Ok(Self {
            timestamp,
            wind_speed,
            rain_flux,
            air_density,
        })
    }
}

/// Load a weather CSV at the given measurement height.
///
/// Rows with missing wind or rain are skipped; rows with unparsable fields
/// are counted as errors (the first few are logged). Fails if the header is
/// unusable or no row survives.
pub fn load_weather_csv(
    path: impl AsRef<Path>,
    measurement_height: &str,
) -> Result<WeatherLoad, SourceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SourceError::io(path, e))?;
    let mut lines = BufReader::new(file).lines();

    let header_line = lines
        .next()
        .ok_or_else(|| SourceError::parse(path, "empty file"))?
        .map_err(|e| SourceError::io(path, e))?;
    let header = csv_split(header_line.trim_start_matches('\u{feff}'));
    let columns = WeatherColumns::from_header(&header, measurement_height)
        .map_err(|message| SourceError::parse(path, message))?;

    let mut samples = Vec::new();
    let mut skipped = 0usize;
    let mut errors = 0usize;

    for (idx, line_result) in lines.enumerate() {
        let line_num = idx + 2;
        let line = line_result.map_err(|e| SourceError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_row(&line, &columns) {
            Ok(Some(sample)) => samples.push(sample),
            Ok(None) => skipped += 1,
            Err(e) => {
                if errors < MAX_LOGGED_PARSE_ERRORS {
                    warn!(file = %path.display(), line = line_num, error = %e, "Weather row parse error");
                }
                errors += 1;
            }
        }
    }

    if samples.is_empty() {
        return Err(SourceError::parse(
            path,
            format!("no valid weather rows ({errors} errors, {skipped} skipped)"),
        ));
    }

    info!(
        file = %path.display(),
        height = measurement_height,
        samples = samples.len(),
        skipped,
        errors,
        has_density = columns.air_density.is_some(),
        "Weather series loaded"
    );

    Ok(WeatherLoad {
        samples,
        skipped_rows: skipped,
        error_rows: errors,
    })
}

fn parse_row(line: &str, columns: &WeatherColumns) -> Result<Option<WeatherSample>, String> {
    let fields = csv_split(line);
    let cell = |idx: usize| fields.get(idx).map_or("", String::as_str);

    let timestamp = parse_timestamp(cell(columns.timestamp))?;
    let wind = parse_cell(cell(columns.wind_speed))?;
    let rain = parse_cell(cell(columns.rain_flux))?;

    let (Some(wind_speed), Some(rain_flux)) = (wind, rain) else {
        return Ok(None);
    };

    let mut sample = WeatherSample::new(timestamp, wind_speed, rain_flux);
    if let Some(idx) = columns.air_density {
        if let Some(rho) = parse_cell(cell(idx))? {
            sample = sample.with_air_density(rho);
        }
    }
    Ok(Some(sample))
}
