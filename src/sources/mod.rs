//! Input data sources
//!
//! File loaders that turn on-disk weather and reference data into the
//! validated types consumed by the physics engine. The engine itself never
//! touches the filesystem.

pub mod weather_csv;

pub use weather_csv::{load_weather_csv, WeatherColumns, WeatherLoad};

use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::error::ErosionError;

/// Errors raised while loading input files.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error(transparent)]
    Curve(#[from] ErosionError),
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// CSV Helpers
// ============================================================================

/// Split a CSV line, honouring double-quoted fields and `""` escapes.
pub(crate) fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Parse a numeric cell.
///
/// `Ok(None)` for empty / `nan` / `null` / `-` cells, `Err` for text that is
/// not a number.
pub(crate) fn parse_cell(raw: &str) -> Result<Option<f64>, String> {
    let s = raw.trim().trim_matches('"');
    if s.is_empty()
        || s.eq_ignore_ascii_case("nan")
        || s.eq_ignore_ascii_case("null")
        || s == "-"
    {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Ok(None),
        Err(_) => Err(format!("'{s}' is not a number")),
    }
}

/// Parse a timestamp in any of the formats found in weather exports.
///
/// Accepts unix epoch seconds (or milliseconds), RFC 3339, ISO 8601 with or
/// without a zone, and day-first `dd/mm/yyyy HH:MM`. Zoneless values are
/// taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let s = raw.trim().trim_matches('"');

    if s.is_empty() || s.eq_ignore_ascii_case("nan") {
        return Err("empty timestamp".to_string());
    }

    if let Ok(epoch) = s.parse::<i64>() {
        let secs = if epoch > 10_000_000_000 { epoch / 1000 } else { epoch };
        return Utc
            .timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| format!("epoch {epoch} out of range"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in &[
        "%Y-%m-%dT%H:%M:%S%.fZ",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.and_utc());
        }
    }

    Err(format!("unrecognised timestamp '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_csv_split_quoted() {
        let fields = csv_split(r#"a,"b,c","say ""hi""",d"#);
        assert_eq!(fields, vec!["a", "b,c", r#"say "hi""#, "d"]);
    }

    #[test]
    fn test_parse_cell_nulls() {
        assert_eq!(parse_cell(""), Ok(None));
        assert_eq!(parse_cell("NaN"), Ok(None));
        assert_eq!(parse_cell(" 1.5 "), Ok(Some(1.5)));
        assert!(parse_cell("abc").is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2020, 3, 4, 5, 0, 0).unwrap();
        for raw in [
            "2020-03-04T05:00:00Z",
            "2020-03-04 05:00:00",
            "2020-03-04 05:00:00+00:00",
            "04/03/2020 05:00",
            "1583298000",
        ] {
            assert_eq!(parse_timestamp(raw).unwrap(), expected, "format {raw}");
        }
    }

    #[test]
    fn test_parse_timestamp_offset_converted() {
        let dt = parse_timestamp("2020-03-04T07:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 5);
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
