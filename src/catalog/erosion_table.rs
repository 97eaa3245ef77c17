//! Coating erosion reference table
//!
//! Wide CSV with one `<COATING>_X` / `<COATING>_Y` column pair per coating:
//! `_X` is the accumulated impingement at failure (m), `_Y` the impact speed
//! (m/s). Columns are ragged: shorter curves leave trailing cells empty.
//! A coating whose samples do not form a valid curve is set aside with a
//! warning; the remaining coatings stay usable.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{ErosionError, Result};
use crate::sources::{csv_split, parse_cell, SourceError};
use crate::types::ErosionCurve;

/// Erosion curves keyed by coating name.
#[derive(Debug, Clone, Default)]
pub struct ErosionTable {
    curves: BTreeMap<String, ErosionCurve>,
    rejected: BTreeMap<String, ErosionError>,
}

impl ErosionTable {
    pub fn from_curves(curves: impl IntoIterator<Item = ErosionCurve>) -> Self {
        Self {
            curves: curves.into_iter().map(|c| (c.coating.clone(), c)).collect(),
            rejected: BTreeMap::new(),
        }
    }

    /// Load the wide reference CSV.
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, SourceError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| SourceError::io(path, e))?;
        let table = Self::from_csv_str(&contents).map_err(|e| match e {
            SourceError::Parse { message, .. } => SourceError::parse(path, message),
            other => other,
        })?;

        info!(
            file = %path.display(),
            coatings = ?table.coatings(),
            rejected = ?table.rejected_coatings(),
            "Erosion table loaded"
        );
        Ok(table)
    }

    /// Parse the wide CSV layout from a string.
    pub fn from_csv_str(contents: &str) -> std::result::Result<Self, SourceError> {
        let mut lines = contents.lines();
        let header = lines
            .next()
            .map(|h| csv_split(h.trim_start_matches('\u{feff}')))
            .ok_or_else(|| SourceError::parse("<erosion table>", "empty file"))?;

        let pairs = coating_columns(&header);
        if pairs.is_empty() {
            return Err(SourceError::parse(
                "<erosion table>",
                "no <COATING>_X / <COATING>_Y column pairs in header",
            ));
        }

        let mut raw: Vec<Vec<(Option<f64>, Option<f64>)>> = vec![Vec::new(); pairs.len()];
        for (idx, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = csv_split(line);
            let cell = |col: usize| -> std::result::Result<Option<f64>, SourceError> {
                parse_cell(fields.get(col).map_or("", String::as_str)).map_err(|e| {
                    SourceError::parse("<erosion table>", format!("line {}: {e}", idx + 2))
                })
            };
            for (slot, (_, x_col, y_col)) in raw.iter_mut().zip(&pairs) {
                slot.push((cell(*x_col)?, cell(*y_col)?));
            }
        }

        let mut curves = BTreeMap::new();
        let mut rejected = BTreeMap::new();
        for ((coating, _, _), samples) in pairs.into_iter().zip(raw) {
            match ErosionCurve::from_raw_pairs(coating.clone(), samples) {
                Ok(curve) => {
                    curves.insert(coating, curve);
                }
                Err(e) => {
                    warn!(coating = %coating, error = %e, "Skipping invalid erosion curve");
                    rejected.insert(coating, e);
                }
            }
        }

        if curves.is_empty() {
            if let Some(e) = rejected.values().next().cloned() {
                return Err(SourceError::Curve(e));
            }
        }

        Ok(Self { curves, rejected })
    }

    /// Curve for a coating by exact name.
    ///
    /// A coating present in the file but rejected while loading returns
    /// the error that rejected it.
    pub fn get(&self, coating: &str) -> Result<&ErosionCurve> {
        if let Some(e) = self.rejected.get(coating) {
            return Err(e.clone());
        }
        self.curves
            .get(coating)
            .ok_or_else(|| ErosionError::UnknownCoating(coating.to_string()))
    }

    /// Coatings found in the file but not usable as curves.
    pub fn rejected_coatings(&self) -> Vec<&str> {
        self.rejected.keys().map(String::as_str).collect()
    }

    /// Coating names in sorted order.
    pub fn coatings(&self) -> Vec<&str> {
        self.curves.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

/// `(coating, x column, y column)` for every complete `_X` / `_Y` pair.
fn coating_columns(header: &[String]) -> Vec<(String, usize, usize)> {
    header
        .iter()
        .enumerate()
        .filter_map(|(x_col, name)| {
            let coating = name.trim().strip_suffix("_X")?;
            let y_name = format!("{coating}_Y");
            let y_col = header.iter().position(|h| h.trim() == y_name)?;
            Some((coating.to_string(), x_col, y_col))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
3L_X,3L_Y,GS_X,GS_Y,ORPHAN_X
900,140,5000,90,1
4000,100,2500,110,
,,1200,130,
";

    #[test]
    fn test_parses_ragged_pairs() {
        let table = ErosionTable::from_csv_str(TABLE).unwrap();
        assert_eq!(table.coatings(), vec!["3L", "GS"]);

        let three_l = table.get("3L").unwrap();
        let speeds: Vec<f64> = three_l.samples().iter().map(|s| s.impact_speed).collect();
        assert_eq!(speeds, vec![100.0, 140.0]);

        assert_eq!(table.get("GS").unwrap().samples().len(), 3);
    }

    #[test]
    fn test_unknown_coating() {
        let table = ErosionTable::from_csv_str(TABLE).unwrap();
        assert_eq!(
            table.get("GAG20").unwrap_err(),
            ErosionError::UnknownCoating("GAG20".to_string())
        );
    }

    #[test]
    fn test_text_cell_is_parse_error() {
        let err = ErosionTable::from_csv_str("GS_X,GS_Y\n1,90\nabc,100\n").unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_invalid_coating_does_not_hide_valid_ones() {
        let csv = "\
GS_X,GS_Y,BAD_X,BAD_Y
5000,90,3000,100
2500,110,2000,100
1200,130,,
";
        let table = ErosionTable::from_csv_str(csv).unwrap();
        assert_eq!(table.coatings(), vec!["GS"]);
        assert_eq!(table.rejected_coatings(), vec!["BAD"]);
        assert_eq!(table.get("GS").unwrap().samples().len(), 3);
        assert!(matches!(table.get("BAD"), Err(ErosionError::InvalidCurveData(_))));
    }

    #[test]
    fn test_all_coatings_invalid_is_error() {
        let err = ErosionTable::from_csv_str("BAD_X,BAD_Y
3000,100
").unwrap_err();
        assert!(matches!(err, SourceError::Curve(ErosionError::InvalidCurveData(_))));
    }

    #[test]
    fn test_header_without_pairs() {
        assert!(ErosionTable::from_csv_str("speed,volume\n1,2\n").is_err());
    }
}
