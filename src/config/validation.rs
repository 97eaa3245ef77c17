//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, "; did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for ErosionConfig.
///
/// Maintained by hand to match the struct hierarchy in erosion_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [model]
        "model",
        "model.rain_threshold_kg_m2_h",
        "model.reference_air_density",
        "model.use_measured_air_density",
        "model.power_loss_fraction",
        "model.zero_cap_floor_rpm",
        "model.rotor_speed_model",
        // [model.linear_ramp]
        "model.linear_ramp",
        "model.linear_ramp.idle_wind_speed",
        "model.linear_ramp.ramp_start_wind_speed",
        // [sweep]
        "sweep",
        "sweep.cap_min",
        "sweep.cap_max",
        "sweep.cap_steps",
        "sweep.sample_interval_hours",
        "sweep.gap_warning_factor",
        "sweep.power_basis",
        "sweep.objective",
        "sweep.min_final_efficiency_pct",
        // [data]
        "data",
        "data.turbine_catalog",
        "data.erosion_table",
        "data.weather",
        "data.measurement_height",
        "data.turbine",
        "data.coating",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist > 3 {
            continue;
        }
        match best {
            // Equal distances resolve alphabetically so suggestions are stable
            Some((best_key, best_dist)) if dist > best_dist || (dist == best_dist && k >= best_key) => {}
            _ => best = Some((k, dist)),
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    let found = walk_toml_keys(&value, "");
    let mut warnings = Vec::new();

    for key in &found {
        if !known.contains(key.as_str()) {
            let suggestion = suggest_correction(key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ValidationWarning {
                field: key.clone(),
                message,
                suggestion,
            });
        }
    }

    warnings
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed ErosionConfig.
///
/// Returns (errors, warnings). Errors are impossible values that must
/// prevent a run; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::ErosionConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let m = &config.model;
    let s = &config.sweep;

    // Rain flux threshold: a negative flux never occurs
    if m.rain_threshold_kg_m2_h < 0.0 {
        errors.push(format!(
            "model.rain_threshold_kg_m2_h = {:.4} cannot be negative",
            m.rain_threshold_kg_m2_h
        ));
    }

    // Power loss is a fraction of rated efficiency
    if m.power_loss_fraction <= 0.0 || m.power_loss_fraction > 1.0 {
        errors.push(format!(
            "model.power_loss_fraction = {:.4} is outside (0, 1]",
            m.power_loss_fraction
        ));
    }

    // Vtip,max cannot be negative
    if s.cap_min < 0.0 {
        errors.push(format!("sweep.cap_min = {:.3} cannot be negative", s.cap_min));
    }

    // Efficiency floor is a percentage
    if !(0.0..=100.0).contains(&s.min_final_efficiency_pct) {
        errors.push(format!(
            "sweep.min_final_efficiency_pct = {:.2} is outside 0-100 %",
            s.min_final_efficiency_pct
        ));
    }

    // Sea-level air is ~1.225 kg/m³; hub-height values stay within 0.9-1.5
    let rho = m.reference_air_density;
    if rho > 0.0 && !(0.9..=1.5).contains(&rho) {
        warnings.push(ValidationWarning {
            field: "model.reference_air_density".to_string(),
            message: format!(
                "reference_air_density = {rho:.3} is outside typical range (0.9-1.5 kg/m³)"
            ),
            suggestion: None,
        });
    }

    // Caps beyond ~150 m/s exceed any production rotor tip speed
    if s.cap_max > 150.0 {
        warnings.push(ValidationWarning {
            field: "sweep.cap_max".to_string(),
            message: format!(
                "cap_max = {:.1} m/s exceeds realistic tip speeds (<= 150 m/s)",
                s.cap_max
            ),
            suggestion: None,
        });
    }

    // Weather reanalysis data is hourly or finer
    if s.sample_interval_hours > 24.0 {
        warnings.push(ValidationWarning {
            field: "sweep.sample_interval_hours".to_string(),
            message: format!(
                "sample_interval_hours = {:.1} is longer than a day",
                s.sample_interval_hours
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErosionConfig;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("coating", "coating"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("coatng", "coating"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [model]
            [model.linear_ramp]
            idle_wind_speed = 3.0
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"model".to_string()));
        assert!(keys.contains(&"model.linear_ramp".to_string()));
        assert!(keys.contains(&"model.linear_ramp.idle_wind_speed".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let warnings = validate_unknown_keys("[model]\npower_los_fraction = 0.02\n");
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("model.power_loss_fraction")
        );
    }

    #[test]
    fn test_unknown_section_produces_warning() {
        let warnings = validate_unknown_keys("[market]\nprice_file = \"prices.csv\"\n");
        assert!(warnings.iter().any(|w| w.field == "market"));
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_physical_range_defaults_clean() {
        let (errors, warnings) = validate_physical_ranges(&ErosionConfig::default());
        assert!(errors.is_empty(), "Defaults should produce no errors: {errors:?}");
        assert!(warnings.is_empty(), "Defaults should produce no warnings: {warnings:?}");
    }

    #[test]
    fn test_negative_rain_threshold_is_error() {
        let mut config = ErosionConfig::default();
        config.model.rain_threshold_kg_m2_h = -0.1;
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("rain_threshold")));
    }

    #[test]
    fn test_power_loss_above_one_is_error() {
        let mut config = ErosionConfig::default();
        config.model.power_loss_fraction = 2.0;
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("power_loss_fraction")));
    }

    #[test]
    fn test_unusual_density_is_warning() {
        let mut config = ErosionConfig::default();
        config.model.reference_air_density = 2.5;
        let (errors, warnings) = validate_physical_ranges(&config);
        assert!(errors.is_empty());
        assert!(warnings.iter().any(|w| w.field == "model.reference_air_density"));
    }
}
