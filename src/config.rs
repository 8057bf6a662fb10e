//! Pipeline settings (`pipeline.toml`).
//!
//! The settings document carries two things: the path to primer3's
//! thermodynamics parameter directory and an opaque `[constraints]` table of
//! primer3 constraint values. Constraint values are copied into the design
//! input verbatim; nothing here validates them against primer3's tag set.
//!
//! Settings are immutable after load. Anything decided per run (such as the
//! mispriming library path) is passed explicitly where it is needed rather
//! than written back into this mapping.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Parsed `pipeline.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub general: General,
    /// Opaque primer3 constraints, e.g. `primer_opt_size = 20`. Key order
    /// follows the TOML table and is not part of the contract.
    #[serde(default)]
    pub constraints: toml::Table,
}

#[derive(Debug, Clone, Deserialize)]
pub struct General {
    /// Value for `PRIMER_THERMODYNAMIC_PARAMETERS_PATH` in every design input.
    pub primer_thermodynamics_parameters_path: String,
}

impl Settings {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Settings> {
        let p = path.as_ref();
        let text = fs::read_to_string(p)
            .with_context(|| format!("cannot read settings file {}", p.display()))?;
        Settings::from_toml_str(&text)
            .with_context(|| format!("cannot parse settings file {}", p.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Settings> {
        Ok(toml::from_str(text)?)
    }

    /// Constraint pairs ready for a primer3 input document: key upper-cased,
    /// value rendered verbatim as a string.
    pub fn constraint_pairs(&self) -> Vec<(String, String)> {
        self.constraints
            .iter()
            .map(|(k, v)| (k.to_uppercase(), scalar_str(v)))
            .collect()
    }
}

/// Render a TOML scalar the way it would appear in a `KEY=value` line.
/// `Value::to_string()` would quote strings, which primer3 would reject.
fn scalar_str(v: &toml::Value) -> String {
    match v {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
[general]
primer_thermodynamics_parameters_path = "/opt/primer3/primer3_config/"

[constraints]
primer_opt_size = 20
primer_opt_tm = 60.5
primer_pick_internal_oligo = "0"
"#;

    #[test]
    fn constraint_keys_uppercased_values_verbatim() {
        let s = Settings::from_toml_str(DOC).unwrap();
        let pairs = s.constraint_pairs();
        assert!(pairs.contains(&("PRIMER_OPT_SIZE".to_string(), "20".to_string())));
        assert!(pairs.contains(&("PRIMER_OPT_TM".to_string(), "60.5".to_string())));
        // String values are not quoted in the rendered pair.
        assert!(pairs.contains(&("PRIMER_PICK_INTERNAL_OLIGO".to_string(), "0".to_string())));
    }

    #[test]
    fn missing_constraints_table_is_empty() {
        let s = Settings::from_toml_str(
            "[general]\nprimer_thermodynamics_parameters_path = \"/p\"\n",
        )
        .unwrap();
        assert!(s.constraint_pairs().is_empty());
    }

    #[test]
    fn missing_general_section_is_an_error() {
        assert!(Settings::from_toml_str("[constraints]\nprimer_opt_size = 20\n").is_err());
    }
}
