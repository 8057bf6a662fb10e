//! Design-input records: one primer3 Boulder-IO request per target sequence.

use std::path::Path;

use crate::config::Settings;
use crate::seqio::FastaRecord;

/// Make a FASTA title safe as a file name: spaces and `/` become `_`,
/// embedded quotes are dropped.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| *c != '"')
        .map(|c| if c == ' ' || c == '/' { '_' } else { c })
        .collect()
}

/// Everything primer3 needs to design primers for one target sequence.
/// Immutable once built; the mispriming library is an explicit argument
/// rather than a value smuggled through the settings mapping.
#[derive(Debug, Clone)]
pub struct DesignInput {
    pub sequence_id: String,
    pub template: String,
    /// Primer3 tags in emission order, values verbatim from configuration.
    pub constraints: Vec<(String, String)>,
    pub thermo_params_path: String,
}

impl DesignInput {
    pub fn new(record: &FastaRecord, settings: &Settings, mispriming_lib: Option<&Path>) -> Self {
        let mut constraints = settings.constraint_pairs();
        if let Some(lib) = mispriming_lib {
            constraints.push((
                "PRIMER_MISPRIMING_LIBRARY".to_string(),
                lib.display().to_string(),
            ));
        }
        DesignInput {
            sequence_id: record.title.clone(),
            template: record.sequence.clone(),
            constraints,
            thermo_params_path: settings.general.primer_thermodynamics_parameters_path.clone(),
        }
    }

    /// Render the Boulder-IO document `primer3_core` reads on stdin.
    pub fn render(&self) -> String {
        let mut doc = String::new();
        doc.push_str(&format!("SEQUENCE_ID={}\n", self.sequence_id));
        for (key, value) in &self.constraints {
            doc.push_str(&format!("{}={}\n", key, value));
        }
        doc.push_str(&format!("SEQUENCE_TEMPLATE={}\n", self.template));
        doc.push_str(&format!(
            "PRIMER_THERMODYNAMIC_PARAMETERS_PATH={}\n",
            self.thermo_params_path
        ));
        doc.push_str("=\n");
        doc
    }

    /// File name for this input under `input.dir/`.
    pub fn file_name(&self) -> String {
        format!("{}.input", sanitize_title(&self.sequence_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn settings() -> Settings {
        Settings::from_toml_str(
            r#"
[general]
primer_thermodynamics_parameters_path = "/opt/primer3/primer3_config/"

[constraints]
primer_opt_size = 20
"#,
        )
        .unwrap()
    }

    fn record() -> FastaRecord {
        FastaRecord {
            title: "gene1 isoform/2 \"alpha\"".to_string(),
            sequence: "ACGTACGTACGT".to_string(),
        }
    }

    #[test]
    fn sanitize_replaces_separators_and_strips_quotes() {
        assert_eq!(sanitize_title("gene1 isoform/2 \"alpha\""), "gene1_isoform_2_alpha");
        assert_eq!(sanitize_title("plain"), "plain");
    }

    #[test]
    fn render_field_order_and_terminator() {
        let input = DesignInput::new(&record(), &settings(), None);
        let doc = input.render();
        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines[0], "SEQUENCE_ID=gene1 isoform/2 \"alpha\"");
        assert_eq!(lines[1], "PRIMER_OPT_SIZE=20");
        assert_eq!(lines[2], "SEQUENCE_TEMPLATE=ACGTACGTACGT");
        assert_eq!(
            lines[3],
            "PRIMER_THERMODYNAMIC_PARAMETERS_PATH=/opt/primer3/primer3_config/"
        );
        assert_eq!(lines[4], "=");
    }

    #[test]
    fn mispriming_library_is_per_call() {
        let with = DesignInput::new(&record(), &settings(), Some(Path::new("mispriming.dir/x.lib")));
        assert!(with
            .constraints
            .contains(&("PRIMER_MISPRIMING_LIBRARY".to_string(), "mispriming.dir/x.lib".to_string())));
        let without = DesignInput::new(&record(), &settings(), None);
        assert!(!without.constraints.iter().any(|(k, _)| k == "PRIMER_MISPRIMING_LIBRARY"));
    }

    #[test]
    fn input_file_name_is_sanitized() {
        let input = DesignInput::new(&record(), &settings(), None);
        assert_eq!(input.file_name(), "gene1_isoform_2_alpha.input");
    }
}
