//! End-to-end pipeline run over a working directory.
//!
//! Stage layout follows the directory convention of the workflow this tool
//! automates:
//!
//! - `mispriming.dir/<stem>.mispriming.lib` — background sequences per FASTA
//! - `input.dir/<name>.input`               — one primer3 request per target
//! - `primers.dir/<name>.primers`           — raw primer3 reports
//! - `optimal_primer.dir/optimal_primers.tsv` — the aggregated table
//!
//! Stages run in sequence; the primer3 invocations inside the third stage
//! fan out across a thread pool. A sequence whose primer3 run or report
//! parse fails is warned about and skipped, and the rest of the batch still
//! reaches the table.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::info;

use crate::config::Settings;
use crate::design::DesignInput;
use crate::primer3;
use crate::report::ColumnLayout;
use crate::seqio::{read_identifiers, FastaRecord};
use crate::split::split_fasta;
use crate::table;

pub const MISPRIMING_DIR: &str = "mispriming.dir";
pub const INPUT_DIR: &str = "input.dir";
pub const PRIMERS_DIR: &str = "primers.dir";
pub const OPTIMAL_DIR: &str = "optimal_primer.dir";
pub const TABLE_FILE: &str = "optimal_primers.tsv";

const FASTA_SUFFIX: &str = ".fa.gz";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub workdir: PathBuf,
    pub config: PathBuf,
    pub identifiers: PathBuf,
    pub threads: Option<usize>,
    pub layout: ColumnLayout,
}

/// The `*.fa.gz` files of the working directory, sorted for a stable run
/// order.
pub fn find_fasta_files(workdir: &Path) -> Result<Vec<PathBuf>> {
    let mut fastas = Vec::new();
    for entry in fs::read_dir(workdir)
        .with_context(|| format!("cannot read working directory {}", workdir.display()))?
    {
        let path = entry?.path();
        if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
            if name.ends_with(FASTA_SUFFIX) {
                fastas.push(path);
            }
        }
    }
    fastas.sort();
    Ok(fastas)
}

/// `x.fa.gz` → `x`.
fn fasta_stem(path: &Path) -> &str {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("input");
    name.strip_suffix(FASTA_SUFFIX).unwrap_or(name)
}

/// Write the design inputs for one batch of targets. Later targets with the
/// same sanitized name overwrite earlier files.
pub fn write_inputs(
    targets: &[FastaRecord],
    settings: &Settings,
    mispriming_lib: &Path,
    input_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::with_capacity(targets.len());
    for rec in targets {
        let input = DesignInput::new(rec, settings, Some(mispriming_lib));
        let path = input_dir.join(input.file_name());
        let mut f = BufWriter::new(
            File::create(&path)
                .with_context(|| format!("cannot create input file {}", path.display()))?,
        );
        f.write_all(input.render().as_bytes())?;
        f.flush()?;
        paths.push(path);
    }
    Ok(paths)
}

pub fn run(opts: &RunOptions) -> Result<()> {
    let workdir = &opts.workdir;
    let settings = Settings::from_path(&opts.config)?;

    let fastas = find_fasta_files(workdir)?;
    if fastas.is_empty() {
        bail!("no *.fa.gz files in {}", workdir.display());
    }

    for dir in [MISPRIMING_DIR, INPUT_DIR, PRIMERS_DIR, OPTIMAL_DIR] {
        fs::create_dir_all(workdir.join(dir))?;
    }

    info!("reading ids for sequences to keep");
    let ids = read_identifiers(&opts.identifiers)?;
    info!("{} identifiers", ids.len());

    let mut inputs = Vec::new();
    for fasta in &fastas {
        info!("collecting sequences from {}", fasta.display());
        let lib = workdir
            .join(MISPRIMING_DIR)
            .join(format!("{}.mispriming.lib", fasta_stem(fasta)));
        let (background, targets) = split_fasta(fasta, &ids, &lib)?;
        info!(
            "{}: {} background sequences, {} design targets",
            fasta.display(),
            background,
            targets.len()
        );
        inputs.extend(write_inputs(&targets, &settings, &lib, &workdir.join(INPUT_DIR))?);
    }

    info!("designing primers for {} sequences", inputs.len());
    let reports = primer3::design_all(&inputs, &workdir.join(PRIMERS_DIR), opts.threads)?;

    let (parsed, skipped) = table::collect_reports(&reports, &opts.layout)?;
    let table_path = workdir.join(OPTIMAL_DIR).join(TABLE_FILE);
    let out = File::create(&table_path)
        .with_context(|| format!("cannot create {}", table_path.display()))?;
    table::write_table(BufWriter::new(out), &parsed)?;
    info!(
        "wrote {} primer sets to {} ({} skipped)",
        parsed.len(),
        table_path.display(),
        skipped
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fasta_discovery_matches_suffix_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.fa.gz", "b.fa.gz", "notes.txt", "c.fasta"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        let found = find_fasta_files(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a.fa.gz", "b.fa.gz"]);
    }

    #[test]
    fn stem_drops_the_double_extension() {
        assert_eq!(fasta_stem(Path::new("work/cdna.fa.gz")), "cdna");
    }

    #[test]
    fn inputs_named_by_sanitized_title_and_overwritten_on_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::from_toml_str(
            "[general]\nprimer_thermodynamics_parameters_path = \"/p\"\n",
        )
        .unwrap();
        let targets = vec![
            FastaRecord { title: "gene one".into(), sequence: "AAAA".into() },
            FastaRecord { title: "gene one".into(), sequence: "CCCC".into() },
        ];
        let paths = write_inputs(
            &targets,
            &settings,
            Path::new("mispriming.dir/x.lib"),
            dir.path(),
        )
        .unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0], paths[1]);
        let text = std::fs::read_to_string(&paths[0]).unwrap();
        // Last record wrote last.
        assert!(text.contains("SEQUENCE_TEMPLATE=CCCC"));
        assert!(text.contains("PRIMER_MISPRIMING_LIBRARY=mispriming.dir/x.lib"));
    }
}
