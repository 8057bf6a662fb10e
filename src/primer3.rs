//! Invocation of the external `primer3_core` binary.
//!
//! Each design input becomes one `primer3_core -format_output` run with
//! stdin/stdout redirected to files, the shape of
//! `primer3_core -format_output < x.input > x.primers`. Runs are independent
//! per sequence, so they are fanned out on a rayon pool; one failed or
//! crashed invocation is reported and skipped without aborting the others.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use log::warn;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

pub const PRIMER3_BIN: &str = "primer3_core";

/// Run primer3 once, `input` on stdin, report captured to `output`.
/// The exit status is checked; primer3 failing is not silent.
pub fn run_primer3(input: &Path, output: &Path) -> Result<()> {
    let stdin = File::open(input)
        .with_context(|| format!("cannot open primer3 input {}", input.display()))?;
    let stdout = File::create(output)
        .with_context(|| format!("cannot create report file {}", output.display()))?;
    let status = Command::new(PRIMER3_BIN)
        .arg("-format_output")
        .stdin(stdin)
        .stdout(stdout)
        .status()
        .with_context(|| format!("cannot execute {}", PRIMER3_BIN))?;
    if !status.success() {
        bail!("{} exited with {} for {}", PRIMER3_BIN, status, input.display());
    }
    Ok(())
}

/// Report path for an input file: `<outdir>/<stem>.primers`.
fn report_path(input: &Path, outdir: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("unnamed");
    outdir.join(format!("{stem}.primers"))
}

/// Design primers for every input file, in parallel. Returns the report
/// paths of the successful runs, in input order; failures are logged and
/// dropped so the rest of the batch still completes.
pub fn design_all(inputs: &[PathBuf], outdir: &Path, threads: Option<usize>) -> Result<Vec<PathBuf>> {
    let n = threads.unwrap_or_else(num_cpus::get).max(1);
    let pool = ThreadPoolBuilder::new().num_threads(n).build()?;

    let results: Vec<(PathBuf, Result<()>)> = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| {
                let report = report_path(input, outdir);
                let res = run_primer3(input, &report);
                (report, res)
            })
            .collect()
    });

    let mut reports = Vec::with_capacity(results.len());
    for (report, res) in results {
        match res {
            Ok(()) => reports.push(report),
            Err(e) => warn!("primer design failed: {:#}", e),
        }
    }
    Ok(reports)
}
