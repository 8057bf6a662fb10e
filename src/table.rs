//! The optimal-primer table: one row per successfully parsed report.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::warn;

use crate::report::{parse_report, ColumnLayout, PrimerReport};

/// Column order of `optimal_primers.tsv`.
pub const COLUMNS: [&str; 10] = [
    "name",
    "forward_seq",
    "forward_gc",
    "forward_tm",
    "forward_length",
    "reverse_seq",
    "reverse_gc",
    "reverse_tm",
    "reverse_length",
    "fragment_length",
];

/// Write the header and one tab-separated row per report, in the order
/// given. Zero reports still produces the header.
pub fn write_table<W: Write>(w: W, reports: &[PrimerReport]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b'\t').from_writer(w);
    wtr.write_record(COLUMNS)?;
    for r in reports {
        wtr.write_record([
            r.name.as_str(),
            r.forward.sequence.as_str(),
            r.forward.gc_percent.as_str(),
            r.forward.melting_temp.as_str(),
            r.forward.length_bp.as_str(),
            r.reverse.sequence.as_str(),
            r.reverse.gc_percent.as_str(),
            r.reverse.melting_temp.as_str(),
            r.reverse.length_bp.as_str(),
            r.product_size.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parse every report file, skipping (with a warning) the ones the parser
/// rejects. Returns the parsed reports in input order and the skip count;
/// the caller decides what a non-zero skip count means for the run.
pub fn collect_reports(paths: &[PathBuf], layout: &ColumnLayout) -> Result<(Vec<PrimerReport>, usize)> {
    let mut reports = Vec::new();
    let mut skipped = 0usize;
    for p in paths {
        let text = std::fs::read_to_string(p)
            .with_context(|| format!("cannot read report {}", p.display()))?;
        match parse_report(&text, layout) {
            Ok(r) => reports.push(r),
            Err(e) => {
                warn!("skipping {}: {:#}", p.display(), e);
                skipped += 1;
            }
        }
    }
    Ok((reports, skipped))
}
