//! Reformat a qPCR instrument export into a per-well table joined against a
//! plate layout.
//!
//! The plate layout is a rectangular grid, rows labeled `A..P` top to
//! bottom, 24 tab-separated cells per row (96- and 384-well plates both fit
//! this frame; a 96-well layout simply leaves rows/columns blank). The
//! instrument export is the machine's tab-separated dump: a metadata
//! preamble and a header row, recognised by their leading token, then one
//! line per well.
//!
//! Joining is keyed on the well coordinate (`"A1"`). Wells with no sample
//! assigned (`"NA"`) are dropped silently; a well with a sample but no
//! measurement is an error, since the two files are expected to describe
//! the same plate.

use std::collections::HashMap;
use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

/// Cell value standing in for "no sample in this well".
pub const NO_SAMPLE: &str = "NA";

/// Row labels of a 384-well plate, top to bottom.
const ROW_LABELS: [char; 16] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P',
];

/// Number of columns every layout row must have.
const PLATE_COLUMNS: usize = 24;

/// Leading strings of instrument-export lines that carry no well data
/// (metadata preamble plus the column-header row).
const SKIP_PREFIXES: [&str; 10] = [
    "Block",
    "Calibration",
    "Chemistry",
    "Experiment",
    "Instrument",
    "Passive",
    "Quantification",
    "Signal",
    "Stage",
    "Well",
];

/// One row of the joined output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRow {
    pub well: String,
    pub sample: String,
    pub ct: String,
    pub gene: String,
}

/// Map every well of the layout to its sample name, in row-major plate
/// order. Empty cells map to [`NO_SAMPLE`]. Any row that does not split
/// into exactly 24 tab-separated cells rejects the whole layout, as does a
/// layout with more than 16 rows.
pub fn build_well_to_sample<R: BufRead>(layout: R) -> Result<Vec<(String, String)>> {
    let mut well2sample = Vec::new();
    for (row, line) in layout.lines().enumerate() {
        let line = line.context("cannot read plate layout")?;
        let Some(label) = ROW_LABELS.get(row) else {
            bail!("plate layout has more than {} rows", ROW_LABELS.len());
        };
        let cells: Vec<&str> = line.trim_end_matches(['\r']).split('\t').collect();
        if cells.len() != PLATE_COLUMNS {
            bail!(
                "plate layout in wrong format: row {} has {} columns, expected {}",
                label,
                cells.len(),
                PLATE_COLUMNS
            );
        }
        for (i, cell) in cells.iter().enumerate() {
            let well = format!("{}{}", label, i + 1);
            let sample = if cell.is_empty() { NO_SAMPLE } else { cell };
            well2sample.push((well, sample.to_string()));
        }
    }
    Ok(well2sample)
}

/// Build the well→Ct and well→gene maps from an instrument export.
/// Preamble/header lines are skipped by prefix; every data line must carry
/// at least the five leading fields (well at 1, gene at 3, Ct at 4).
pub fn build_well_to_value_and_gene<R: BufRead>(
    export: R,
) -> Result<(HashMap<String, String>, HashMap<String, String>)> {
    let mut well2ct = HashMap::new();
    let mut well2gene = HashMap::new();
    for line in export.lines() {
        let line = line.context("cannot read instrument export")?;
        if line.is_empty() || SKIP_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }
        let fields: Vec<&str> = line.trim_end_matches(['\r']).split('\t').collect();
        if fields.len() < 5 {
            bail!("instrument export line has {} fields, expected at least 5: {:?}", fields.len(), line);
        }
        let (well, gene, ct) = (fields[1], fields[3], fields[4]);
        well2ct.insert(well.to_string(), ct.to_string());
        well2gene.insert(well.to_string(), gene.to_string());
    }
    Ok((well2ct, well2gene))
}

/// Join samples to measurements on the well coordinate, keeping plate
/// order. Unassigned wells are dropped; an assigned well missing from the
/// measurements is an error.
pub fn join(
    well2sample: &[(String, String)],
    well2ct: &HashMap<String, String>,
    well2gene: &HashMap<String, String>,
) -> Result<Vec<JoinedRow>> {
    let mut rows = Vec::new();
    for (well, sample) in well2sample {
        if sample == NO_SAMPLE {
            continue;
        }
        let ct = match well2ct.get(well) {
            Some(v) => v,
            None => bail!("well {} has sample {:?} but no Ct value in the instrument export", well, sample),
        };
        let gene = match well2gene.get(well) {
            Some(v) => v,
            None => bail!("well {} has sample {:?} but no gene in the instrument export", well, sample),
        };
        rows.push(JoinedRow {
            well: well.clone(),
            sample: sample.clone(),
            ct: ct.clone(),
            gene: gene.clone(),
        });
    }
    Ok(rows)
}

/// Write the joined table: header, then one tab-separated row per well.
pub fn write_joined<W: Write>(mut w: W, rows: &[JoinedRow]) -> Result<()> {
    writeln!(w, "well\tsample\tCt\tgene")?;
    for r in rows {
        writeln!(w, "{}\t{}\t{}\t{}", r.well, r.sample, r.ct, r.gene)?;
    }
    Ok(())
}
