//! Parser for `primer3_core -format_output` reports.
//!
//! The report is a human-readable table, so extraction is line-oriented:
//! find the line carrying a known marker, split it on runs of spaces and
//! take tokens at fixed offsets. Two behaviors are contractual:
//!
//! - **Last occurrence wins.** When primer3 prints several candidate pairs,
//!   the values reported come from the last `LEFT PRIMER` / `RIGHT` /
//!   `PRODUCT SIZE` line in the file, not the first or the best-scoring one.
//! - **Explicit failure on a missing marker.** A report with no matching
//!   line yields an error naming the marker; a partially extracted record is
//!   never returned.
//!
//! The token offsets are a brittle contract with the installed primer3
//! build. Release 2.x prints the primer sequence at token 9; builds that add
//! an extra column move it to 10. [`ColumnLayout`] makes the offsets in
//! effect an explicit value so they can be overridden (`--seq-column`)
//! instead of silently misparsing.

use anyhow::{bail, Result};

const NAME_MARKER: &str = "PRIMER PICKING RESULTS FOR ";
const LEFT_MARKER: &str = "LEFT PRIMER";
const RIGHT_MARKER: &str = "RIGHT";
const SIZE_MARKER: &str = "PRODUCT SIZE";

/// Token offsets within a whitespace-split primer line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub length: usize,
    pub tm: usize,
    pub gc: usize,
    pub sequence: usize,
}

impl Default for ColumnLayout {
    /// Layout of primer3 release 2.x `-format_output`:
    /// `LEFT PRIMER <start> <len> <tm> <gc%> <any> <3'> <rep> <seq>`.
    fn default() -> Self {
        ColumnLayout { length: 3, tm: 4, gc: 5, sequence: 9 }
    }
}

impl ColumnLayout {
    /// Default layout with the sequence token moved, for primer3 builds
    /// whose output carries an extra column.
    pub fn with_sequence_column(sequence: usize) -> Self {
        ColumnLayout { sequence, ..Default::default() }
    }
}

/// The four reported fields of one primer. All values are kept as the
/// strings primer3 printed; nothing downstream does arithmetic on them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimerFields {
    pub sequence: String,
    pub gc_percent: String,
    pub melting_temp: String,
    pub length_bp: String,
}

/// One fully parsed report. Only constructed when all nine fields were
/// located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimerReport {
    pub name: String,
    pub product_size: String,
    pub forward: PrimerFields,
    pub reverse: PrimerFields,
}

/// Last line of `text` starting with `prefix`, without its line terminator.
fn last_matching<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.lines().filter(|l| l.starts_with(prefix)).last()
}

/// Split on runs of spaces, discarding the empty tokens between them.
fn tokens(line: &str) -> Vec<&str> {
    line.split(' ').filter(|t| !t.is_empty()).collect()
}

fn token_at<'a>(toks: &[&'a str], idx: usize, marker: &str, field: &str) -> Result<&'a str> {
    match toks.get(idx) {
        Some(t) => Ok(t),
        None => bail!(
            "{} line has {} columns, expected {} at column {} (check the primer3 output format version)",
            marker,
            toks.len(),
            field,
            idx
        ),
    }
}

fn primer_fields(text: &str, marker: &str, layout: &ColumnLayout) -> Result<PrimerFields> {
    let line = match last_matching(text, marker) {
        Some(l) => l,
        None => bail!("no {} line in report", marker),
    };
    let toks = tokens(line);
    Ok(PrimerFields {
        length_bp: token_at(&toks, layout.length, marker, "length")?.to_string(),
        melting_temp: token_at(&toks, layout.tm, marker, "tm")?.to_string(),
        gc_percent: token_at(&toks, layout.gc, marker, "gc%")?.to_string(),
        sequence: token_at(&toks, layout.sequence, marker, "sequence")?.to_string(),
    })
}

fn parse_name(text: &str) -> Result<String> {
    let first = match text.lines().next() {
        Some(l) => l,
        None => bail!("report is empty"),
    };
    match first.strip_prefix(NAME_MARKER) {
        Some(rest) => Ok(rest.to_string()),
        None => bail!("report does not start with {:?}", NAME_MARKER),
    }
}

fn parse_product_size(text: &str) -> Result<String> {
    let line = match last_matching(text, SIZE_MARKER) {
        Some(l) => l,
        None => bail!("no {} line in report", SIZE_MARKER),
    };
    let toks = tokens(line);
    // "PRODUCT SIZE: 189, PAIR ANY_TH COMPL: ..." -> token 2, comma stripped.
    Ok(token_at(&toks, 2, SIZE_MARKER, "size")?
        .trim_end_matches(',')
        .to_string())
}

/// Extract the nine reported fields from one report, or fail naming the
/// first marker that could not be located.
pub fn parse_report(text: &str, layout: &ColumnLayout) -> Result<PrimerReport> {
    Ok(PrimerReport {
        name: parse_name(text)?,
        product_size: parse_product_size(text)?,
        forward: primer_fields(text, LEFT_MARKER, layout)?,
        reverse: primer_fields(text, RIGHT_MARKER, layout)?,
    })
}
