//! FASTA IO and identifier-set loading.
//!
//! FASTA files (gzipped or plain, compression sniffed from content) are read
//! with `needletail`. A record's `title` is the whole header line after `>`,
//! which is what the identifier list is matched against.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use needletail::parse_fastx_file;

/// One FASTA record as the pipeline sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub title: String,
    pub sequence: String,
}

/// Read every record of a FASTA file (`.fa` or `.fa.gz`).
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>> {
    let p = path.as_ref();
    let mut reader = parse_fastx_file(p)
        .with_context(|| format!("cannot open FASTA file {}", p.display()))?;
    let mut records = Vec::new();
    while let Some(record) = reader.next() {
        let rec = record.with_context(|| format!("malformed record in {}", p.display()))?;
        records.push(FastaRecord {
            title: String::from_utf8_lossy(rec.id()).to_string(),
            sequence: String::from_utf8_lossy(&rec.seq()).to_string(),
        });
    }
    Ok(records)
}

/// Read the newline-delimited identifier list naming the design targets.
/// Blank lines are ignored; order is irrelevant.
pub fn read_identifiers<P: AsRef<Path>>(path: P) -> Result<HashSet<String>> {
    let p = path.as_ref();
    let text = fs::read_to_string(p)
        .with_context(|| format!("cannot read identifier file {}", p.display()))?;
    Ok(text
        .lines()
        .map(|l| l.trim_end())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

pub fn write_fasta_record<W: Write>(w: &mut W, title: &str, sequence: &str) -> Result<()> {
    writeln!(w, ">{}", title)?;
    writeln!(w, "{}", sequence)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_a_set_without_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("identifiers.tsv");
        std::fs::write(&p, "gene1\ngene2\n\ngene1\n").unwrap();
        let ids = read_identifiers(&p).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("gene1") && ids.contains("gene2"));
    }

    #[test]
    fn fasta_titles_keep_the_whole_header_line() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("t.fa");
        let mut f = std::fs::File::create(&p).unwrap();
        writeln!(f, ">gene1 some description\nACGTACGT\n>gene2\nTTTT").unwrap();
        drop(f);
        let recs = read_fasta(&p).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].title, "gene1 some description");
        assert_eq!(recs[0].sequence, "ACGTACGT");
        assert_eq!(recs[1].title, "gene2");
    }

    #[test]
    fn fasta_record_round_trips_through_writer() {
        let mut buf = Vec::new();
        write_fasta_record(&mut buf, "gene1", "ACGT").unwrap();
        assert_eq!(buf, b">gene1\nACGT\n");
    }
}
