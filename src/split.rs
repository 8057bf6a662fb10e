//! Partition a FASTA file into the mispriming background and the design
//! targets named by the identifier list.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::seqio::{read_fasta, write_fasta_record, FastaRecord};

/// Single pass over `fasta`: records whose title is not in `ids` are written
/// verbatim to the mispriming library at `mispriming_out`; the rest are the
/// design targets and are returned in file order. An empty id set is legal
/// and yields zero targets.
///
/// Duplicate titles are not deduplicated here; a later target with the same
/// sanitized name will overwrite the earlier one's input file downstream.
pub fn split_fasta<P: AsRef<Path>>(
    fasta: P,
    ids: &HashSet<String>,
    mispriming_out: &Path,
) -> Result<(usize, Vec<FastaRecord>)> {
    let records = read_fasta(fasta)?;

    let out = File::create(mispriming_out)
        .with_context(|| format!("cannot create mispriming library {}", mispriming_out.display()))?;
    let mut out = BufWriter::new(out);

    let mut background = 0usize;
    let mut targets = Vec::new();
    for rec in records {
        if ids.contains(&rec.title) {
            targets.push(rec);
        } else {
            write_fasta_record(&mut out, &rec.title, &rec.sequence)?;
            background += 1;
        }
    }
    out.flush()?;
    Ok((background, targets))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FASTA: &str = ">gene1\nACGT\n>gene2\nTTTT\n>gene3\nGGGG\n";

    #[test]
    fn partitions_on_title_membership() {
        let dir = tempfile::tempdir().unwrap();
        let fa = dir.path().join("in.fa");
        std::fs::write(&fa, FASTA).unwrap();
        let lib = dir.path().join("in.mispriming.lib");

        let ids: HashSet<String> = ["gene2".to_string()].into_iter().collect();
        let (background, targets) = split_fasta(&fa, &ids, &lib).unwrap();

        assert_eq!(background, 2);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].title, "gene2");

        let lib_text = std::fs::read_to_string(&lib).unwrap();
        assert_eq!(lib_text, ">gene1\nACGT\n>gene3\nGGGG\n");
    }

    #[test]
    fn empty_id_set_sends_everything_to_background() {
        let dir = tempfile::tempdir().unwrap();
        let fa = dir.path().join("in.fa");
        std::fs::write(&fa, FASTA).unwrap();
        let lib = dir.path().join("in.mispriming.lib");

        let (background, targets) = split_fasta(&fa, &HashSet::new(), &lib).unwrap();
        assert_eq!(background, 3);
        assert!(targets.is_empty());
    }

    #[test]
    fn duplicate_titles_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let fa = dir.path().join("in.fa");
        std::fs::write(&fa, ">gene1\nAAAA\n>gene1\nCCCC\n").unwrap();
        let lib = dir.path().join("in.mispriming.lib");

        let ids: HashSet<String> = ["gene1".to_string()].into_iter().collect();
        let (_, targets) = split_fasta(&fa, &ids, &lib).unwrap();
        assert_eq!(targets.len(), 2);
    }
}
