#![forbid(unsafe_code)]
//! # primerpipe
//!
//! Batch primer design around the `primer3_core` command-line tool, plus a
//! small qPCR plate reformatter.
//!
//! Given a directory of `*.fa.gz` FASTA files and an `identifiers.tsv`
//! naming the sequences to design primers for, a run:
//!
//! 1. splits each FASTA into a **mispriming background** library (everything
//!    not selected) and the **design targets**;
//! 2. writes one primer3 Boulder-IO input per target from the configured
//!    constraints (`pipeline.toml`);
//! 3. runs `primer3_core -format_output` per input, fanned out across a
//!    thread pool;
//! 4. scrapes each report and aggregates the optimal primer pairs into
//!    `optimal_primer.dir/optimal_primers.tsv`.
//!
//! The independent `qpcr` module joins a 384-frame plate layout against a
//! qPCR instrument export on the well coordinate.
//!
//! ## Example
//! ```no_run
//! use primerpipe::report::{parse_report, ColumnLayout};
//! let text = std::fs::read_to_string("primers.dir/gene1.primers").unwrap();
//! let report = parse_report(&text, &ColumnLayout::default()).unwrap();
//! println!("{} -> {}bp product", report.name, report.product_size);
//! ```

pub mod config;
pub mod design;
pub mod pipeline;
pub mod primer3;
pub mod qpcr;
pub mod report;
pub mod seqio;
pub mod split;
pub mod table;

/// Crate version string (from `CARGO_PKG_VERSION`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
