use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use primerpipe::pipeline::{self, RunOptions};
use primerpipe::qpcr;
use primerpipe::report::ColumnLayout;
use primerpipe::table;

/// Primerpipe CLI
#[derive(Parser)]
#[command(name = "primerpipe")]
#[command(version)]
#[command(about = "Batch primer3 driver and qPCR plate reformatter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full design pipeline over a working directory
    Run {
        /// Working directory holding *.fa.gz inputs
        #[arg(long, default_value = ".")]
        workdir: PathBuf,
        /// Pipeline settings file
        #[arg(long, default_value = "pipeline.toml")]
        config: PathBuf,
        /// Identifier list naming the design targets
        #[arg(long, default_value = "identifiers.tsv")]
        identifiers: PathBuf,
        /// Threads for the primer3 fan-out (0/None = all)
        #[arg(long)]
        threads: Option<usize>,
        /// Token offset of the primer sequence in report lines, for primer3
        /// builds whose -format_output carries an extra column
        #[arg(long)]
        seq_column: Option<usize>,
    },

    /// Parse primer3 report files and print the primer table to stdout
    Parse {
        /// Report files (primer3 -format_output)
        #[arg(required = true)]
        reports: Vec<PathBuf>,
        /// Token offset of the primer sequence in report lines
        #[arg(long)]
        seq_column: Option<usize>,
    },

    /// Join a qPCR instrument export against a plate layout
    Qpcr2table {
        /// Instrument export (tab-separated dump)
        export: PathBuf,
        /// Plate layout (16 rows x 24 tab-separated cells)
        layout: PathBuf,
    },
}

fn column_layout(seq_column: Option<usize>) -> ColumnLayout {
    match seq_column {
        Some(c) => ColumnLayout::with_sequence_column(c),
        None => ColumnLayout::default(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { workdir, config, identifiers, threads, seq_column } => {
            let threads = match threads {
                Some(0) | None => None,
                Some(n) => Some(n),
            };
            pipeline::run(&RunOptions {
                workdir,
                config,
                identifiers,
                threads,
                layout: column_layout(seq_column),
            })
        }

        Commands::Parse { reports, seq_column } => {
            let layout = column_layout(seq_column);
            let (parsed, skipped) = table::collect_reports(&reports, &layout)?;
            table::write_table(io::stdout().lock(), &parsed)?;
            if skipped > 0 {
                eprintln!("{} report(s) skipped", skipped);
            }
            Ok(())
        }

        Commands::Qpcr2table { export, layout } => {
            let layout_f = File::open(&layout)
                .with_context(|| format!("cannot open plate layout {}", layout.display()))?;
            let export_f = File::open(&export)
                .with_context(|| format!("cannot open instrument export {}", export.display()))?;

            let well2sample = qpcr::build_well_to_sample(BufReader::new(layout_f))?;
            let (well2ct, well2gene) = qpcr::build_well_to_value_and_gene(BufReader::new(export_f))?;
            let rows = qpcr::join(&well2sample, &well2ct, &well2gene)?;
            qpcr::write_joined(io::stdout().lock(), &rows)
        }
    }
}
