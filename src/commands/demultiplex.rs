use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use crate::demux::constants::STATS_FILE_NAME;
use crate::demux::settings::load_settings;
use crate::demux::{
    render_report, BarcodeTable, Demultiplexer, DemuxError, OutputSinkSet, PairedRecords,
    RunConfig, ScorerKind, StatsReport,
};

///////////////////////////////////////////////////////////////////////////////

/// The barcodes file has one barcode per line with an optional second
/// column naming the sample, e.g.
///
/// ```text
/// ATTCGT       A1
/// ATATTC       A2
/// ```
#[derive(Parser, Debug, Clone)]
pub struct DemultiplexCommand {
    // Input FASTQ files
    #[arg(long)]
    r1: PathBuf,
    #[arg(long)]
    r2: PathBuf,

    // Barcodes text file
    #[arg(long)]
    barcodes: PathBuf,

    // Output directory
    #[arg(long, default_value = ".")]
    outdir: PathBuf,

    /// Keep the barcode at the start of each written read
    #[arg(long)]
    no_trim: bool,

    /// Replace output files that already exist
    #[arg(long)]
    overwrite: bool,

    /// Largest Hamming distance that still counts as a match
    #[arg(long)]
    max_mismatches: Option<usize>,

    /// Prepended to every output file name
    #[arg(long)]
    prefix: Option<String>,

    #[arg(long, value_enum)]
    scorer: Option<ScorerKind>,

    /// Largest quality-weighted score that still counts as a match
    #[arg(long)]
    max_score: Option<f64>,

    /// Optional settings file; `DEMUX_*` environment variables override it
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[arg(long, short)]
    verbose: bool,
}

impl DemultiplexCommand {
    fn run_config(&self) -> Result<RunConfig, DemuxError> {
        let mut config = load_settings(self.config.as_deref())?;

        if self.no_trim {
            config.trim = false;
        }
        if self.overwrite {
            config.overwrite = true;
        }
        if let Some(max_mismatches) = self.max_mismatches {
            config.max_mismatches = max_mismatches;
        }
        if let Some(prefix) = &self.prefix {
            config.output_name_prefix = prefix.clone();
        }
        if let Some(scorer) = self.scorer {
            config.scorer = scorer;
        }
        if self.max_score.is_some() {
            config.max_score = self.max_score;
        }

        Ok(config)
    }
}

///////////////////////////////////////////////////////////////////////////////

/// Demultiplexes `r1`/`r2` into `output_dir` and writes the stats file next
/// to the outputs.
pub fn demultiplex(
    r1: &Path,
    r2: &Path,
    barcodes: &Path,
    output_dir: &Path,
    config: &RunConfig,
) -> Result<StatsReport, DemuxError> {
    if !output_dir.is_dir() {
        return Err(DemuxError::OutputDirMissing(output_dir.to_path_buf()));
    }

    let table = BarcodeTable::from_path(barcodes)?;
    let sinks = OutputSinkSet::create(
        output_dir,
        &table,
        &config.output_name_prefix,
        config.overwrite,
    )?;

    info!(
        "Started demultiplexing files {} and {}",
        r1.display(),
        r2.display()
    );
    let pairs = PairedRecords::from_paths(r1, r2)?;
    let summary = Demultiplexer::from_config(&table, config, sinks)?.run(pairs)?;

    let report = StatsReport::build(&summary.counters, &table, &summary.sinks, summary.total_pairs);

    let stats_path = output_dir.join(format!("{}{}", config.output_name_prefix, STATS_FILE_NAME));
    render_report(&report, BufWriter::new(File::create(&stats_path)?))?;
    info!("Stats written to {}", stats_path.display());

    Ok(report)
}

pub fn command(cmd: DemultiplexCommand) -> Result<(), DemuxError> {
    let level = if cmd.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .init();

    let config = cmd.run_config()?;
    let report = demultiplex(&cmd.r1, &cmd.r2, &cmd.barcodes, &cmd.outdir, &config)?;
    render_report(&report, io::stdout().lock())
}
