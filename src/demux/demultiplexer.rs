//! Streams read pairs through the classifier into per-sample outputs.

use tracing::{debug, info};

use crate::demux::barcodes::BarcodeTable;
use crate::demux::classifier::{classify, MatchResult};
use crate::demux::constants::PROGRESS_INTERVAL;
use crate::demux::error::DemuxError;
use crate::demux::reader::ReadPair;
use crate::demux::scorer::Scorer;
use crate::demux::settings::RunConfig;
use crate::demux::sinks::{OutputSinkSet, SinkPaths};

/// Matched pair counts per sample, in barcode table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCounters {
    names: Vec<String>,
    counts: Vec<u64>,
}

impl SampleCounters {
    pub fn new(table: &BarcodeTable) -> Self {
        Self {
            names: table.all().iter().map(|b| b.name.clone()).collect(),
            counts: vec![0; table.len()],
        }
    }

    fn increment(&mut self, index: usize) {
        self.counts[index] += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub counters: SampleCounters,
    pub total_pairs: u64,
    pub sinks: Vec<SinkPaths>,
}

/// Owns the outputs for one run; they are closed when the run ends,
/// whether it succeeds or not.
pub struct Demultiplexer<'a> {
    table: &'a BarcodeTable,
    scorer: Box<dyn Scorer>,
    max_distance: Option<f64>,
    trim: bool,
    sinks: OutputSinkSet,
}

impl<'a> Demultiplexer<'a> {
    /// `sinks` must hold one output per barcode of `table`, in table order.
    pub fn new(
        table: &'a BarcodeTable,
        scorer: Box<dyn Scorer>,
        max_distance: Option<f64>,
        trim: bool,
        sinks: OutputSinkSet,
    ) -> Result<Self, DemuxError> {
        if sinks.len() != table.len() {
            return Err(DemuxError::SinkCountMismatch {
                barcodes: table.len(),
                sinks: sinks.len(),
            });
        }

        Ok(Self {
            table,
            scorer,
            max_distance,
            trim,
            sinks,
        })
    }

    pub fn from_config(
        table: &'a BarcodeTable,
        config: &RunConfig,
        sinks: OutputSinkSet,
    ) -> Result<Self, DemuxError> {
        Self::new(
            table,
            config.scorer.build(config.quality_prefix_len),
            config.threshold(),
            config.trim,
            sinks,
        )
    }

    /// Consumes `pairs` in a single pass. Unmatched pairs are dropped and
    /// not counted. The first error stops the run.
    pub fn run<I>(mut self, pairs: I) -> Result<RunSummary, DemuxError>
    where
        I: IntoIterator<Item = Result<ReadPair, DemuxError>>,
    {
        let mut counters = SampleCounters::new(self.table);
        let mut total_pairs: u64 = 0;

        for pair in pairs {
            let pair = pair?;
            total_pairs += 1;

            let result = classify(&pair, self.table, self.scorer.as_ref(), self.max_distance)?;
            match result {
                MatchResult::Match { index, barcode, .. } => {
                    debug!("{} -> {} (distance {})", pair.id(), barcode.name, result.distance());
                    if self.trim {
                        self.sinks.write(index, &pair.trimmed(barcode.len()))?;
                    } else {
                        self.sinks.write(index, &pair)?;
                    }
                    counters.increment(index);
                }
                MatchResult::NoMatch { .. } => {
                    debug!("{} unmatched (best distance {})", pair.id(), result.distance());
                }
            }

            if total_pairs % PROGRESS_INTERVAL == 0 {
                info!("Processed {} pairs", total_pairs);
            }
        }

        let sinks = self.sinks.finish()?;
        info!(
            "{} of {} pairs demultiplexed",
            counters.total(),
            total_pairs
        );

        Ok(RunSummary {
            counters,
            total_pairs,
            sinks,
        })
    }
}
