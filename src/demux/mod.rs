//! Barcode demultiplexing of paired-end FASTQ streams.

pub mod barcodes;
pub mod classifier;
pub mod constants;
pub mod demultiplexer;
pub mod error;
pub mod reader;
pub mod scorer;
pub mod settings;
pub mod sinks;
pub mod stats;

pub use barcodes::{Barcode, BarcodeTable};
pub use classifier::{classify, MatchResult};
pub use demultiplexer::{Demultiplexer, RunSummary, SampleCounters};
pub use error::DemuxError;
pub use reader::{open_fastq, PairedRecords, ReadPair, ReadRecord};
pub use scorer::{HammingScorer, QualityWeightedScorer, Scorer, ScorerKind};
pub use settings::RunConfig;
pub use sinks::{OutputSinkSet, SinkPaths};
pub use stats::{render_report, SampleStats, StatsReport};
