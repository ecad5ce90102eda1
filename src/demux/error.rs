use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DemuxError {
    #[error("Barcode format error: {0}")]
    Format(String),

    #[error("Invalid FASTQ record in {stream}: {source}")]
    InputFormat {
        stream: String,
        #[source]
        source: bio::io::fastq::Error,
    },

    #[error("Barcode and read lengths do not match: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Paired streams are out of sync: {0}")]
    DesynchronizedStreams(String),

    #[error("Output {0} already exists. Pass --overwrite to replace it.")]
    DestinationExists(PathBuf),

    #[error("{sinks} outputs were opened for a table of {barcodes} barcodes")]
    SinkCountMismatch { barcodes: usize, sinks: usize },

    #[error("No output is open for barcode #{0}")]
    UnknownSample(usize),

    #[error("Output directory {0} doesn't exist")]
    OutputDirMissing(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Regex pattern error: {0}")]
    Regex(#[from] regex::Error),
}
