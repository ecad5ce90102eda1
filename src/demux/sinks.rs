//! Per-sample FASTQ outputs for a run.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bio::io::fastq;
use tracing::debug;

use crate::demux::barcodes::BarcodeTable;
use crate::demux::constants::FASTQ_EXTENSION;
use crate::demux::error::DemuxError;
use crate::demux::reader::ReadPair;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkPaths {
    pub r1: PathBuf,
    pub r2: PathBuf,
}

impl SinkPaths {
    pub fn new(output_dir: &Path, prefix: &str, name: &str) -> Self {
        Self {
            r1: output_dir.join(format!("{}{}_R1.{}", prefix, name, FASTQ_EXTENSION)),
            r2: output_dir.join(format!("{}{}_R2.{}", prefix, name, FASTQ_EXTENSION)),
        }
    }
}

struct OutputSink {
    paths: SinkPaths,
    r1: fastq::Writer<File>,
    r2: fastq::Writer<File>,
}

/// One forward/reverse writer pair per barcode, in table order.
///
/// Writers are buffered and flushed by `finish`. Dropping the set without
/// calling `finish` still closes every file.
pub struct OutputSinkSet {
    sinks: Vec<OutputSink>,
}

impl OutputSinkSet {
    /// Opens every output before anything is written.
    ///
    /// Without `overwrite`, fails on the first destination that already
    /// exists and creates nothing. With it, existing files are truncated.
    pub fn create(
        output_dir: &Path,
        table: &BarcodeTable,
        prefix: &str,
        overwrite: bool,
    ) -> Result<Self, DemuxError> {
        let all_paths: Vec<SinkPaths> = table
            .all()
            .iter()
            .map(|barcode| SinkPaths::new(output_dir, prefix, &barcode.name))
            .collect();

        if !overwrite {
            for paths in &all_paths {
                for path in [&paths.r1, &paths.r2] {
                    if path.exists() {
                        return Err(DemuxError::DestinationExists(path.clone()));
                    }
                }
            }
        }

        let mut sinks = Vec::with_capacity(all_paths.len());
        for paths in all_paths {
            let r1 = fastq::Writer::new(open_destination(&paths.r1, overwrite)?);
            let r2 = fastq::Writer::new(open_destination(&paths.r2, overwrite)?);
            sinks.push(OutputSink { paths, r1, r2 });
        }

        Ok(Self { sinks })
    }

    /// Appends a pair to the outputs of the barcode at `index`.
    pub fn write(&mut self, index: usize, pair: &ReadPair) -> Result<(), DemuxError> {
        let sink = self
            .sinks
            .get_mut(index)
            .ok_or(DemuxError::UnknownSample(index))?;
        sink.r1.write_record(&pair.r1)?;
        sink.r2.write_record(&pair.r2)?;
        Ok(())
    }

    pub fn paths(&self) -> Vec<SinkPaths> {
        self.sinks.iter().map(|s| s.paths.clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Flushes and closes every output, returning their paths.
    pub fn finish(mut self) -> Result<Vec<SinkPaths>, DemuxError> {
        for sink in self.sinks.iter_mut() {
            sink.r1.flush()?;
            sink.r2.flush()?;
        }
        Ok(self.paths())
    }
}

fn open_destination(path: &Path, overwrite: bool) -> Result<File, DemuxError> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    debug!("Opening output {}", path.display());
    options.open(path).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => DemuxError::DestinationExists(path.to_path_buf()),
        _ => DemuxError::Io(e),
    })
}
