//! Pull-based paired FASTQ input.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use bio::io::fastq;
use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::demux::constants::PHRED_OFFSET;
use crate::demux::error::DemuxError;

pub type ReadRecord = fastq::Record;

/// A single-pass stream of FASTQ records.
pub type RecordStream = fastq::Records<BufReader<Box<dyn Read>>>;

/// Opens a FASTQ file, decompressing it when the name ends in `gz`.
pub fn open_fastq<P: AsRef<Path>>(path: P) -> Result<RecordStream, DemuxError> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let reader: Box<dyn Read> = if path.to_string_lossy().ends_with("gz") {
        debug!("Opening {} as gzip", path.display());
        Box::new(MultiGzDecoder::new(BufReader::new(file)))
    } else {
        debug!("Opening {} as plain text", path.display());
        Box::new(file)
    };

    Ok(fastq::Reader::new(reader).records())
}

/// Decodes an ASCII (offset 33) quality string into Phred scores.
pub fn phred_scores(qual: &[u8]) -> Vec<u8> {
    qual.iter().map(|q| q.saturating_sub(PHRED_OFFSET)).collect()
}

/// Drops the first `len` bases and qualities of a record.
pub fn trim_record(record: &ReadRecord, len: usize) -> ReadRecord {
    let seq = record.seq();
    let qual = record.qual();
    ReadRecord::with_attrs(
        record.id(),
        record.desc(),
        &seq[len.min(seq.len())..],
        &qual[len.min(qual.len())..],
    )
}

/// Two reads sharing one fragment id.
#[derive(Debug, Clone)]
pub struct ReadPair {
    pub r1: ReadRecord,
    pub r2: ReadRecord,
}

impl ReadPair {
    pub fn new(r1: ReadRecord, r2: ReadRecord) -> Result<Self, DemuxError> {
        if r1.id() != r2.id() {
            return Err(DemuxError::DesynchronizedStreams(format!(
                "record IDs do not match: {} vs {}",
                r1.id(),
                r2.id()
            )));
        }
        Ok(Self { r1, r2 })
    }

    pub fn id(&self) -> &str {
        self.r1.id()
    }

    pub fn trimmed(&self, len: usize) -> ReadPair {
        ReadPair {
            r1: trim_record(&self.r1, len),
            r2: trim_record(&self.r2, len),
        }
    }
}

/// Walks two record streams in lockstep.
///
/// Yields an error and stops when either stream fails to parse, when one ends
/// before the other, or when the ids of a pulled pair differ.
pub struct PairedRecords<I1, I2> {
    r1: I1,
    r2: I2,
    labels: (String, String),
    done: bool,
}

impl PairedRecords<RecordStream, RecordStream> {
    pub fn from_paths<P: AsRef<Path>>(path1: P, path2: P) -> Result<Self, DemuxError> {
        let r1 = open_fastq(path1.as_ref())?;
        let r2 = open_fastq(path2.as_ref())?;
        Ok(Self::new(r1, r2).with_labels(
            path1.as_ref().display().to_string(),
            path2.as_ref().display().to_string(),
        ))
    }
}

impl<I1, I2> PairedRecords<I1, I2>
where
    I1: Iterator<Item = Result<ReadRecord, fastq::Error>>,
    I2: Iterator<Item = Result<ReadRecord, fastq::Error>>,
{
    pub fn new(r1: I1, r2: I2) -> Self {
        Self {
            r1,
            r2,
            labels: ("R1".to_string(), "R2".to_string()),
            done: false,
        }
    }

    pub fn with_labels(mut self, label1: String, label2: String) -> Self {
        self.labels = (label1, label2);
        self
    }

    fn next_pair(&mut self) -> Option<Result<ReadPair, DemuxError>> {
        let (label1, label2) = &self.labels;
        match (self.r1.next(), self.r2.next()) {
            (None, None) => None,
            (Some(Err(source)), _) => Some(Err(DemuxError::InputFormat {
                stream: label1.clone(),
                source,
            })),
            (_, Some(Err(source))) => Some(Err(DemuxError::InputFormat {
                stream: label2.clone(),
                source,
            })),
            (Some(Ok(_)), None) => Some(Err(DemuxError::DesynchronizedStreams(format!(
                "{} ended before {}",
                label2, label1
            )))),
            (None, Some(Ok(_))) => Some(Err(DemuxError::DesynchronizedStreams(format!(
                "{} ended before {}",
                label1, label2
            )))),
            (Some(Ok(rec1)), Some(Ok(rec2))) => Some(ReadPair::new(rec1, rec2)),
        }
    }
}

impl<I1, I2> Iterator for PairedRecords<I1, I2>
where
    I1: Iterator<Item = Result<ReadRecord, fastq::Error>>,
    I2: Iterator<Item = Result<ReadRecord, fastq::Error>>,
{
    type Item = Result<ReadPair, DemuxError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.next_pair();
        if !matches!(item, Some(Ok(_))) {
            self.done = true;
        }
        item
    }
}
