//! Known sample barcodes, loaded once per run.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use tracing::info;

use crate::demux::error::DemuxError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barcode {
    pub name: String,
    pub sequence: String,
}

impl Barcode {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Barcodes in the order they were listed, with lookup by sample name.
#[derive(Debug, Clone)]
pub struct BarcodeTable {
    barcodes: Vec<Barcode>,
    by_name: HashMap<String, usize>,
}

impl BarcodeTable {
    /// Parses `sequence [name]` lines. The name defaults to the sequence.
    pub fn load<R: BufRead>(source: R) -> Result<Self, DemuxError> {
        let symbols = Regex::new(r"(?i)^[ACGTN]+$")?;
        let mut table = BarcodeTable {
            barcodes: Vec::new(),
            by_name: HashMap::new(),
        };

        for (index, line) in source.lines().enumerate() {
            let line = line?;
            let columns: Vec<&str> = line.split_whitespace().collect();

            let (sequence, name) = match columns.as_slice() {
                [] => continue,
                [sequence] => (*sequence, *sequence),
                [sequence, name] => (*sequence, *name),
                _ => {
                    return Err(DemuxError::Format(format!(
                        "line {} has {} columns, expected `sequence [name]`",
                        index + 1,
                        columns.len()
                    )))
                }
            };

            if !symbols.is_match(sequence) {
                return Err(DemuxError::Format(format!(
                    "line {}: `{}` is not a barcode of A, C, G, T or N",
                    index + 1,
                    sequence
                )));
            }

            table.push(Barcode {
                name: name.to_string(),
                sequence: sequence.to_ascii_uppercase(),
            })?;
        }

        if table.is_empty() {
            return Err(DemuxError::Format("no barcodes found".to_string()));
        }

        info!("Loaded {} barcodes", table.len());
        Ok(table)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DemuxError> {
        let file = File::open(path.as_ref())?;
        Self::load(BufReader::new(file))
    }

    fn push(&mut self, barcode: Barcode) -> Result<(), DemuxError> {
        if self.by_name.contains_key(&barcode.name) {
            return Err(DemuxError::Format(format!(
                "duplicate barcode name `{}`",
                barcode.name
            )));
        }
        self.by_name.insert(barcode.name.clone(), self.barcodes.len());
        self.barcodes.push(barcode);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Barcode> {
        self.by_name.get(name).map(|&index| &self.barcodes[index])
    }

    pub fn all(&self) -> &[Barcode] {
        &self.barcodes
    }

    pub fn len(&self) -> usize {
        self.barcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barcodes.is_empty()
    }
}
