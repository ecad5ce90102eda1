//! Distance between an expected barcode and the start of a read.

use clap::ValueEnum;
use strum_macros::{Display, EnumString};

use crate::demux::constants::{PHRED_MAX, QUALITY_WEIGHT};
use crate::demux::error::DemuxError;

/// A barcode-to-read distance. Lower is a better match.
///
/// Scores from different implementations are not comparable, so a run sticks
/// to one scorer.
pub trait Scorer {
    /// How many leading symbols of the barcode and read are compared.
    fn window(&self, barcode: &[u8]) -> usize;

    /// `qualities` are decoded Phred scores aligned with `read`.
    fn score(&self, barcode: &[u8], read: &[u8], qualities: &[u8]) -> Result<f64, DemuxError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum ScorerKind {
    #[default]
    Hamming,
    QualityWeighted,
}

impl ScorerKind {
    pub fn build(&self, quality_prefix_len: usize) -> Box<dyn Scorer> {
        match self {
            ScorerKind::Hamming => Box::new(HammingScorer),
            ScorerKind::QualityWeighted => Box::new(QualityWeightedScorer::new(quality_prefix_len)),
        }
    }
}

/// Counts mismatched positions over the full barcode length.
#[derive(Debug, Clone, Copy, Default)]
pub struct HammingScorer;

impl HammingScorer {
    pub fn distance(a: &[u8], b: &[u8]) -> Result<usize, DemuxError> {
        if a.len() != b.len() {
            return Err(DemuxError::LengthMismatch {
                expected: a.len(),
                found: b.len(),
            });
        }
        Ok(a.iter().zip(b).filter(|(x, y)| x != y).count())
    }
}

impl Scorer for HammingScorer {
    fn window(&self, barcode: &[u8]) -> usize {
        barcode.len()
    }

    fn score(&self, barcode: &[u8], read: &[u8], _qualities: &[u8]) -> Result<f64, DemuxError> {
        Ok(Self::distance(barcode, read)? as f64)
    }
}

/// Sums `|match - quality / 40| * 100` over a fixed-length prefix, so a
/// confident match costs nothing and a confident mismatch costs the most.
#[derive(Debug, Clone, Copy)]
pub struct QualityWeightedScorer {
    prefix_len: usize,
}

impl QualityWeightedScorer {
    pub fn new(prefix_len: usize) -> Self {
        Self { prefix_len }
    }
}

impl Scorer for QualityWeightedScorer {
    fn window(&self, _barcode: &[u8]) -> usize {
        self.prefix_len
    }

    fn score(&self, barcode: &[u8], read: &[u8], qualities: &[u8]) -> Result<f64, DemuxError> {
        if barcode.len() != read.len() {
            return Err(DemuxError::LengthMismatch {
                expected: barcode.len(),
                found: read.len(),
            });
        }
        if qualities.len() != read.len() {
            return Err(DemuxError::LengthMismatch {
                expected: read.len(),
                found: qualities.len(),
            });
        }

        let total = barcode
            .iter()
            .zip(read)
            .zip(qualities)
            .map(|((expected, observed), &quality)| {
                let matched = if expected == observed { 1.0 } else { 0.0 };
                (matched - quality as f64 / PHRED_MAX).abs() * QUALITY_WEIGHT
            })
            .sum();
        Ok(total)
    }
}
