use crate::demux::barcodes::{Barcode, BarcodeTable};
use crate::demux::error::DemuxError;
use crate::demux::reader::{phred_scores, ReadPair, ReadRecord};
use crate::demux::scorer::Scorer;

#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult<'a> {
    Match {
        index: usize,
        barcode: &'a Barcode,
        distance: f64,
    },
    NoMatch {
        distance: f64,
    },
}

impl<'a> MatchResult<'a> {
    pub fn distance(&self) -> f64 {
        match self {
            MatchResult::Match { distance, .. } | MatchResult::NoMatch { distance } => *distance,
        }
    }
}

/// Best barcode for a single read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub distance: f64,
}

/// Scans the table in order, keeping the first barcode with the lowest score.
pub fn best_barcode_for(
    read: &ReadRecord,
    table: &BarcodeTable,
    scorer: &dyn Scorer,
) -> Result<Candidate, DemuxError> {
    let seq = read.seq();
    let qualities = phred_scores(read.qual());
    let mut best: Option<Candidate> = None;

    for (index, barcode) in table.all().iter().enumerate() {
        let expected = barcode.sequence.as_bytes();
        let window = scorer.window(expected);
        let expected = expected.get(..window).unwrap_or(expected);
        let observed = seq.get(..window).unwrap_or(seq);
        let quals = qualities.get(..observed.len()).unwrap_or(&qualities[..]);

        let distance = scorer.score(expected, observed, quals)?;

        // strict comparison keeps the earliest barcode on ties
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(Candidate { index, distance });
        }
    }

    best.ok_or_else(|| DemuxError::Format("barcode table is empty".to_string()))
}

/// Picks between the best barcodes of both reads.
///
/// Read 1 wins ties. A pick must not exceed `max_distance` (inclusive); with
/// no threshold the better read's barcode is always taken.
pub fn classify<'a>(
    pair: &ReadPair,
    table: &'a BarcodeTable,
    scorer: &dyn Scorer,
    max_distance: Option<f64>,
) -> Result<MatchResult<'a>, DemuxError> {
    let best1 = best_barcode_for(&pair.r1, table, scorer)?;
    let best2 = best_barcode_for(&pair.r2, table, scorer)?;
    let within = |distance: f64| max_distance.map_or(true, |max| distance <= max);

    let chosen = if best1.distance <= best2.distance && within(best1.distance) {
        Some(best1)
    } else if best2.distance <= best1.distance && within(best2.distance) {
        Some(best2)
    } else {
        None
    };

    Ok(match chosen {
        Some(Candidate { index, distance }) => MatchResult::Match {
            index,
            barcode: &table.all()[index],
            distance,
        },
        None => MatchResult::NoMatch {
            distance: best1.distance.min(best2.distance),
        },
    })
}
