use std::io::Write;

use csv::WriterBuilder;

use crate::demux::barcodes::BarcodeTable;
use crate::demux::demultiplexer::SampleCounters;
use crate::demux::error::DemuxError;
use crate::demux::sinks::SinkPaths;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleStats {
    pub barcode: String,
    pub name: String,
    pub count: u64,
    pub output_r1: String,
    pub output_r2: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub samples: Vec<SampleStats>,
    pub matched_total: u64,
    pub total_pairs: u64,
}

impl StatsReport {
    pub fn build(
        counters: &SampleCounters,
        table: &BarcodeTable,
        sinks: &[SinkPaths],
        total_pairs: u64,
    ) -> Self {
        let samples = table
            .all()
            .iter()
            .zip(counters.iter())
            .zip(sinks)
            .map(|((barcode, (_, count)), paths)| SampleStats {
                barcode: barcode.sequence.clone(),
                name: barcode.name.clone(),
                count,
                output_r1: paths.r1.display().to_string(),
                output_r2: paths.r2.display().to_string(),
            })
            .collect();

        Self {
            samples,
            matched_total: counters.total(),
            total_pairs,
        }
    }

    pub fn summary_line(&self) -> String {
        format!(
            "A total of {} of {} reads were demultiplexed.",
            self.matched_total, self.total_pairs
        )
    }
}

/// Writes the report as a tab-separated table framed by a title and the
/// summary line.
pub fn render_report<W: Write>(report: &StatsReport, mut writer: W) -> Result<(), DemuxError> {
    writeln!(writer, "Stats of # of reads per barcode:")?;
    writeln!(writer)?;

    {
        let mut table = WriterBuilder::new().delimiter(b'\t').from_writer(&mut writer);
        table.write_record(["Barcode", "Name", "Count", "Output R1 file", "Output R2 file"])?;
        for sample in &report.samples {
            table.write_record([
                sample.barcode.as_str(),
                sample.name.as_str(),
                sample.count.to_string().as_str(),
                sample.output_r1.as_str(),
                sample.output_r2.as_str(),
            ])?;
        }
        table.flush()?;
    }

    writeln!(writer)?;
    writeln!(writer, "{}", report.summary_line())?;
    writer.flush()?;
    Ok(())
}
