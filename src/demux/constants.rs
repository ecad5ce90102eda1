// Defaults for a demultiplexing run
//
// Matching
pub const DEFAULT_MAX_MISMATCHES: usize = 1;
pub const DEFAULT_QUALITY_PREFIX_LEN: usize = 6;

// Quality scores
pub const PHRED_OFFSET: u8 = 33;
pub const PHRED_MAX: f64 = 40.0;
pub const QUALITY_WEIGHT: f64 = 100.0;

// Outputs
pub const STATS_FILE_NAME: &str = "result_stats.txt";
pub const FASTQ_EXTENSION: &str = "fastq";

// Logging
pub const PROGRESS_INTERVAL: u64 = 100_000;

// Configuration
pub const ENV_PREFIX: &str = "DEMUX";
