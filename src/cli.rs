use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split paired FASTQ files into per-sample files by leading barcode
    Demultiplex(commands::demultiplex::DemultiplexCommand),
}

#[derive(Parser)]
#[command(
    name = "paired-demux",
    color = clap::ColorChoice::Always,
    version,
    about = "Barcode demultiplexing for paired-end FASTQ files",
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}
