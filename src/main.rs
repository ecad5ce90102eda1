use clap::Parser;
use tracing::error;

use paired_demux::cli::{Cli, Commands};
use paired_demux::commands;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Demultiplex(cmd) => commands::demultiplex::command(cmd),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
