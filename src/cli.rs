use std::path::PathBuf;

use clap::Parser;

/// Local-first terminal organizer for named desks
#[derive(Parser, Debug)]
#[command(name = "desks", version, about, long_about = None)]
pub struct Cli {
    /// Directory for the password, desks and log files
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seconds without input before the app exits (0 disables)
    #[arg(long, value_name = "SECS")]
    pub idle_timeout: Option<u64>,

    /// Print the resolved file locations and exit
    #[arg(long)]
    pub print_paths: bool,
}
