//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::Parser;

/// Mirror - keep a replica directory identical to a source directory
///
/// Runs a full synchronization pass, sleeps for the interval, and repeats
/// until the process is stopped.
///
/// Examples:
///   mirror ./photos /mnt/backup/photos 60 ./logs
///   mirror ./src ./replica 5 ./logs --trash ./trash
///   mirror ./src ./replica 5 ./logs --once
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to mirror from
    pub source: PathBuf,

    /// Directory kept identical to the source
    pub replica: PathBuf,

    /// Seconds to wait between passes; 0 starts the next pass immediately
    #[arg(value_parser = clap::value_parser!(u64))]
    pub interval: u64,

    /// Directory that receives log.txt
    pub log_dir: PathBuf,

    /// Move removed replica files into this directory instead of deleting them
    #[arg(long, value_name = "DIR", env = "MIRROR_TRASH_DIR")]
    pub trash: Option<PathBuf>,

    /// Abort a pass at the first file that cannot be reconciled
    #[arg(long)]
    pub fail_fast: bool,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// Read options from a .toml or .json file
    #[arg(short, long, value_name = "FILE", env = "MIRROR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
