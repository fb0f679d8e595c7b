//! CLI subcommand definitions and handlers.
//!
//! - `lansweep [NETWORK]` / `lansweep sweep [NETWORK]` - Discover active hosts
//! - `lansweep neighbors` - Dump the neighbor (ARP) table
//! - `lansweep config path|show` - Inspect settings

mod config;
mod neighbors;
mod sweep;

pub use config::{ConfigAction, ConfigCommand};
pub use neighbors::NeighborsCommand;
pub use sweep::SweepCommand;

use crate::config::AppSettings;
use crate::error::CliResult;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lansweep - discover hosts on the local network.
///
/// Probes every address of a network with a single ping, then optionally
/// looks up link-layer addresses in the operating system's neighbor table.
/// Host identifiers are masked unless --reveal is given.
#[derive(Parser, Debug)]
#[command(name = "lansweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Local-network host discovery", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute (defaults to `sweep`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Sweep arguments when no subcommand is given
    #[command(flatten)]
    pub sweep: SweepCommand,

    /// Enable verbose output (debug logs and a progress bar)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a custom settings file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe a network for active hosts
    #[command(alias = "s")]
    Sweep(SweepCommand),

    /// Show the operating system's neighbor (ARP) table
    #[command(alias = "n")]
    Neighbors(NeighborsCommand),

    /// Inspect settings
    Config(ConfigCommand),
}

impl Cli {
    /// Load settings and dispatch to the selected command.
    pub async fn run(&self) -> CliResult<()> {
        let settings = match &self.config {
            Some(path) => AppSettings::load_from(path)?,
            None => AppSettings::load()?,
        };

        match &self.command {
            Some(Commands::Sweep(cmd)) => cmd.execute(&settings, self.verbose, self.quiet).await,
            Some(Commands::Neighbors(cmd)) => cmd.execute(&settings).await,
            Some(Commands::Config(cmd)) => cmd.execute(&settings, self.config.as_deref()),
            None => self.sweep.execute(&settings, self.verbose, self.quiet).await,
        }
    }
}
