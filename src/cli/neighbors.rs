//! Neighbors subcommand implementation.
//!
//! Handles `lansweep neighbors`, a dump of the OS neighbor table without
//! probing anything first.

use crate::config::{parse_seconds, AppSettings};
use crate::error::{CliError, CliResult};
use crate::exec::SystemRunner;
use crate::mask::Privacy;
use crate::neighbor::{NeighborReader, NeighborTable, OsFamily};
use crate::output::{self, OutputFormat};
use clap::Args;
use console::style;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

/// Show the operating system's neighbor table.
#[derive(Args, Debug, Clone, Default)]
pub struct NeighborsCommand {
    /// Print full addresses and link addresses instead of masked ones
    #[arg(long)]
    pub reveal: bool,

    /// Per-command timeout in seconds
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Output format (csv is treated as plain)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

#[derive(Debug, Serialize)]
struct NeighborRow {
    address: String,
    link_address: String,
}

impl NeighborsCommand {
    /// Execute the neighbors command.
    pub async fn execute(&self, settings: &AppSettings) -> CliResult<()> {
        let timeout = match self.timeout {
            Some(secs) => parse_seconds(secs)
                .map_err(|e| CliError::InvalidArgument(format!("--timeout: {}", e)))?,
            None => settings.neighbor_timeout(),
        };

        let family = OsFamily::detect();
        let reader = NeighborReader::new(family, Arc::new(SystemRunner)).with_timeout(timeout);
        let table = reader.read().await?;

        let privacy = Privacy::from_reveal(self.reveal || settings.reveal);
        let format = self.output.unwrap_or_default();

        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_table(&mut out, &table, privacy, format)
    }
}

fn write_table<W: Write>(
    out: &mut W,
    table: &NeighborTable,
    privacy: Privacy,
    format: OutputFormat,
) -> CliResult<()> {
    let rows: Vec<NeighborRow> = table
        .iter()
        .map(|(ip, mac)| NeighborRow {
            address: privacy.address(*ip),
            link_address: privacy.link_address(mac),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &rows)?;
            writeln!(out)?;
        }
        OutputFormat::Plain | OutputFormat::Csv => {
            writeln!(
                out,
                "  {} {} entries",
                style("Neighbor table:").bold(),
                rows.len()
            )?;
            output::write_neighbors(
                out,
                rows.iter()
                    .map(|r| (r.address.as_str(), r.link_address.as_str())),
            )?;
        }
    }
    Ok(())
}
