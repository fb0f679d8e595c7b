//! Output formatting module.
//!
//! Every renderer works from a [`RenderedReport`], in which each address and
//! link address has already been passed through the run's privacy mode.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{
    print_error, print_host_found, print_sweep_header, print_warning, write_neighbors, write_plain,
};

use crate::discovery::DiscoveryReport;
use crate::error::CliResult;
use crate::mask::Privacy;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text, hosts printed as they are found
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV rows of address and link address
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

/// One active host as it will be printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedHost {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_address: Option<String>,
}

/// A report with every identifier already masked or revealed.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedReport {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub privacy: Privacy,
    pub network: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_address: Option<String>,
    pub targets: usize,
    pub completed: usize,
    pub active_count: usize,
    pub interrupted: bool,
    pub hosts: Vec<RenderedHost>,
    pub neighbors_resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbor_warning: Option<String>,
}

impl RenderedReport {
    pub fn from_report(report: &DiscoveryReport) -> Self {
        let privacy = report.privacy;
        let hosts = report
            .active
            .iter()
            .map(|ip| RenderedHost {
                address: privacy.address(*ip),
                link_address: report.link_address(*ip).map(|mac| privacy.link_address(mac)),
            })
            .collect();

        Self {
            id: report.id.to_string(),
            started_at: report.started_at,
            completed_at: report.completed_at,
            privacy,
            network: report.network.clone(),
            local_address: report.local_address.map(|ip| privacy.address(ip)),
            targets: report.targets,
            completed: report.completed,
            active_count: report.active.len(),
            interrupted: report.interrupted,
            hosts,
            neighbors_resolved: report.neighbors.is_some(),
            neighbor_warning: report.neighbor_warning.clone(),
        }
    }

    /// Elapsed time in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.completed_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Hosts that have a link address.
    pub fn resolved_hosts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.hosts
            .iter()
            .filter_map(|h| h.link_address.as_deref().map(|mac| (h.address.as_str(), mac)))
    }
}

/// Format and print a finished report according to `format`.
pub fn print_report(report: &DiscoveryReport, format: OutputFormat) -> CliResult<()> {
    let rendered = RenderedReport::from_report(report);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &rendered, format)
}

/// Write a rendered report to any writer.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &RenderedReport,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Plain => write_plain(out, report)?,
        OutputFormat::Json => write_json(out, report)?,
        OutputFormat::Csv => write_csv(out, report)?,
    }
    Ok(())
}
