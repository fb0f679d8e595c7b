//! Sweep subcommand implementation.
//!
//! Handles `lansweep [NETWORK]` and `lansweep sweep [NETWORK]`.

use crate::config::{parse_seconds, AppSettings};
use crate::discovery::{Discovery, DiscoveryEvent, DiscoveryOptions};
use crate::error::{CliError, CliResult, ConfigError};
use crate::exec::SystemRunner;
use crate::mask::Privacy;
use crate::neighbor::{NeighborReader, OsFamily};
use crate::net::local_ipv4;
use crate::output::{self, OutputFormat};
use crate::probe::{PingProber, ProbeJobConfig};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Probe a network for active hosts.
#[derive(Args, Debug, Clone, Default)]
pub struct SweepCommand {
    /// Network to sweep
    ///
    /// Examples:
    ///   192.168.1          Three-octet prefix, probes .1 to .254
    ///   10.0.0.0/28        CIDR block, network and broadcast excluded
    ///
    /// Defaults to the /24 around this machine's address.
    #[arg(value_name = "NETWORK", env = "LANSWEEP_NETWORK")]
    pub network: Option<String>,

    /// Print full addresses and link addresses instead of masked ones
    #[arg(long)]
    pub reveal: bool,

    /// Per-probe timeout in seconds
    #[arg(short = 't', long, value_name = "SECS", env = "LANSWEEP_TIMEOUT")]
    pub timeout: Option<f64>,

    /// Maximum number of probes in flight
    #[arg(short = 'w', long, value_name = "N", env = "LANSWEEP_WORKERS")]
    pub workers: Option<usize>,

    /// Look up link addresses of active hosts in the neighbor table
    #[arg(long)]
    pub arp: bool,

    /// Refuse CIDR blocks with more usable hosts than this
    #[arg(long, value_name = "N", env = "LANSWEEP_MAX_HOSTS")]
    pub max_hosts: Option<usize>,

    /// Probes per second (0 = unlimited)
    #[arg(short = 'r', long = "rate", value_name = "PPS")]
    pub rate_limit: Option<u32>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

impl SweepCommand {
    /// Execute the sweep command.
    pub async fn execute(&self, settings: &AppSettings, verbose: bool, quiet: bool) -> CliResult<()> {
        let format = self.output_format(settings)?;
        let options = self.options(settings, verbose && format == OutputFormat::Plain)?;
        let privacy = options.privacy;
        let plain = !quiet && format == OutputFormat::Plain;

        let local = match local_ipv4().await {
            Ok(addr) => Some(addr),
            Err(e) => {
                debug!(error = %e, "local address not detected");
                None
            }
        };

        let family = OsFamily::detect();
        let runner = Arc::new(SystemRunner);
        let prober = Arc::new(PingProber::new(family, runner.clone()));
        let neighbors = NeighborReader::new(family, runner).with_timeout(settings.neighbor_timeout());
        let discovery = Discovery::new(prober, neighbors).with_local_address(local);

        // Stays registered until the report is printed, so Ctrl-C during the
        // neighbor lookup still cuts the run short.
        let (stop_tx, stop_rx) = watch::channel(false);
        let ctrl_c = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received");
                let _ = stop_tx.send(true);
            }
        });

        let local_display = local.map(|ip| privacy.address(ip));
        let result = discovery
            .run(&options, stop_rx, |event| {
                report_event(event, privacy, local_display.as_deref(), plain)
            })
            .await;

        let printed = result
            .map_err(CliError::from)
            .and_then(|report| output::print_report(&report, format));
        ctrl_c.abort();
        printed
    }

    /// Merge flags over settings into discovery options.
    fn options(&self, settings: &AppSettings, progress: bool) -> CliResult<DiscoveryOptions> {
        let timeout = match self.timeout {
            Some(secs) => parse_seconds(secs)
                .map_err(|e| CliError::InvalidArgument(format!("--timeout: {}", e)))?,
            None => settings.probe_timeout(),
        };

        let workers = self.workers.unwrap_or(settings.workers);
        if workers == 0 {
            return Err(CliError::InvalidArgument(
                "--workers must be at least 1".to_string(),
            ));
        }

        let max_hosts = self.max_hosts.unwrap_or(settings.max_hosts);
        if max_hosts == 0 {
            return Err(CliError::InvalidArgument(
                "--max-hosts must be at least 1".to_string(),
            ));
        }

        let job = ProbeJobConfig::new()
            .with_timeout(timeout)
            .with_concurrency(workers)
            .with_rate_limit(self.rate_limit.unwrap_or(settings.rate_limit));
        let job = if progress { job.with_progress() } else { job };

        Ok(DiscoveryOptions {
            network: self.network.clone(),
            privacy: Privacy::from_reveal(self.reveal || settings.reveal),
            max_hosts,
            resolve_neighbors: self.arp,
            job,
        })
    }

    fn output_format(&self, settings: &AppSettings) -> CliResult<OutputFormat> {
        match self.output {
            Some(format) => Ok(format),
            None => settings
                .output_format
                .parse()
                .map_err(|e: String| {
                    CliError::from(ConfigError::Invalid(format!("output_format: {}", e)))
                }),
        }
    }
}

fn report_event(event: &DiscoveryEvent, privacy: Privacy, local: Option<&str>, plain: bool) {
    match event {
        DiscoveryEvent::Expanded { network, targets } => {
            if plain {
                output::print_sweep_header(local, network, *targets);
            }
        }
        DiscoveryEvent::HostFound(ip) => {
            if plain {
                output::print_host_found(&privacy.address(*ip));
            }
        }
        DiscoveryEvent::Interrupted { completed } => {
            output::print_warning(&format!(
                "interrupted after {} probes, reporting partial results",
                completed
            ));
        }
        DiscoveryEvent::NeighborWarning(message) => {
            output::print_warning(&format!("{}; link addresses omitted", message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_flags_override_settings() {
        let settings = AppSettings {
            workers: 16,
            rate_limit: 100,
            ..AppSettings::default()
        };
        let cmd = SweepCommand {
            network: Some("10.0.0".to_string()),
            timeout: Some(0.25),
            workers: Some(4),
            arp: true,
            ..SweepCommand::default()
        };

        let options = cmd.options(&settings, false).unwrap();
        assert_eq!(options.network.as_deref(), Some("10.0.0"));
        assert_eq!(options.job.timeout, Duration::from_millis(250));
        assert_eq!(options.job.concurrency, 4);
        assert_eq!(options.job.rate_limit, 100);
        assert!(options.resolve_neighbors);
        assert_eq!(options.privacy, Privacy::Masked);
    }

    #[test]
    fn test_settings_fill_gaps() {
        let settings = AppSettings {
            reveal: true,
            max_hosts: 512,
            ..AppSettings::default()
        };
        let options = SweepCommand::default().options(&settings, true).unwrap();
        assert_eq!(options.privacy, Privacy::Reveal);
        assert_eq!(options.max_hosts, 512);
        assert_eq!(options.job.timeout, Duration::from_millis(1500));
        assert!(options.job.progress);
        assert!(options.network.is_none());
    }

    #[test]
    fn test_invalid_flags_rejected() {
        let settings = AppSettings::default();

        let zero_workers = SweepCommand {
            workers: Some(0),
            ..SweepCommand::default()
        };
        assert!(matches!(
            zero_workers.options(&settings, false),
            Err(CliError::InvalidArgument(_))
        ));

        let bad_timeout = SweepCommand {
            timeout: Some(-2.0),
            ..SweepCommand::default()
        };
        assert!(matches!(
            bad_timeout.options(&settings, false),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_output_format_from_settings() {
        let settings = AppSettings {
            output_format: "csv".to_string(),
            ..AppSettings::default()
        };
        let cmd = SweepCommand::default();
        assert_eq!(cmd.output_format(&settings).unwrap(), OutputFormat::Csv);

        let bad = AppSettings {
            output_format: "xml".to_string(),
            ..AppSettings::default()
        };
        assert!(matches!(
            cmd.output_format(&bad),
            Err(CliError::Config(ConfigError::Invalid(_)))
        ));
    }
}
