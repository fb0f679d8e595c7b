//! Discovery orchestration.
//!
//! Drives one run through a fixed sequence of stages:
//! expanding targets, probing them, optionally resolving link addresses from
//! the neighbor table, and handing a report to the caller for rendering.
//! Expansion and tool-availability failures abort the run; interruption and
//! neighbor-table failures do not.

use crate::error::{DiscoveryError, DiscoveryResult};
use crate::mask::Privacy;
use crate::neighbor::{NeighborReader, NeighborTable};
use crate::probe::{interrupted, run_sweep, ProbeJobConfig, Prober};
use crate::types::{NetworkSpec, SweepId, DEFAULT_MAX_HOSTS};
use chrono::{DateTime, Utc};
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};

/// Stages of a discovery run. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    Expanding,
    Probing,
    ResolvingNeighbors,
    Reporting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Expanding => "expanding",
            Stage::Probing => "probing",
            Stage::ResolvingNeighbors => "resolving-neighbors",
            Stage::Reporting => "reporting",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// Targets were expanded and probing is about to start.
    Expanded { network: String, targets: usize },
    /// A host answered its probe.
    HostFound(Ipv4Addr),
    /// The sweep was interrupted; partial results follow.
    Interrupted { completed: usize },
    /// The neighbor table could not be read.
    NeighborWarning(String),
}

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Network specifier; `None` means the /24 around the local address.
    pub network: Option<String>,
    /// Rendering mode, fixed for the whole run.
    pub privacy: Privacy,
    /// Largest CIDR expansion accepted.
    pub max_hosts: usize,
    /// Whether to read the neighbor table after probing.
    pub resolve_neighbors: bool,
    /// Sweep settings.
    pub job: ProbeJobConfig,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            network: None,
            privacy: Privacy::Masked,
            max_hosts: DEFAULT_MAX_HOSTS,
            resolve_neighbors: false,
            job: ProbeJobConfig::default(),
        }
    }
}

/// Everything a run learned, in unmasked form.
///
/// Not `Serialize`; output goes through the renderers, which
/// apply [`DiscoveryReport::privacy`] to every identifier.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    pub id: SweepId,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Canonical form of the swept network.
    pub network: String,
    pub local_address: Option<Ipv4Addr>,
    /// Number of addresses scheduled for probing.
    pub targets: usize,
    /// Number of probes that finished; below `targets` only when interrupted.
    pub completed: usize,
    /// Reachable hosts, ascending.
    pub active: Vec<Ipv4Addr>,
    pub interrupted: bool,
    /// Present only when neighbor resolution was requested and succeeded.
    pub neighbors: Option<NeighborTable>,
    pub neighbor_warning: Option<String>,
    pub privacy: Privacy,
}

impl DiscoveryReport {
    /// Link address recorded for `ip`, if any.
    pub fn link_address(&self, ip: Ipv4Addr) -> Option<&str> {
        self.neighbors.as_ref()?.get(&ip).map(String::as_str)
    }
}

/// Composes target expansion, probing and neighbor lookup.
pub struct Discovery {
    prober: Arc<dyn Prober>,
    neighbors: NeighborReader,
    local_address: Option<Ipv4Addr>,
}

impl Discovery {
    pub fn new(prober: Arc<dyn Prober>, neighbors: NeighborReader) -> Self {
        Self {
            prober,
            neighbors,
            local_address: None,
        }
    }

    /// Record the machine's own address, used for display and as the
    /// default network.
    pub fn with_local_address(mut self, addr: Option<Ipv4Addr>) -> Self {
        self.local_address = addr;
        self
    }

    /// Execute one run.
    pub async fn run<F>(
        &self,
        options: &DiscoveryOptions,
        interrupt: watch::Receiver<bool>,
        on_event: F,
    ) -> DiscoveryResult<DiscoveryReport>
    where
        F: FnMut(&DiscoveryEvent),
    {
        let id = SweepId::new();
        let span = info_span!("discovery", id = %id.short());
        self.run_stages(id, options, interrupt, on_event)
            .instrument(span)
            .await
    }

    async fn run_stages<F>(
        &self,
        id: SweepId,
        options: &DiscoveryOptions,
        mut interrupt: watch::Receiver<bool>,
        mut on_event: F,
    ) -> DiscoveryResult<DiscoveryReport>
    where
        F: FnMut(&DiscoveryEvent),
    {
        let started_at = Utc::now();
        let mut stage = Stage::Start;

        advance(&mut stage, Stage::Expanding);
        let spec = match &options.network {
            Some(network) => NetworkSpec::parse(network)?,
            None => self
                .local_address
                .map(NetworkSpec::enclosing_prefix)
                .ok_or(DiscoveryError::NoDefaultNetwork)?,
        };
        let targets = spec.expand(options.max_hosts)?;
        let network = spec.to_string();
        on_event(&DiscoveryEvent::Expanded {
            network: network.clone(),
            targets: targets.len(),
        });

        advance(&mut stage, Stage::Probing);
        let outcome = run_sweep(
            Arc::clone(&self.prober),
            &targets,
            &options.job,
            interrupt.clone(),
            |result| {
                if result.reachable {
                    on_event(&DiscoveryEvent::HostFound(result.address));
                }
            },
        )
        .await?;

        if outcome.interrupted {
            on_event(&DiscoveryEvent::Interrupted {
                completed: outcome.completed,
            });
        }

        let mut neighbors = None;
        let mut neighbor_warning = None;
        if options.resolve_neighbors && !outcome.interrupted {
            if outcome.active.is_empty() {
                debug!("no active hosts, skipping neighbor lookup");
            } else {
                advance(&mut stage, Stage::ResolvingNeighbors);
                let lookup = tokio::select! {
                    biased;
                    _ = interrupted(&mut interrupt) => {
                        info!("neighbor lookup interrupted");
                        Err("neighbor lookup interrupted".to_string())
                    }
                    read = self.neighbors.read() => read.map_err(|e| {
                        warn!(error = %e, "continuing without neighbor data");
                        e.to_string()
                    }),
                };
                match lookup {
                    Ok(table) => neighbors = Some(table),
                    Err(message) => {
                        on_event(&DiscoveryEvent::NeighborWarning(message.clone()));
                        neighbor_warning = Some(message);
                    }
                }
            }
        }

        advance(&mut stage, Stage::Reporting);
        let report = DiscoveryReport {
            id,
            started_at,
            completed_at: Utc::now(),
            network,
            local_address: self.local_address,
            targets: targets.len(),
            completed: outcome.completed,
            active: outcome.active,
            interrupted: outcome.interrupted,
            neighbors,
            neighbor_warning,
            privacy: options.privacy,
        };
        info!(
            active = report.active.len(),
            interrupted = report.interrupted,
            "discovery finished"
        );

        advance(&mut stage, Stage::Done);
        Ok(report)
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug_assert!(next > *stage, "stage moved backwards: {} -> {}", stage, next);
    debug!(from = %stage, to = %next, "stage");
    *stage = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::Start < Stage::Expanding);
        assert!(Stage::Probing < Stage::ResolvingNeighbors);
        assert!(Stage::Reporting < Stage::Done);
    }

    #[test]
    fn test_link_address_lookup() {
        let mut table = NeighborTable::new();
        table.insert(Ipv4Addr::new(10, 0, 0, 1), "aa:bb:cc:dd:ee:ff".to_string());
        table.insert(Ipv4Addr::new(10, 0, 0, 99), "aa:bb:cc:dd:ee:00".to_string());

        let report = DiscoveryReport {
            id: SweepId::new(),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            network: "10.0.0.0/24".to_string(),
            local_address: None,
            targets: 254,
            completed: 254,
            active: vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)],
            interrupted: false,
            neighbors: Some(table),
            neighbor_warning: None,
            privacy: Privacy::Masked,
        };

        assert_eq!(
            report.link_address(Ipv4Addr::new(10, 0, 0, 1)),
            Some("aa:bb:cc:dd:ee:ff")
        );
        assert_eq!(report.link_address(Ipv4Addr::new(10, 0, 0, 2)), None);
    }
}
