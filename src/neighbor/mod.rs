//! Neighbor (ARP) table reading.
//!
//! The OS family is chosen once; its candidate commands are tried in order
//! until one exits successfully with non-empty output, which is then parsed
//! with that family's format.

mod family;
mod parse;

pub use family::OsFamily;
pub use parse::{normalize_link_address, parse_bsd, parse_linux, parse_windows};

use crate::exec::{CommandRunner, SkipReason};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-command timeout for neighbor-table dumps.
pub const DEFAULT_NEIGHBOR_TIMEOUT: Duration = Duration::from_secs(5);

/// Snapshot mapping IPv4 addresses to normalized link-layer addresses.
pub type NeighborTable = BTreeMap<Ipv4Addr, String>;

/// Error type for neighbor-table reading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NeighborError {
    #[error("neighbor table unavailable: {0}")]
    Unavailable(SkipReason),
}

/// Reads the neighbor table for one OS family.
pub struct NeighborReader {
    family: OsFamily,
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl NeighborReader {
    pub fn new(family: OsFamily, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            family,
            runner,
            timeout: DEFAULT_NEIGHBOR_TIMEOUT,
        }
    }

    /// Set the per-command timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Dump and parse the neighbor table.
    ///
    /// Families without any candidate command yield an empty table.
    pub async fn read(&self) -> Result<NeighborTable, NeighborError> {
        let candidates = self.family.neighbor_candidates();
        if candidates.is_empty() {
            debug!(family = %self.family, "no neighbor-table command for this platform");
            return Ok(NeighborTable::new());
        }

        let mut last = SkipReason::EmptyOutput;
        for attempt in &candidates {
            match self.runner.run(attempt, self.timeout).await {
                Ok(output) if output.trim().is_empty() => {
                    debug!(command = %attempt, "neighbor command produced no output");
                    last = SkipReason::EmptyOutput;
                }
                Ok(output) => {
                    let table = self.family.parse_neighbors(&output);
                    debug!(command = %attempt, entries = table.len(), "read neighbor table");
                    return Ok(table);
                }
                Err(reason) => {
                    if reason.is_tool_missing() {
                        debug!(command = %attempt, %reason, "skipping neighbor command");
                    } else {
                        warn!(command = %attempt, %reason, "neighbor command failed");
                    }
                    last = reason;
                }
            }
        }

        Err(NeighborError::Unavailable(last))
    }
}
