//! Prober trait abstraction.
//!
//! Separates "how one address is checked" from the sweep that fans probes
//! out, so the sweep can be driven by fakes in tests.

use async_trait::async_trait;
use serde::Serialize;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default wait for a single probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1500);

/// Default number of probes in flight.
pub const DEFAULT_WORKERS: usize = 64;

/// Error type for probing.
///
/// Per-target failures are not errors; this only covers conditions that make
/// the whole sweep impossible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("probe tool unavailable: {0}")]
    ToolMissing(String),
}

/// Outcome of probing one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub address: Ipv4Addr,
    pub reachable: bool,
}

impl ProbeResult {
    pub fn new(address: Ipv4Addr, reachable: bool) -> Self {
        Self { address, reachable }
    }
}

/// Trait for liveness probe implementations.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Send one liveness probe to `target`.
    ///
    /// Returns `Ok(false)` for no reply; `Err` only when the probing
    /// mechanism itself is unavailable.
    async fn probe(&self, target: Ipv4Addr, timeout: Duration) -> Result<bool, ProbeError>;
}

/// Settings for one sweep.
#[derive(Debug, Clone)]
pub struct ProbeJobConfig {
    /// Per-probe timeout.
    pub timeout: Duration,
    /// Maximum probes in flight.
    pub concurrency: usize,
    /// Probes per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Show a progress bar.
    pub progress: bool,
}

impl Default for ProbeJobConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_PROBE_TIMEOUT,
            concurrency: DEFAULT_WORKERS,
            rate_limit: 0,
            progress: false,
        }
    }
}

impl ProbeJobConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the concurrency level. Zero is raised to one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the rate limit.
    pub fn with_rate_limit(mut self, rate: u32) -> Self {
        self.rate_limit = rate;
        self
    }

    /// Enable the progress bar.
    pub fn with_progress(mut self) -> Self {
        self.progress = true;
        self
    }
}

/// Final result of a sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Reachable hosts, ascending.
    pub active: Vec<Ipv4Addr>,
    /// Number of probes that finished before the sweep ended.
    pub completed: usize,
    /// Whether the sweep stopped early on an interrupt.
    pub interrupted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_config_defaults() {
        let config = ProbeJobConfig::new();
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.concurrency, 64);
        assert_eq!(config.rate_limit, 0);
        assert!(!config.progress);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        assert_eq!(ProbeJobConfig::new().with_concurrency(0).concurrency, 1);
    }
}
