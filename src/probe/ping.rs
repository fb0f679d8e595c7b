//! Ping-based liveness prober.
//!
//! Invokes the system `ping` executable once per target, asking for a single
//! echo. Exit status zero means the host answered.

use super::traits::{ProbeError, Prober};
use crate::exec::CommandRunner;
use crate::neighbor::OsFamily;
use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Prober that shells out to `ping`.
pub struct PingProber {
    family: OsFamily,
    runner: Arc<dyn CommandRunner>,
}

impl PingProber {
    pub fn new(family: OsFamily, runner: Arc<dyn CommandRunner>) -> Self {
        Self { family, runner }
    }
}

#[async_trait]
impl Prober for PingProber {
    fn name(&self) -> &str {
        "ping"
    }

    async fn probe(&self, target: Ipv4Addr, timeout: Duration) -> Result<bool, ProbeError> {
        let attempt = self.family.ping_attempt(&target.to_string(), timeout);
        match self.runner.run(&attempt, timeout).await {
            Ok(_) => Ok(true),
            Err(reason) if reason.is_tool_missing() => {
                Err(ProbeError::ToolMissing(reason.to_string()))
            }
            Err(reason) => {
                trace!(%target, %reason, "no reply");
                Ok(false)
            }
        }
    }
}
