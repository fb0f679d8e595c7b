//! # lansweep - Local-Network Host Discovery
//!
//! lansweep finds the hosts that answer on a local IPv4 network and, on
//! request, pairs them with link-layer addresses from the operating system's
//! neighbor (ARP) table.
//!
//! ## Features
//!
//! - **Flexible Targeting**: three-octet prefixes and CIDR blocks, with a size cap
//! - **Bounded Concurrency**: configurable worker count and optional rate limiting
//! - **Interruptible**: Ctrl-C keeps every result gathered so far
//! - **Cross-Platform Neighbor Lookup**: BSD, Windows and Linux table formats
//! - **Privacy by Default**: addresses are masked unless revealed
//! - **Multiple Output Formats**: Plain text, JSON, and CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use lansweep::discovery::{Discovery, DiscoveryOptions};
//! use lansweep::exec::SystemRunner;
//! use lansweep::neighbor::{NeighborReader, OsFamily};
//! use lansweep::probe::PingProber;
//! use std::sync::Arc;
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() {
//!     let family = OsFamily::detect();
//!     let runner = Arc::new(SystemRunner);
//!     let discovery = Discovery::new(
//!         Arc::new(PingProber::new(family, runner.clone())),
//!         NeighborReader::new(family, runner),
//!     );
//!
//!     let options = DiscoveryOptions {
//!         network: Some("192.168.1".to_string()),
//!         resolve_neighbors: true,
//!         ..DiscoveryOptions::default()
//!     };
//!     let (_stop, interrupt) = watch::channel(false);
//!     let report = discovery.run(&options, interrupt, |_| {}).await.unwrap();
//!
//!     println!("{} active hosts", report.active.len());
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Network specifiers, target expansion and run identifiers
//! - [`probe`] - The `Prober` trait, the ping prober and the concurrent sweep
//! - [`neighbor`] - Neighbor-table command selection and parsing
//! - [`mask`] - Privacy masking of addresses
//! - [`discovery`] - The orchestrator tying the stages together
//! - [`exec`] - External command execution
//! - [`config`] - Settings file handling
//! - [`error`] - Error types and exit codes
//! - [`output`] - Output formatting utilities

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exec;
pub mod logging;
pub mod mask;
pub mod neighbor;
pub mod net;
pub mod output;
pub mod probe;
pub mod types;

// Re-export commonly used types
pub use discovery::{Discovery, DiscoveryEvent, DiscoveryOptions, DiscoveryReport};
pub use error::{CliError, DiscoveryError};
pub use mask::Privacy;
pub use neighbor::{NeighborReader, NeighborTable, OsFamily};
pub use probe::{PingProber, Prober};
pub use types::{expand, NetworkSpec, SweepId, TargetError};
