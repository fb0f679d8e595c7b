//! Error types for lansweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Component errors live
//! next to their components and are re-exported here; `CliError` wraps them
//! and maps each to a process exit code.

use std::path::PathBuf;
use thiserror::Error;

pub use crate::neighbor::NeighborError;
pub use crate::probe::ProbeError;
pub use crate::types::TargetError;

/// Exit codes for the CLI.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_ARGS: i32 = 2;
    pub const TOOL_MISSING: i32 = 3;
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that end a discovery run.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("no network given and the local address could not be detected")]
    NoDefaultNetwork,
}

/// Result type alias for discovery runs.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Top-level CLI error.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Neighbor(#[from] NeighborError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output error: {0}")]
    Output(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Discovery(DiscoveryError::Target(_)) => exit_codes::INVALID_ARGS,
            CliError::Discovery(DiscoveryError::Probe(_)) => exit_codes::TOOL_MISSING,
            CliError::Discovery(DiscoveryError::NoDefaultNetwork) => exit_codes::INVALID_ARGS,
            CliError::Neighbor(_) => exit_codes::GENERAL_ERROR,
            CliError::Config(_) => exit_codes::INVALID_ARGS,
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
            CliError::Io(_) | CliError::Output(_) => exit_codes::GENERAL_ERROR,
        }
    }
}

impl From<TargetError> for CliError {
    fn from(e: TargetError) -> Self {
        CliError::Discovery(DiscoveryError::Target(e))
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let bad_network: CliError = TargetError::InvalidCidr("x/99".to_string()).into();
        assert_eq!(bad_network.exit_code(), exit_codes::INVALID_ARGS);

        let missing: CliError =
            DiscoveryError::from(ProbeError::ToolMissing("ping".to_string())).into();
        assert_eq!(missing.exit_code(), exit_codes::TOOL_MISSING);

        let config: CliError = ConfigError::Invalid("workers".to_string()).into();
        assert_eq!(config.exit_code(), exit_codes::INVALID_ARGS);
    }

    #[test]
    fn test_messages_pass_through() {
        let err: CliError = TargetError::NetworkTooLarge { count: 65534, max: 4096 }.into();
        assert_eq!(err.to_string(), "network too large: 65534 hosts (max: 4096)");
    }
}
