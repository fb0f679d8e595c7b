//! Config subcommand implementation.
//!
//! Handles `lansweep config path|show`.

use crate::config::{AppSettings, Paths};
use crate::error::CliResult;
use clap::{Args, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Inspect settings.
#[derive(Args, Debug, Clone)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Settings actions.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the settings file location
    Path,

    /// Print the effective settings as JSON
    Show,
}

impl ConfigCommand {
    /// Execute the config command.
    ///
    /// `override_path` is the `--config` flag, if given.
    pub fn execute(&self, settings: &AppSettings, override_path: Option<&Path>) -> CliResult<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        match self.action {
            ConfigAction::Path => {
                let path = settings_path(override_path)?;
                writeln!(out, "{}", path.display())?;
            }
            ConfigAction::Show => {
                serde_json::to_writer_pretty(&mut out, settings)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

fn settings_path(override_path: Option<&Path>) -> CliResult<PathBuf> {
    match override_path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(Paths::discover()?.settings_file()),
    }
}
