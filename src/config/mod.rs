//! Configuration management for lansweep.
//!
//! Provides XDG-compliant settings storage. Values resolve in the order
//! command-line flag, environment variable, settings file, built-in default.

mod settings;

pub use settings::{parse_seconds, AppSettings, Paths};
