//! Core type definitions.
//!
//! Network specifiers are validated once at parse time so the rest of the
//! pipeline only ever sees well-formed IPv4 targets.

mod sweep_id;
mod target;

pub use sweep_id::SweepId;
pub use target::{expand, NetworkSpec, TargetError, DEFAULT_MAX_HOSTS};
