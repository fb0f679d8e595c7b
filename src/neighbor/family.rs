//! Operating-system families and their platform-specific tooling.

use super::{parse, NeighborTable};
use crate::exec::Attempt;
use std::fmt;
use std::time::Duration;

/// The closed set of platforms whose tooling we know how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    /// macOS, iOS and the BSDs.
    Bsd,
    Windows,
    /// Linux and Android.
    Linux,
    /// Anything else; no neighbor-table support.
    Other,
}

impl OsFamily {
    /// Detect the family of the host this binary was built for.
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` style name to a family.
    pub fn from_os_name(os: &str) -> Self {
        match os {
            "macos" | "ios" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => Self::Bsd,
            "windows" => Self::Windows,
            "linux" | "android" => Self::Linux,
            _ => Self::Other,
        }
    }

    /// Neighbor-table commands to try, in order.
    pub fn neighbor_candidates(self) -> Vec<Attempt> {
        match self {
            Self::Bsd => vec![Attempt::new("arp", ["-a", "-n"])],
            Self::Windows => vec![Attempt::new("arp", ["-a"])],
            Self::Linux => vec![
                Attempt::new("ip", ["neighbor", "show"]),
                Attempt::new("arp", ["-n"]),
            ],
            Self::Other => Vec::new(),
        }
    }

    /// Parse neighbor-table output produced by one of this family's
    /// candidates.
    pub fn parse_neighbors(self, output: &str) -> NeighborTable {
        match self {
            Self::Bsd => parse::parse_bsd(output),
            Self::Windows => parse::parse_windows(output),
            Self::Linux => parse::parse_linux(output),
            Self::Other => NeighborTable::new(),
        }
    }

    /// Build a single-echo ping invocation for `target`.
    ///
    /// The per-reply wait is passed through where every ping of the family
    /// spells it the same way. The BSDs disagree (`-W` in milliseconds on
    /// macOS and FreeBSD, `-w` in seconds on OpenBSD and NetBSD), so they
    /// rely on the caller's deadline alone.
    pub fn ping_attempt(self, target: &str, timeout: Duration) -> Attempt {
        let millis = timeout.as_millis().max(1).to_string();
        match self {
            Self::Windows => Attempt::new("ping", ["-n", "1", "-w", millis.as_str(), target]),
            Self::Linux => {
                let secs = (timeout.as_secs_f64().ceil() as u64).max(1).to_string();
                Attempt::new("ping", ["-c", "1", "-W", secs.as_str(), target])
            }
            Self::Bsd | Self::Other => Attempt::new("ping", ["-c", "1", target]),
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bsd => write!(f, "BSD"),
            Self::Windows => write!(f, "Windows"),
            Self::Linux => write!(f, "Linux"),
            Self::Other => write!(f, "other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_os_name() {
        assert_eq!(OsFamily::from_os_name("macos"), OsFamily::Bsd);
        assert_eq!(OsFamily::from_os_name("freebsd"), OsFamily::Bsd);
        assert_eq!(OsFamily::from_os_name("windows"), OsFamily::Windows);
        assert_eq!(OsFamily::from_os_name("linux"), OsFamily::Linux);
        assert_eq!(OsFamily::from_os_name("haiku"), OsFamily::Other);
    }

    #[test]
    fn test_linux_prefers_ip_neighbor() {
        let candidates = OsFamily::Linux.neighbor_candidates();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].program, "ip");
        assert_eq!(candidates[1].program, "arp");
        assert!(OsFamily::Other.neighbor_candidates().is_empty());
    }

    #[test]
    fn test_ping_attempts_request_one_echo() {
        let timeout = Duration::from_millis(1500);

        let win = OsFamily::Windows.ping_attempt("10.0.0.1", timeout);
        assert_eq!(win.args, ["-n", "1", "-w", "1500", "10.0.0.1"]);

        let bsd = OsFamily::Bsd.ping_attempt("10.0.0.1", timeout);
        assert_eq!(bsd.args, ["-c", "1", "10.0.0.1"]);
        assert!(!bsd.args.iter().any(|a| a == "-W" || a == "-w"));

        let linux = OsFamily::Linux.ping_attempt("10.0.0.1", timeout);
        assert_eq!(linux.args, ["-c", "1", "-W", "2", "10.0.0.1"]);
    }

    #[test]
    fn test_parse_dispatch() {
        let line = "? (192.168.1.1) at aa:bb:cc:dd:ee:ff on en0 ifscope [ethernet]";
        assert_eq!(OsFamily::Bsd.parse_neighbors(line).len(), 1);
        assert!(OsFamily::Other.parse_neighbors(line).is_empty());
    }
}
