//! Network specifier parsing and target expansion.
//!
//! Supports two forms:
//! - Three-octet prefixes ("192.168.1"), meaning hosts .1 through .254
//! - IPv4 CIDR notation ("192.168.1.0/24"), meaning the usable host range

use ipnetwork::{IpNetwork, Ipv4Network};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Default cap on the number of hosts a CIDR specifier may expand to.
pub const DEFAULT_MAX_HOSTS: usize = 4096;

/// Error type for network specifier parsing and expansion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid network prefix '{0}' (expected three octets, e.g. 192.168.1)")]
    InvalidPrefix(String),
    #[error("invalid CIDR notation: {0}")]
    InvalidCidr(String),
    #[error("unsupported address family in '{0}': only IPv4 networks can be swept")]
    UnsupportedFamily(String),
    #[error("network too large: {count} hosts (max: {max})")]
    NetworkTooLarge { count: u64, max: usize },
}

/// A validated network specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkSpec {
    /// Implicit /24 given by its first three octets.
    Prefix([u8; 3]),
    /// An explicit IPv4 CIDR block.
    Cidr(Ipv4Network),
}

impl NetworkSpec {
    /// Parse a network specifier from a string.
    ///
    /// Anything containing a slash is treated as CIDR; everything else must be
    /// a three-octet prefix.
    pub fn parse(s: &str) -> Result<Self, TargetError> {
        let s = s.trim();

        if s.contains('/') {
            let network: IpNetwork = s
                .parse()
                .map_err(|_| TargetError::InvalidCidr(s.to_string()))?;

            return match network {
                IpNetwork::V4(net) => Ok(Self::Cidr(net)),
                IpNetwork::V6(_) => Err(TargetError::UnsupportedFamily(s.to_string())),
            };
        }

        let octets: Vec<&str> = s.split('.').collect();
        if octets.len() != 3 {
            return Err(TargetError::InvalidPrefix(s.to_string()));
        }

        let mut prefix = [0u8; 3];
        for (slot, part) in prefix.iter_mut().zip(&octets) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TargetError::InvalidPrefix(s.to_string()));
            }
            *slot = part
                .parse()
                .map_err(|_| TargetError::InvalidPrefix(s.to_string()))?;
        }

        Ok(Self::Prefix(prefix))
    }

    /// The /24 that contains `addr`, as a prefix specifier.
    pub fn enclosing_prefix(addr: Ipv4Addr) -> Self {
        let [a, b, c, _] = addr.octets();
        Self::Prefix([a, b, c])
    }

    /// Number of usable host addresses in this network.
    ///
    /// Network and broadcast addresses are excluded for prefixes shorter than
    /// /31; /31 and /32 blocks count every address.
    pub fn host_count(&self) -> u64 {
        match self {
            Self::Prefix(_) => 254,
            Self::Cidr(net) => {
                let total = 1u64 << (32 - u32::from(net.prefix()));
                if net.prefix() < 31 {
                    total - 2
                } else {
                    total
                }
            }
        }
    }

    /// Expand into an ascending list of candidate addresses.
    ///
    /// CIDR expansion fails with [`TargetError::NetworkTooLarge`] rather than
    /// truncating when the host count exceeds `max_hosts`.
    pub fn expand(&self, max_hosts: usize) -> Result<Vec<Ipv4Addr>, TargetError> {
        match self {
            Self::Prefix([a, b, c]) => {
                Ok((1..=254).map(|d| Ipv4Addr::new(*a, *b, *c, d)).collect())
            }
            Self::Cidr(net) => {
                let count = self.host_count();
                if count > max_hosts as u64 {
                    return Err(TargetError::NetworkTooLarge { count, max: max_hosts });
                }

                let network = net.network();
                let broadcast = net.broadcast();
                let skip_edges = net.prefix() < 31;

                Ok(net
                    .iter()
                    .filter(|addr| !skip_edges || (*addr != network && *addr != broadcast))
                    .collect())
            }
        }
    }
}

/// Parse `specifier` and expand it in one step.
pub fn expand(specifier: &str, max_hosts: usize) -> Result<Vec<Ipv4Addr>, TargetError> {
    NetworkSpec::parse(specifier)?.expand(max_hosts)
}

impl FromStr for NetworkSpec {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NetworkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix([a, b, c]) => write!(f, "{}.{}.{}.0/24", a, b, c),
            Self::Cidr(net) => write!(f, "{}/{}", net.network(), net.prefix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_expands_to_254_hosts() {
        let targets = expand("192.168.1", DEFAULT_MAX_HOSTS).unwrap();
        assert_eq!(targets.len(), 254);
        assert_eq!(targets[0], Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(targets[253], Ipv4Addr::new(192, 168, 1, 254));
        assert!(targets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_cidr_slash_30() {
        let targets = expand("192.168.1.0/30", DEFAULT_MAX_HOSTS).unwrap();
        assert_eq!(
            targets,
            vec![Ipv4Addr::new(192, 168, 1, 1), Ipv4Addr::new(192, 168, 1, 2)]
        );
    }

    #[test]
    fn test_cidr_host_bits_are_ignored() {
        let targets = expand("10.0.0.77/29", DEFAULT_MAX_HOSTS).unwrap();
        assert_eq!(targets.len(), 6);
        assert_eq!(targets[0], Ipv4Addr::new(10, 0, 0, 73));
        assert_eq!(targets[5], Ipv4Addr::new(10, 0, 0, 78));

        let targets = expand("192.168.1.10/30", DEFAULT_MAX_HOSTS).unwrap();
        assert_eq!(
            targets,
            vec![Ipv4Addr::new(192, 168, 1, 9), Ipv4Addr::new(192, 168, 1, 10)]
        );
    }

    #[test]
    fn test_cidr_counts_match_usable_range() {
        for prefix in 20u8..=30 {
            let spec = format!("172.16.0.0/{}", prefix);
            let targets = expand(&spec, DEFAULT_MAX_HOSTS).unwrap();
            assert_eq!(targets.len() as u64, (1u64 << (32 - prefix)) - 2, "{}", spec);
        }
    }

    #[test]
    fn test_cidr_slash_31_and_32() {
        assert_eq!(expand("10.1.1.0/31", 16).unwrap().len(), 2);
        assert_eq!(
            expand("10.1.1.9/32", 16).unwrap(),
            vec![Ipv4Addr::new(10, 1, 1, 9)]
        );
    }

    #[test]
    fn test_network_too_large() {
        let result = expand("10.0.0.0/8", 100);
        assert_eq!(
            result,
            Err(TargetError::NetworkTooLarge { count: 16_777_214, max: 100 })
        );
    }

    #[test]
    fn test_network_exactly_at_limit() {
        assert_eq!(expand("10.0.0.0/20", 4094).unwrap().len(), 4094);
        assert!(expand("10.0.0.0/20", 4093).is_err());
    }

    #[test]
    fn test_ipv6_rejected() {
        let result = NetworkSpec::parse("fe80::/64");
        assert!(matches!(result, Err(TargetError::UnsupportedFamily(_))));
    }

    #[test]
    fn test_bad_cidr() {
        assert!(matches!(
            NetworkSpec::parse("192.168.1.0/40"),
            Err(TargetError::InvalidCidr(_))
        ));
        assert!(matches!(
            NetworkSpec::parse("nope/24"),
            Err(TargetError::InvalidCidr(_))
        ));
    }

    #[test]
    fn test_bad_prefix() {
        for bad in ["999.1.1", "192.168", "192.168.1.1", "a.b.c", "1..2", "+1.2.3"] {
            assert!(
                matches!(NetworkSpec::parse(bad), Err(TargetError::InvalidPrefix(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(NetworkSpec::parse("10.0.5").unwrap().to_string(), "10.0.5.0/24");
        assert_eq!(
            NetworkSpec::parse("10.0.5.9/28").unwrap().to_string(),
            "10.0.5.0/28"
        );
    }

    #[test]
    fn test_enclosing_prefix() {
        let spec = NetworkSpec::enclosing_prefix(Ipv4Addr::new(192, 168, 7, 42));
        assert_eq!(spec, NetworkSpec::Prefix([192, 168, 7]));
    }
}
