//! Privacy masking for host identifiers.
//!
//! Addresses and link-layer addresses are redacted by default; the host
//! suffix is hidden while the network-identifying prefix is kept.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Mask the last octet of an IPv4 literal.
///
/// Input that is not four dot-separated decimal octets becomes `x.x.x.x`.
pub fn mask_address(ip: &str) -> String {
    match ip.parse::<Ipv4Addr>() {
        Ok(addr) => {
            let [a, b, c, _] = addr.octets();
            format!("{}.{}.{}.x", a, b, c)
        }
        Err(_) => "x.x.x.x".to_string(),
    }
}

/// Mask the last three groups of a colon-separated link-layer address.
///
/// Input that does not split into exactly six groups becomes
/// `xx:xx:xx:xx:xx:xx`.
pub fn mask_link_address(mac: &str) -> String {
    let groups: Vec<&str> = mac.split(':').collect();
    if groups.len() != 6 {
        return "xx:xx:xx:xx:xx:xx".to_string();
    }
    format!("{}:{}:{}:xx:xx:xx", groups[0], groups[1], groups[2])
}

/// How host identifiers are rendered in output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    /// Hide host-identifying suffixes.
    #[default]
    Masked,
    /// Print identifiers in full.
    Reveal,
}

impl Privacy {
    pub fn from_reveal(reveal: bool) -> Self {
        if reveal {
            Self::Reveal
        } else {
            Self::Masked
        }
    }

    pub fn is_reveal(self) -> bool {
        self == Self::Reveal
    }

    /// Render an IPv4 address.
    pub fn address(self, addr: Ipv4Addr) -> String {
        match self {
            Self::Reveal => addr.to_string(),
            Self::Masked => mask_address(&addr.to_string()),
        }
    }

    /// Render a link-layer address.
    pub fn link_address(self, mac: &str) -> String {
        match self {
            Self::Reveal => mac.to_string(),
            Self::Masked => mask_link_address(mac),
        }
    }
}
