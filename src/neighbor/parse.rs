//! Parsers for the three neighbor-table text formats.

use super::NeighborTable;
use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

const IPV4: &str = r"\d{1,3}(?:\.\d{1,3}){3}";

fn bsd_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"\(({IPV4})\) at ([0-9A-Fa-f]{{1,2}}(?::[0-9A-Fa-f]{{1,2}}){{5}}|\(incomplete\))"
        ))
        .expect("static BSD pattern")
    })
}

fn windows_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)^\s*({IPV4})\s+([0-9a-f]{{2}}(?:-[0-9a-f]{{2}}){{5}})\s+(?:dynamic|static)\b"
        ))
        .expect("static Windows pattern")
    })
}

fn linux_neigh_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*({IPV4})\s.*\blladdr\s+([0-9A-Fa-f]{{1,2}}(?::[0-9A-Fa-f]{{1,2}}){{5}})\b"
        ))
        .expect("static ip-neighbor pattern")
    })
}

fn linux_arp_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*({IPV4})\s+\S+\s+([0-9A-Fa-f]{{2}}(?::[0-9A-Fa-f]{{2}}){{5}})\b"
        ))
        .expect("static legacy arp pattern")
    })
}

/// Normalize a link-layer literal to lowercase, colon-separated, two-digit
/// groups. Accepts `:` or `-` separators.
pub fn normalize_link_address(raw: &str) -> Option<String> {
    let groups: Vec<&str> = raw.split([':', '-']).collect();
    if groups.len() != 6 {
        return None;
    }

    let mut normalized = Vec::with_capacity(6);
    for group in groups {
        if group.is_empty() || group.len() > 2 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        normalized.push(format!("{:0>2}", group.to_ascii_lowercase()));
    }
    Some(normalized.join(":"))
}

fn insert(table: &mut NeighborTable, ip: &str, mac: &str) {
    let (Ok(ip), Some(mac)) = (ip.parse::<Ipv4Addr>(), normalize_link_address(mac)) else {
        return;
    };
    table.insert(ip, mac);
}

/// `arp -an` on macOS and the BSDs:
/// `? (192.168.1.1) at aa:bb:cc:dd:ee:ff on en0 ifscope [ethernet]`
pub fn parse_bsd(output: &str) -> NeighborTable {
    let mut table = NeighborTable::new();
    for line in output.lines() {
        let Some(caps) = bsd_pattern().captures(line) else {
            continue;
        };
        if &caps[2] == "(incomplete)" {
            continue;
        }
        insert(&mut table, &caps[1], &caps[2]);
    }
    table
}

/// `arp -a` on Windows:
/// `  192.168.1.1          aa-bb-cc-dd-ee-ff     dynamic`
pub fn parse_windows(output: &str) -> NeighborTable {
    let mut table = NeighborTable::new();
    for line in output.lines() {
        if let Some(caps) = windows_pattern().captures(line) {
            insert(&mut table, &caps[1], &caps[2]);
        }
    }
    table
}

/// `ip neighbor` output, falling back to the legacy `arp -n` layout when no
/// `lladdr` rows are present.
pub fn parse_linux(output: &str) -> NeighborTable {
    let mut table = NeighborTable::new();
    for line in output.lines() {
        if let Some(caps) = linux_neigh_pattern().captures(line) {
            insert(&mut table, &caps[1], &caps[2]);
        }
    }

    if table.is_empty() {
        for line in output.lines() {
            if let Some(caps) = linux_arp_pattern().captures(line) {
                insert(&mut table, &caps[1], &caps[2]);
            }
        }
    }

    table
}
