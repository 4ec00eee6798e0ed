//! Reverse-address labels used as DNSBL query prefixes.
//!
//! IPv4 addresses are written octet by octet in reverse order
//! (`1.2.3.4` → `4.3.2.1`). IPv6 addresses use the reversed nibble form
//! known from `ip6.arpa`.

use crate::DomainError;
use std::fmt::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Parses a user supplied address.
///
/// IPv4-mapped IPv6 addresses (`::ffff:1.2.3.4`) are folded into their IPv4
/// form so they hit the same DNSBL entries as the plain address.
pub fn parse_target(input: &str) -> Result<IpAddr, DomainError> {
    let trimmed = input.trim();
    trimmed
        .parse::<IpAddr>()
        .map(|ip| ip.to_canonical())
        .map_err(|_| DomainError::InvalidAddress(trimmed.to_string()))
}

pub fn reverse_label(ip: &IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => reverse_v4(v4),
        IpAddr::V6(v6) => reverse_v6(v6),
    }
}

fn reverse_v4(ip: &Ipv4Addr) -> String {
    let [a, b, c, d] = ip.octets();
    format!("{d}.{c}.{b}.{a}")
}

fn reverse_v6(ip: &Ipv6Addr) -> String {
    let mut label = String::with_capacity(63);
    for byte in ip.octets().iter().rev() {
        if !label.is_empty() {
            label.push('.');
        }
        // low nibble first
        let _ = write!(label, "{:x}.{:x}", byte & 0x0f, byte >> 4);
    }
    label
}

/// Fully qualified query name `<reverse-label>.<zone>.`
pub fn query_name(ip: &IpAddr, zone: &str) -> String {
    format!("{}.{}.", reverse_label(ip), zone.trim_end_matches('.'))
}
