//! ICMP Echo Request construction.

use crate::checksum::internet_checksum;

/// ICMP Echo Reply type.
pub const ECHO_REPLY: u8 = 0;
/// ICMP Echo Request type.
pub const ECHO_REQUEST: u8 = 8;
/// ICMP Time Exceeded type.
pub const TIME_EXCEEDED: u8 = 11;

/// The Echo header is always 8 bytes.
pub const ICMP_HEADER_LEN: usize = 8;
/// Zeroed payload appended to every Echo Request.
pub const PAYLOAD_LEN: usize = 4;

/// Identifier for the probe at `ttl`.
///
/// Each concurrently outstanding probe gets its own identifier without a
/// shared counter. Only the low 16 bits of the pid survive, so identifiers
/// are not unique across processes.
pub fn probe_identifier(ttl: u8) -> u16 {
    derive_identifier(std::process::id(), ttl)
}

fn derive_identifier(pid: u32, ttl: u8) -> u16 {
    (pid as u16) ^ (ttl as u16)
}

/// Builds an ICMP Echo Request carrying `identifier`, with the sequence
/// field set to the TTL. The checksum is computed over the whole packet
/// last.
pub fn build_echo_request(identifier: u16, ttl: u8) -> Vec<u8> {
    let mut packet = vec![0u8; ICMP_HEADER_LEN + PAYLOAD_LEN];

    packet[0] = ECHO_REQUEST;
    packet[1] = 0;
    packet[4..6].copy_from_slice(&identifier.to_be_bytes());
    packet[6..8].copy_from_slice(&(ttl as u16).to_be_bytes());

    let sum = internet_checksum(&packet);
    packet[2..4].copy_from_slice(&sum.to_be_bytes());

    packet
}
