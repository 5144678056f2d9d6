//! Matches inbound ICMP messages back to an outstanding probe.

use crate::packet::{ECHO_REQUEST, ICMP_HEADER_LEN};
use pnet_packet::icmp::{IcmpPacket, IcmpTypes};
use pnet_packet::ip::IpNextHeaderProtocols;
use pnet_packet::ipv4::Ipv4Packet;
use std::net::IpAddr;
use tracing::trace;

/// How an inbound message relates to the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Correlation {
    /// Not an answer to this probe; keep listening.
    NotMine,
    /// A router along the path answered.
    Intermediate,
    /// The destination answered.
    Destination,
}

/// Decides whether a raw IP datagram answers the probe with `identifier`
/// aimed at `destination`.
///
/// An Echo Reply carries the identifier in its own header; a Time Exceeded
/// message quotes the expired Echo Request (IP header included) in its
/// payload, so the identifier sits past two IP headers there. Anything
/// malformed, truncated, or foreign is `NotMine` - the probe keeps
/// listening.
pub fn correlate(
    data: &[u8],
    source: IpAddr,
    identifier: u16,
    destination: IpAddr,
) -> Correlation {
    let Some(ip_packet) = Ipv4Packet::new(data) else {
        return Correlation::NotMine;
    };
    if ip_packet.get_next_level_protocol() != IpNextHeaderProtocols::Icmp {
        return Correlation::NotMine;
    }

    let ip_header_len = (ip_packet.get_header_length() as usize) * 4;
    if data.len() < ip_header_len + ICMP_HEADER_LEN {
        return Correlation::NotMine;
    }
    let icmp_data = &data[ip_header_len..];
    let Some(icmp_packet) = IcmpPacket::new(icmp_data) else {
        return Correlation::NotMine;
    };

    match icmp_packet.get_icmp_type() {
        IcmpTypes::EchoReply => {
            let id = u16::from_be_bytes([icmp_data[4], icmp_data[5]]);
            if id != identifier {
                trace!(expected = identifier, actual = id, "Foreign Echo Reply");
                return Correlation::NotMine;
            }
            // The destination is the only party that echoes our request,
            // whichever address the reply arrives from.
            Correlation::Destination
        }
        IcmpTypes::TimeExceeded => match quoted_request_identifier(icmp_data) {
            Some(id) if id == identifier => {
                if source == destination {
                    Correlation::Destination
                } else {
                    Correlation::Intermediate
                }
            }
            Some(id) => {
                trace!(expected = identifier, actual = id, "Foreign Time Exceeded");
                Correlation::NotMine
            }
            None => Correlation::NotMine,
        },
        _ => Correlation::NotMine,
    }
}

/// Identifier of the Echo Request quoted inside a Time Exceeded payload,
/// if the quote is intact and really an Echo Request.
fn quoted_request_identifier(icmp_data: &[u8]) -> Option<u16> {
    // Error header (8) + quoted IP header (at least 20) + quoted Echo header (8)
    if icmp_data.len() < ICMP_HEADER_LEN + 20 + ICMP_HEADER_LEN {
        return None;
    }

    let original_ip_data = &icmp_data[ICMP_HEADER_LEN..];
    let original_ip = Ipv4Packet::new(original_ip_data)?;
    let orig_ihl = (original_ip.get_header_length() as usize) * 4;
    if original_ip_data.len() < orig_ihl + ICMP_HEADER_LEN {
        return None;
    }

    let original_payload = &original_ip_data[orig_ihl..];
    if original_payload[0] != ECHO_REQUEST {
        return None;
    }

    Some(u16::from_be_bytes([original_payload[4], original_payload[5]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{ECHO_REPLY, TIME_EXCEEDED};
    use std::net::IpAddr;

    const ROUTER: &str = "10.1.1.1";
    const DESTINATION: &str = "93.184.216.34";

    fn router() -> IpAddr {
        ROUTER.parse().unwrap()
    }

    fn destination() -> IpAddr {
        DESTINATION.parse().unwrap()
    }

    /// 20-byte IPv4 header + Echo Reply carrying `identifier`.
    fn echo_reply_datagram(identifier: u16) -> Vec<u8> {
        let mut data = vec![0u8; 32];
        data[0] = 0x45;
        data[9] = 1;
        data[20] = ECHO_REPLY;
        data[24..26].copy_from_slice(&identifier.to_be_bytes());
        data
    }

    /// 20-byte IPv4 header + Time Exceeded quoting an Echo Request that
    /// carried `identifier`.
    fn time_exceeded_datagram(identifier: u16) -> Vec<u8> {
        let mut data = vec![0u8; 20 + 8 + 20 + 12];
        data[0] = 0x45;
        data[9] = 1;
        data[20] = TIME_EXCEEDED;
        // quoted original datagram starts at 28
        data[28] = 0x45;
        data[37] = 1;
        data[48] = ECHO_REQUEST;
        data[52..54].copy_from_slice(&identifier.to_be_bytes());
        data
    }

    #[test]
    fn test_echo_reply_identifier_offset() {
        let data = echo_reply_datagram(0xBEEF);
        assert_eq!(u16::from_be_bytes([data[24], data[25]]), 0xBEEF);
    }

    #[test]
    fn test_time_exceeded_identifier_offset() {
        let data = time_exceeded_datagram(0xBEEF);
        assert_eq!(u16::from_be_bytes([data[52], data[53]]), 0xBEEF);
    }

    #[test]
    fn test_echo_reply_match_is_destination() {
        let data = echo_reply_datagram(0x1234);
        assert_eq!(
            correlate(&data, destination(), 0x1234, destination()),
            Correlation::Destination
        );
    }

    #[test]
    fn test_echo_reply_from_other_source_still_destination() {
        let data = echo_reply_datagram(0x1234);
        assert_eq!(
            correlate(&data, router(), 0x1234, destination()),
            Correlation::Destination
        );
    }

    #[test]
    fn test_time_exceeded_match_is_intermediate() {
        let data = time_exceeded_datagram(0x1234);
        assert_eq!(
            correlate(&data, router(), 0x1234, destination()),
            Correlation::Intermediate
        );
    }

    #[test]
    fn test_time_exceeded_from_destination_is_destination() {
        let data = time_exceeded_datagram(0x1234);
        assert_eq!(
            correlate(&data, destination(), 0x1234, destination()),
            Correlation::Destination
        );
    }

    #[test]
    fn test_mismatched_identifiers_are_not_mine() {
        let reply = echo_reply_datagram(0x1111);
        assert_eq!(
            correlate(&reply, destination(), 0x2222, destination()),
            Correlation::NotMine
        );

        let exceeded = time_exceeded_datagram(0x1111);
        assert_eq!(
            correlate(&exceeded, router(), 0x2222, destination()),
            Correlation::NotMine
        );
    }

    #[test]
    fn test_truncated_buffers_are_not_mine() {
        assert_eq!(
            correlate(&[], router(), 0x1234, destination()),
            Correlation::NotMine
        );
        assert_eq!(
            correlate(&[0x45; 10], router(), 0x1234, destination()),
            Correlation::NotMine
        );

        // Time Exceeded cut off before the quoted Echo header
        let mut data = time_exceeded_datagram(0x1234);
        data.truncate(40);
        assert_eq!(
            correlate(&data, router(), 0x1234, destination()),
            Correlation::NotMine
        );
    }

    #[test]
    fn test_non_icmp_protocol_is_not_mine() {
        let mut data = echo_reply_datagram(0x1234);
        data[9] = 6;
        assert_eq!(
            correlate(&data, destination(), 0x1234, destination()),
            Correlation::NotMine
        );
    }

    #[test]
    fn test_foreign_icmp_type_is_not_mine() {
        let mut data = echo_reply_datagram(0x1234);
        data[20] = 3;
        assert_eq!(
            correlate(&data, router(), 0x1234, destination()),
            Correlation::NotMine
        );
    }

    #[test]
    fn test_quoted_non_echo_request_is_not_mine() {
        // Quoting an Echo Reply instead of our request
        let mut data = time_exceeded_datagram(0x1234);
        data[48] = ECHO_REPLY;
        assert_eq!(
            correlate(&data, router(), 0x1234, destination()),
            Correlation::NotMine
        );
    }

    #[test]
    fn test_offsets_scale_with_header_length() {
        // Outer header with options (IHL 6 = 24 bytes) shifts everything
        let mut data = vec![0u8; 24 + 8 + 4];
        data[0] = 0x46;
        data[9] = 1;
        data[24] = ECHO_REPLY;
        data[28..30].copy_from_slice(&0x5678u16.to_be_bytes());

        assert_eq!(
            correlate(&data, destination(), 0x5678, destination()),
            Correlation::Destination
        );

        // Quoted header with options inside a Time Exceeded
        let mut data = vec![0u8; 20 + 8 + 24 + 8];
        data[0] = 0x45;
        data[9] = 1;
        data[20] = TIME_EXCEEDED;
        data[28] = 0x46;
        data[52] = ECHO_REQUEST;
        data[56..58].copy_from_slice(&0x5678u16.to_be_bytes());

        assert_eq!(
            correlate(&data, router(), 0x5678, destination()),
            Correlation::Intermediate
        );
    }
}
