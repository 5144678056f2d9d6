//! Internet checksum (RFC 1071) for ICMP messages.

/// Computes the 16-bit one's-complement checksum of `data`.
///
/// The buffer must have its checksum field zeroed. Words are summed
/// big-endian; a trailing odd byte is padded with a zero low byte; carries
/// out of bit 16 are folded back in until none remain.
pub fn internet_checksum(data: &[u8]) -> u16 {
    !fold_sum(data)
}

/// Returns true when `data`, summed with its checksum field in place,
/// folds to all ones.
pub fn verify(data: &[u8]) -> bool {
    fold_sum(data) == 0xFFFF
}

fn fold_sum(data: &[u8]) -> u16 {
    let mut sum = 0u32;

    let mut i = 0;
    while i + 1 < data.len() {
        sum += u16::from_be_bytes([data[i], data[i + 1]]) as u32;
        i += 2;
    }
    if i < data.len() {
        sum += (data[i] as u32) << 8;
    }

    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    sum as u16
}
