//! ICMP Echo probe implementation.
//!
//! Each probe owns a raw socket for its lifetime: build an Echo Request
//! whose identifier encodes the TTL, send it, and match inbound Echo Reply
//! or Time Exceeded messages back to the probe until it resolves or times
//! out.

pub mod checksum;
pub mod correlate;
pub mod engine;
pub mod packet;
pub mod transport;

pub use correlate::{Correlation, correlate};
pub use engine::IcmpProber;
pub use packet::{build_echo_request, probe_identifier};
