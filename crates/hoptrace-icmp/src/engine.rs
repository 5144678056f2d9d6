//! Per-TTL probe engine.

use crate::correlate::{Correlation, correlate};
use crate::packet::{build_echo_request, probe_identifier};
use crate::transport::{ProbeSocket, ProbeTransport};
use async_trait::async_trait;
use hoptrace_core::{HopProber, HopReply, HopResult, TraceError};
use std::net::IpAddr;
use std::time::Duration;
use tokio::time::{Instant, timeout};
use tracing::{debug, trace};

/// Room for an IP header, an ICMP error header, and the quoted probe.
const RECV_BUFFER_LEN: usize = 1024;

/// ICMP implementation of [`HopProber`].
///
/// Opens one raw socket per probed TTL. Socket and send failures resolve
/// that hop as a timeout; the rest of the trace is unaffected.
pub struct IcmpProber {
    destination: IpAddr,
    timeout: Duration,
}

impl IcmpProber {
    /// Creates a prober aimed at `destination`.
    pub fn new(destination: IpAddr, timeout: Duration) -> Result<Self, TraceError> {
        if destination.is_ipv6() {
            return Err(TraceError::UnsupportedAddress(destination));
        }
        Ok(Self {
            destination,
            timeout,
        })
    }
}

#[async_trait]
impl HopProber for IcmpProber {
    async fn probe(&self, ttl: u8) -> HopResult {
        let transport = match ProbeSocket::open(ttl) {
            Ok(t) => t,
            Err(e) => {
                debug!(ttl = ttl, error = %e, "Could not open probe socket");
                return HopResult::timeout(ttl);
            }
        };
        probe_with_transport(transport, self.destination, ttl, self.timeout).await
    }
}

/// Runs one probe over an already-open transport.
///
/// Resolves exactly once: to a reply if the correlator matches an inbound
/// message before the timer fires, to a timeout otherwise. Late messages
/// cannot re-resolve the probe because the listener is gone once this
/// returns. The transport drops on every path, closing its socket.
pub(crate) async fn probe_with_transport<T: ProbeTransport>(
    mut transport: T,
    destination: IpAddr,
    ttl: u8,
    probe_timeout: Duration,
) -> HopResult {
    let identifier = probe_identifier(ttl);
    let packet = build_echo_request(identifier, ttl);

    let sent_at = Instant::now();
    if let Err(e) = transport.send(&packet, destination).await {
        debug!(ttl = ttl, error = %e, "Probe send failed");
        return HopResult::timeout(ttl);
    }
    trace!(ttl = ttl, identifier = identifier, "Sent Echo Request");

    let reply = timeout(probe_timeout, async {
        let mut buf = [0u8; RECV_BUFFER_LEN];
        loop {
            let (len, source) = match transport.recv(&mut buf).await {
                Ok(read) => read,
                Err(e) => {
                    debug!(ttl = ttl, error = %e, "Probe read failed");
                    return None;
                }
            };

            match correlate(&buf[..len], source, identifier, destination) {
                Correlation::NotMine => continue,
                Correlation::Intermediate => {
                    return Some(HopReply {
                        from: source,
                        rtt: sent_at.elapsed(),
                        reached: false,
                    });
                }
                Correlation::Destination => {
                    return Some(HopReply {
                        from: source,
                        rtt: sent_at.elapsed(),
                        reached: true,
                    });
                }
            }
        }
    })
    .await;

    match reply {
        Ok(Some(reply)) => HopResult {
            ttl,
            reply: Some(reply),
        },
        Ok(None) => HopResult::timeout(ttl),
        Err(_) => {
            debug!(ttl = ttl, "Probe timed out");
            HopResult::timeout(ttl)
        }
    }
}
