//! Core types for trace operations.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// A response captured for a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopReply {
    /// The address that answered the probe.
    pub from: IpAddr,
    /// Round-trip time for this probe.
    pub rtt: Duration,
    /// Whether the answer came from the destination itself.
    pub reached: bool,
}

/// Outcome of probing one TTL.
///
/// A hop either timed out or produced a [`HopReply`]. Once constructed it is
/// never modified; the engine resolves each probe exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopResult {
    /// The TTL that was used for this probe.
    pub ttl: u8,
    /// The reply, or `None` when the probe expired.
    pub reply: Option<HopReply>,
}

impl HopResult {
    /// A probe that expired without a matching answer.
    pub fn timeout(ttl: u8) -> Self {
        Self { ttl, reply: None }
    }

    /// A probe that was answered.
    pub fn replied(ttl: u8, from: IpAddr, rtt: Duration, reached: bool) -> Self {
        Self {
            ttl,
            reply: Some(HopReply { from, rtt, reached }),
        }
    }

    /// Whether this probe expired without an answer.
    pub fn timed_out(&self) -> bool {
        self.reply.is_none()
    }

    /// Whether this hop is the destination.
    pub fn is_reached(&self) -> bool {
        self.reply.map(|r| r.reached).unwrap_or(false)
    }
}

/// Probe scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProbePolicy {
    /// Launch every TTL at once and join them all.
    #[default]
    Parallel,
    /// Probe one TTL at a time, stopping at the destination.
    Serial,
}

impl std::fmt::Display for ProbePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbePolicy::Parallel => write!(f, "parallel"),
            ProbePolicy::Serial => write!(f, "serial"),
        }
    }
}

impl std::str::FromStr for ProbePolicy {
    type Err = crate::TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parallel" => Ok(ProbePolicy::Parallel),
            "serial" => Ok(ProbePolicy::Serial),
            _ => Err(crate::TraceError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Parameters for trace execution.
#[derive(Debug, Clone)]
pub struct TraceParams {
    /// Highest TTL to probe.
    pub max_hops: u8,
    /// Timeout for each probe.
    pub probe_timeout: Duration,
    /// Probe scheduling policy.
    pub policy: ProbePolicy,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            max_hops: 30,
            probe_timeout: Duration::from_millis(1000),
            policy: ProbePolicy::Parallel,
        }
    }
}

impl TraceParams {
    /// Validates the parameters.
    pub fn validate(&self) -> Result<(), crate::TraceError> {
        if self.max_hops == 0 {
            return Err(crate::TraceError::InvalidMaxHops(self.max_hops));
        }
        if self.probe_timeout.is_zero() {
            return Err(crate::TraceError::InvalidTimeout);
        }
        Ok(())
    }
}

/// High-level trace configuration.
#[derive(Debug, Clone)]
pub struct TraceConfig {
    /// Target hostname or IP address.
    pub target: String,
    /// Trace parameters.
    pub params: TraceParams,
    /// Whether to annotate hops with location lookups.
    pub lookup_location: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            params: TraceParams::default(),
            lookup_location: true,
        }
    }
}
