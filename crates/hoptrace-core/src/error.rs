//! Error types for trace operations.

use std::net::IpAddr;
use thiserror::Error;

/// Main error type for trace operations.
#[derive(Error, Debug)]
pub enum TraceError {
    // Socket/IO errors
    #[error("Failed to create socket: {0}")]
    SocketCreation(#[source] std::io::Error),

    #[error("Failed to send probe: {0}")]
    SendFailed(#[source] std::io::Error),

    // DNS errors
    #[error("Failed to resolve destination {host}: {source}")]
    Resolution {
        host: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // Address errors
    #[error("Probing {0} is not supported: only IPv4 destinations can be traced")]
    UnsupportedAddress(IpAddr),

    // Configuration errors
    #[error("Invalid max hops: {0} (must be at least 1)")]
    InvalidMaxHops(u8),

    #[error("Invalid probe timeout: must be greater than zero")]
    InvalidTimeout,

    #[error("Unknown probe policy: {0}")]
    UnknownPolicy(String),
}

impl TraceError {
    /// Returns true if this error is scoped to a single probe.
    ///
    /// Probe-scoped errors degrade one hop into a timed-out result rather
    /// than aborting the whole trace. Everything else is fatal before any
    /// probe is sent.
    pub fn is_probe_scoped(&self) -> bool {
        matches!(self, Self::SocketCreation(_) | Self::SendFailed(_))
    }
}

/// Result type alias for trace operations.
pub type TraceResult<T> = Result<T, TraceError>;
