//! Report types for trace output.

use crate::HopResult;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A single hop in the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportedHop {
    /// The TTL for this hop.
    pub ttl: u8,
    /// The address that responded (None if the probe timed out).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<IpAddr>,
    /// Round-trip time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtt_ms: Option<f64>,
    /// Whether the probe expired without an answer.
    pub timed_out: bool,
    /// Human-readable location, filled in by the annotation pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<&HopResult> for ReportedHop {
    fn from(result: &HopResult) -> Self {
        Self {
            ttl: result.ttl,
            ip: result.reply.map(|r| r.from),
            rtt_ms: result.reply.map(|r| r.rtt.as_secs_f64() * 1000.0),
            timed_out: result.timed_out(),
            location: None,
        }
    }
}

/// Complete trace report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceReport {
    /// Target as given on the command line.
    pub target: String,
    /// The address the target resolved to.
    pub resolved: IpAddr,
    /// Hops in TTL order, clipped at the destination.
    pub hops: Vec<ReportedHop>,
}

impl TraceReport {
    /// Builds a report from raw results, clipping past the destination.
    pub fn from_results(target: String, resolved: IpAddr, results: Vec<HopResult>) -> Self {
        let hops = clip_to_destination(results)
            .iter()
            .map(ReportedHop::from)
            .collect();
        Self {
            target,
            resolved,
            hops,
        }
    }

    /// Serializes the report to JSON with indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Keeps results from TTL 1 up to and including the first hop that reached
/// the destination. Timed-out hops before it are kept; everything after it
/// is discarded.
pub fn clip_to_destination(results: Vec<HopResult>) -> Vec<HopResult> {
    let mut clipped = Vec::with_capacity(results.len());
    for result in results {
        let reached = result.is_reached();
        clipped.push(result);
        if reached {
            break;
        }
    }
    clipped
}
