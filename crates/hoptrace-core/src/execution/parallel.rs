//! Parallel trace execution.
//!
//! Launches one probe per TTL all at once and joins them all.

use crate::{HopProber, HopResult, TraceError, TraceParams};
use futures::future::join_all;
use tracing::debug;

/// Executes a trace by probing every TTL concurrently.
///
/// All probes from TTL 1 through `max_hops` are launched together and joined
/// as a barrier. Probes complete in whatever order the network answers, but
/// `join_all` yields results in launch order, so the output is always
/// ascending by TTL. Probes past the destination still run to completion;
/// report clipping discards them afterwards.
pub async fn trace_parallel<P: HopProber + ?Sized>(
    prober: &P,
    params: &TraceParams,
) -> Result<Vec<HopResult>, TraceError> {
    params.validate()?;

    debug!(max_hops = params.max_hops, "Launching all probes");
    let probes = (1..=params.max_hops).map(|ttl| prober.probe(ttl));
    let results = join_all(probes).await;

    for result in &results {
        match &result.reply {
            Some(reply) => debug!(
                ttl = result.ttl,
                from = %reply.from,
                rtt_ms = reply.rtt.as_secs_f64() * 1000.0,
                reached = reply.reached,
                "Probe answered"
            ),
            None => debug!(ttl = result.ttl, "Probe timed out"),
        }
    }

    Ok(results)
}
