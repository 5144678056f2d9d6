//! Serial trace execution.
//!
//! Probes one TTL at a time and stops at the destination.

use crate::{HopProber, HopResult, TraceError, TraceParams};
use tracing::debug;

/// Executes a trace by probing TTLs one after another.
///
/// Waits for each probe to resolve before starting the next and stops as
/// soon as a hop reaches the destination, so no probe is ever sent past it.
/// Slower end to end than the parallel policy but sends the minimum number
/// of packets.
pub async fn trace_serial<P: HopProber + ?Sized>(
    prober: &P,
    params: &TraceParams,
) -> Result<Vec<HopResult>, TraceError> {
    params.validate()?;

    let mut results = Vec::with_capacity(params.max_hops as usize);

    for ttl in 1..=params.max_hops {
        debug!(ttl = ttl, "Sending probe");
        let result = prober.probe(ttl).await;

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

        let reached = result.is_reached();
        results.push(result);

        if reached {
            debug!("Reached destination, stopping");
            break;
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every TTL it is asked to probe.
    struct RecordingProber {
        probed: Mutex<Vec<u8>>,
        reached_at: u8,
    }

    #[async_trait]
    impl HopProber for RecordingProber {
        async fn probe(&self, ttl: u8) -> HopResult {
            self.probed.lock().unwrap().push(ttl);
            if ttl == 2 {
                return HopResult::timeout(ttl);
            }
            HopResult::replied(
                ttl,
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, ttl)),
                Duration::from_millis(5),
                ttl == self.reached_at,
            )
        }
    }

    #[tokio::test]
    async fn test_stops_probing_after_destination() {
        let prober = RecordingProber {
            probed: Mutex::new(Vec::new()),
            reached_at: 5,
        };
        let params = TraceParams {
            max_hops: 30,
            ..Default::default()
        };

        let results = trace_serial(&prober, &params).await.unwrap();

        assert_eq!(results.len(), 5);
        assert!(results[4].is_reached());
        assert_eq!(*prober.probed.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_timeouts_do_not_stop_the_walk() {
        let prober = RecordingProber {
            probed: Mutex::new(Vec::new()),
            reached_at: 4,
        };
        let params = TraceParams {
            max_hops: 30,
            ..Default::default()
        };

        let results = trace_serial(&prober, &params).await.unwrap();

        assert!(results[1].timed_out());
        assert_eq!(results.len(), 4);
    }

    #[tokio::test]
    async fn test_runs_to_max_hops_without_destination() {
        let prober = RecordingProber {
            probed: Mutex::new(Vec::new()),
            reached_at: 0,
        };
        let params = TraceParams {
            max_hops: 7,
            ..Default::default()
        };

        let results = trace_serial(&prober, &params).await.unwrap();

        assert_eq!(results.len(), 7);
        assert!(!results.iter().any(|r| r.is_reached()));
    }
}
