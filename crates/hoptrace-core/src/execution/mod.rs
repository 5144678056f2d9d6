//! Execution policies for hop discovery.
//!
//! Provides both parallel and serial probe scheduling.

pub mod parallel;
pub mod serial;

pub use parallel::trace_parallel;
pub use serial::trace_serial;

use crate::{HopProber, HopResult, TraceError, TraceParams};

/// Runs a trace with the policy selected in `params`.
pub async fn trace<P: HopProber + ?Sized>(
    prober: &P,
    params: &TraceParams,
) -> Result<Vec<HopResult>, TraceError> {
    match params.policy {
        crate::ProbePolicy::Parallel => trace_parallel(prober, params).await,
        crate::ProbePolicy::Serial => trace_serial(prober, params).await,
    }
}
