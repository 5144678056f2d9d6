//! Core trait for probe implementations.

use crate::HopResult;
use async_trait::async_trait;

/// One self-contained probe of a single TTL.
///
/// An implementation owns everything a probe needs (socket acquisition,
/// packet construction, response matching, its timeout) and always resolves
/// to exactly one [`HopResult`]: probe-scoped failures surface as a
/// timed-out hop, never as an error. The execution policies are written
/// against this seam so they can be driven by scripted probers in tests.
#[async_trait]
pub trait HopProber: Send + Sync {
    /// Probes the path at the given TTL.
    async fn probe(&self, ttl: u8) -> HopResult;
}
