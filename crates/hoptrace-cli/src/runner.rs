//! Trace runner that wires resolution, probing, and reporting together.

use crate::geo::{self, LocationClient};
use crate::resolve;
use hoptrace_core::{TraceConfig, TraceError, TraceReport, execution};
use hoptrace_icmp::IcmpProber;
use tracing::{debug, info, warn};

/// Run the full trace and assemble the report.
pub async fn run_trace(config: TraceConfig) -> Result<TraceReport, TraceError> {
    info!(
        target = %config.target,
        max_hops = config.params.max_hops,
        policy = %config.params.policy,
        "Starting trace"
    );

    let resolved = resolve::resolve_destination(&config.target).await?;
    debug!("Resolved {} to {}", config.target, resolved);

    let prober = IcmpProber::new(resolved, config.params.probe_timeout)?;
    let results = execution::trace(&prober, &config.params).await?;

    let mut report = TraceReport::from_results(config.target, resolved, results);

    if config.lookup_location {
        annotate_report(&mut report).await;
    }

    Ok(report)
}

/// Attach location strings to the answered hops.
///
/// Annotation is best-effort: a client that cannot be built is logged and
/// skipped, leaving the report without locations.
async fn annotate_report(report: &mut TraceReport) {
    let client = match LocationClient::new() {
        Ok(client) => client,
        Err(e) => {
            warn!("Failed to create location client: {}", e);
            return;
        }
    };
    geo::annotate_hops(&client, &mut report.hops).await;
}
