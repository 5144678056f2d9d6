//! Text rendering of a finished trace.

use hoptrace_core::{ReportedHop, TraceReport};

/// Render the report in classic traceroute layout.
///
/// Answered hops print the address, the rounded round-trip time, and the
/// location annotation when one was fetched. Timed-out hops print `* * *`.
pub fn render(report: &TraceReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Traceroute to {} ({})...\n\n",
        report.target, report.resolved
    ));
    for hop in &report.hops {
        out.push_str(&render_hop(hop));
        out.push('\n');
    }
    out
}

fn render_hop(hop: &ReportedHop) -> String {
    if hop.timed_out {
        return format!("{:<3} * * *", hop.ttl);
    }

    let ip = hop.ip.map(|ip| ip.to_string()).unwrap_or_default();
    let time = hop
        .rtt_ms
        .map(|ms| format!("{}ms", ms.round()))
        .unwrap_or_default();
    let location = hop.location.as_deref().unwrap_or("");
    format!("{:<3} {:<15}  {:<8}  {}", hop.ttl, ip, time, location)
}
