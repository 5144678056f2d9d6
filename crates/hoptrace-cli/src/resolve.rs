//! Destination resolution with a Minecraft SRV record fallback.

use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::{Resolver, TokioResolver};
use hoptrace_core::TraceError;
use std::net::IpAddr;
use tracing::{debug, info, warn};

const SRV_SERVICE_PREFIX: &str = "_minecraft._tcp.";

/// Resolve the trace target to an IP address.
///
/// IP literals pass through untouched. Hostnames go through a standard
/// lookup first; when that fails, a Minecraft SRV record is tried so bare
/// game-server names resolve the way a game client would. Only when both
/// fail is the error fatal, carrying the primary lookup error.
pub async fn resolve_destination(target: &str) -> Result<IpAddr, TraceError> {
    // First check if it's already an IP address
    if let Ok(ip) = target.parse::<IpAddr>() {
        return Ok(ip);
    }

    let resolver = build_resolver();

    let primary = match lookup_host(&resolver, target).await {
        Ok(ip) => {
            debug!("Resolved {} to {}", target, ip);
            return Ok(ip);
        }
        Err(e) => e,
    };

    info!("Standard resolution failed. Checking for Minecraft SRV records...");
    match resolve_via_srv(&resolver, target).await {
        Some(ip) => Ok(ip),
        None => Err(TraceError::Resolution {
            host: target.to_string(),
            source: primary,
        }),
    }
}

/// Build a resolver from the system DNS config, falling back to Google DNS.
fn build_resolver() -> TokioResolver {
    match Resolver::builder_tokio() {
        Ok(builder) => builder.build(),
        Err(e) => {
            warn!(error = %e, "System DNS config unavailable, using Google DNS");
            Resolver::builder_with_config(
                ResolverConfig::google(),
                TokioConnectionProvider::default(),
            )
            .build()
        }
    }
}

/// Look up a hostname, preferring IPv4 addresses.
async fn lookup_host(
    resolver: &TokioResolver,
    host: &str,
) -> Result<IpAddr, Box<dyn std::error::Error + Send + Sync>> {
    let lookup = resolver.lookup_ip(host).await?;
    lookup
        .iter()
        .find(IpAddr::is_ipv4)
        .or_else(|| lookup.iter().next())
        .ok_or_else(|| format!("no addresses found for '{}'", host).into())
}

/// Resolve through a `_minecraft._tcp` SRV record pointing at the real server.
async fn resolve_via_srv(resolver: &TokioResolver, host: &str) -> Option<IpAddr> {
    let service = format!("{}{}", SRV_SERVICE_PREFIX, host);
    let records = match resolver.srv_lookup(service.as_str()).await {
        Ok(records) => records,
        Err(e) => {
            debug!(service = %service, error = %e, "SRV lookup failed");
            return None;
        }
    };

    let record = records.iter().next()?;
    let server = record.target().to_utf8();

    match lookup_host(resolver, &server).await {
        Ok(ip) => {
            info!("SRV record found, redirecting to {} ({})", server, ip);
            Some(ip)
        }
        Err(e) => {
            debug!(server = %server, error = %e, "SRV target did not resolve");
            None
        }
    }
}
