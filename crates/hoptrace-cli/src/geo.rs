//! Hop location annotation via the ip-api.com service.

use hoptrace_core::ReportedHop;
use serde::Deserialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::debug;

const GEO_ENDPOINT: &str = "http://ip-api.com/json";
const GEO_FIELDS: &str = "status,country,regionName,city";
const GEO_TIMEOUT: Duration = Duration::from_secs(5);

/// Response shape for the fields we request from the service.
#[derive(Debug, Deserialize)]
struct GeoResponse {
    status: String,
    #[serde(default)]
    country: String,
    #[serde(rename = "regionName", default)]
    region_name: String,
    #[serde(default)]
    city: String,
}

/// HTTP client for hop location lookups.
pub struct LocationClient {
    http: reqwest::Client,
}

impl LocationClient {
    /// Build a client with a bounded per-request timeout.
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(GEO_TIMEOUT).build()?;
        Ok(Self { http })
    }

    /// Look up a location string for `ip`.
    ///
    /// Transport and parse failures collapse to an empty string so the
    /// annotation pass can never invalidate a finished trace.
    pub async fn locate(&self, ip: IpAddr) -> String {
        match self.fetch(ip).await {
            Ok(location) => location,
            Err(e) => {
                debug!(ip = %ip, error = %e, "Location lookup failed");
                String::new()
            }
        }
    }

    async fn fetch(&self, ip: IpAddr) -> Result<String, reqwest::Error> {
        let url = format!("{}/{}?fields={}", GEO_ENDPOINT, ip, GEO_FIELDS);
        let response: GeoResponse = self.http.get(&url).send().await?.json().await?;
        Ok(describe(&response))
    }
}

/// Fill in `location` for every answered hop, one lookup at a time.
pub async fn annotate_hops(client: &LocationClient, hops: &mut [ReportedHop]) {
    for hop in hops.iter_mut() {
        if let Some(ip) = hop.ip {
            hop.location = Some(client.locate(ip).await);
        }
    }
}

/// Turn a service response into the reported location string.
fn describe(response: &GeoResponse) -> String {
    if response.status != "success" {
        return "No Data (Probably Local IP)".to_string();
    }

    [&response.country, &response.region_name, &response.city]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn response(json: &str) -> GeoResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_full_response_joins_all_parts() {
        let r = response(
            r#"{"status":"success","country":"United States","regionName":"California","city":"Mountain View"}"#,
        );
        assert_eq!(describe(&r), "United States, California, Mountain View");
    }

    #[test]
    fn test_empty_parts_are_skipped() {
        let r = response(r#"{"status":"success","country":"Sweden","regionName":"","city":"  "}"#);
        assert_eq!(describe(&r), "Sweden");
    }

    #[test]
    fn test_failed_status_reports_no_data() {
        let r = response(r#"{"status":"fail"}"#);
        assert_eq!(describe(&r), "No Data (Probably Local IP)");
    }

    #[test]
    fn test_success_with_no_parts_is_empty() {
        let r = response(r#"{"status":"success"}"#);
        assert_eq!(describe(&r), "");
    }

    #[tokio::test]
    async fn test_annotation_skips_timed_out_hops() {
        // A timed-out hop has no address, so no request is ever made for it
        // and its location stays unset.
        let client = LocationClient::new().unwrap();
        let mut hops = vec![ReportedHop {
            ttl: 1,
            ip: None,
            rtt_ms: None,
            timed_out: true,
            location: None,
        }];
        annotate_hops(&client, &mut hops).await;
        assert!(hops[0].location.is_none());
    }

    #[test]
    fn test_request_url_shape() {
        let ip: IpAddr = IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8));
        let url = format!("{}/{}?fields={}", GEO_ENDPOINT, ip, GEO_FIELDS);
        assert_eq!(
            url,
            "http://ip-api.com/json/8.8.8.8?fields=status,country,regionName,city"
        );
    }
}
