//! Route 53 API type definitions (REST/XML)

use serde::Deserialize;

/// `ListHostedZones` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListHostedZonesResponse {
    #[serde(default)]
    pub hosted_zones: HostedZoneList,
    #[serde(default)]
    pub is_truncated: bool,
    pub next_marker: Option<String>,
}

/// Wrapper element around repeated `<HostedZone>` children.
#[derive(Debug, Default, Deserialize)]
pub struct HostedZoneList {
    #[serde(rename = "HostedZone", default)]
    pub items: Vec<Route53HostedZone>,
}

/// Hosted zone summary.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Route53HostedZone {
    /// Qualified id, e.g. `/hostedzone/Z1D633PJN98FT9`.
    pub id: String,
    /// Zone name with trailing dot.
    pub name: String,
}

impl Route53HostedZone {
    /// The id without its `/hostedzone/` prefix, as used in request paths.
    pub fn short_id(&self) -> &str {
        self.id.strip_prefix("/hostedzone/").unwrap_or(&self.id)
    }
}

/// `GetHostedZone` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetHostedZoneResponse {
    /// Absent for private zones.
    pub delegation_set: Option<DelegationSet>,
}

/// Name servers assigned to a public zone.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DelegationSet {
    #[serde(default)]
    pub name_servers: NameServerList,
}

/// Wrapper element around repeated `<NameServer>` children.
#[derive(Debug, Default, Deserialize)]
pub struct NameServerList {
    #[serde(rename = "NameServer", default)]
    pub items: Vec<String>,
}

/// Error document returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorDetail {
    pub code: Option<String>,
    pub message: Option<String>,
}
