use kubernetes_hello_provider::ProviderType;

use super::NameValuePair;

/// Identity of the serving process.
#[derive(Debug, Clone)]
pub struct Properties {
    pub pid: u32,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub hostname: String,
    /// `<name> <image>` lines, `ERROR <message>` when the lookup failed.
    pub pod_containers: String,
    pub os: &'static str,
    pub architecture: &'static str,
    /// Go-style duration, e.g. `1h2m3.5s`.
    pub uptime: String,
}

/// Zones of one cloud vendor, or its `ERROR` pair.
#[derive(Debug, Clone)]
pub struct ZoneSection {
    pub provider: ProviderType,
    pub pairs: Vec<NameValuePair>,
}

impl ZoneSection {
    /// Section caption, e.g. `Azure DNS Zones`.
    pub fn title(&self) -> String {
        format!("{} DNS Zones", self.provider.display_name())
    }
}

/// Everything collected for one request.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub properties: Properties,
    pub environment: Vec<NameValuePair>,
    pub secrets: Vec<NameValuePair>,
    pub configs: Vec<NameValuePair>,
    /// One section per registered provider, in registration order.
    pub zones: Vec<ZoneSection>,
}
