//! Route 53 `ZoneProvider` implementation

use async_trait::async_trait;

use crate::error::Result;
use crate::providers::common::sort_zones;
use crate::traits::{ErrorContext, ProviderErrorMapper, ZoneProvider};
use crate::types::{HostedZone, ProviderType};

use super::types::{GetHostedZoneResponse, ListHostedZonesResponse, Route53HostedZone};
use super::{AwsCredentials, AwsProvider, MAX_PAGE_SIZE, ROUTE53_API_VERSION};

impl AwsProvider {
    /// Walk `ListHostedZones` pages until `IsTruncated` is false.
    async fn list_hosted_zones(&self, credentials: &AwsCredentials) -> Result<Vec<Route53HostedZone>> {
        let path = format!("/{ROUTE53_API_VERSION}/hostedzone");
        let max_items = MAX_PAGE_SIZE.to_string();
        let mut marker: Option<String> = None;
        let mut zones = Vec::new();

        loop {
            let mut query = vec![("maxitems", max_items.as_str())];
            if let Some(marker) = marker.as_deref() {
                query.push(("marker", marker));
            }

            let page: ListHostedZonesResponse = self
                .get_xml(credentials, &path, &query, ErrorContext::default())
                .await?;
            zones.extend(page.hosted_zones.items);

            match page.next_marker {
                Some(next) if page.is_truncated => {
                    if marker.as_deref() == Some(next.as_str()) {
                        return Err(self.parse_error(format!("pagination marker {next} repeated")));
                    }
                    marker = Some(next);
                }
                _ => break,
            }
        }

        log::debug!("[{}] Listed {} hosted zones", self.provider_name(), zones.len());
        Ok(zones)
    }

    /// Fetch the delegation set of one zone. Private zones have none.
    async fn delegation_set(
        &self,
        credentials: &AwsCredentials,
        zone: &Route53HostedZone,
    ) -> Result<HostedZone> {
        let path = format!("/{ROUTE53_API_VERSION}/hostedzone/{}", zone.short_id());
        let response: GetHostedZoneResponse = self
            .get_xml(credentials, &path, &[], ErrorContext::zone(zone.short_id()))
            .await?;

        let name_servers = response
            .delegation_set
            .map(|set| set.name_servers.items)
            .unwrap_or_default();
        Ok(HostedZone::new(zone.name.clone(), name_servers))
    }
}

#[async_trait]
impl ZoneProvider for AwsProvider {
    fn id(&self) -> &'static str {
        "aws"
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Aws
    }

    fn is_applicable(&self) -> bool {
        self.ambient.is_some()
    }

    async fn list_zones(&self) -> Result<Vec<HostedZone>> {
        let Some(ambient) = &self.ambient else {
            log::debug!("[{}] Pod Identity marker absent, skipping", self.provider_name());
            return Ok(Vec::new());
        };

        let credentials = self.resolve_credentials(ambient).await?;

        let mut zones = Vec::new();
        for zone in self.list_hosted_zones(&credentials).await? {
            zones.push(self.delegation_set(&credentials, &zone).await?);
        }

        sort_zones(&mut zones);
        Ok(zones)
    }
}
