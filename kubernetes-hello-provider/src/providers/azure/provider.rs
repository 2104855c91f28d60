//! Azure DNS `ZoneProvider` implementation

use async_trait::async_trait;

use crate::error::Result;
use crate::providers::common::sort_zones;
use crate::traits::{ErrorContext, ProviderErrorMapper, ZoneProvider};
use crate::types::{HostedZone, ProviderType};

use super::AzureProvider;
use super::types::{ArmZone, ZoneListResult};

impl AzureProvider {
    fn convert_zone(zone: ArmZone) -> HostedZone {
        let name_servers = zone
            .properties
            .and_then(|p| p.name_servers)
            .unwrap_or_default();
        HostedZone::new(zone.name, name_servers)
    }
}

#[async_trait]
impl ZoneProvider for AzureProvider {
    fn id(&self) -> &'static str {
        "azure"
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Azure
    }

    fn is_applicable(&self) -> bool {
        self.ambient.is_some()
    }

    async fn list_zones(&self) -> Result<Vec<HostedZone>> {
        let Some(ambient) = &self.ambient else {
            log::debug!("[{}] AZURE_SUBSCRIPTION_ID absent, skipping", self.provider_name());
            return Ok(Vec::new());
        };

        let access_token = self.acquire_token(ambient).await?;

        let mut zones = Vec::new();
        let mut next = Some(self.zones_url(&ambient.subscription_id));
        let mut seen = Vec::new();

        while let Some(url) = next.take() {
            if seen.contains(&url) {
                return Err(self.parse_error(format!("nextLink {url} repeated")));
            }
            let page: ZoneListResult = self
                .get_json(&url, &access_token, ErrorContext::default())
                .await?;
            zones.extend(page.value.into_iter().map(Self::convert_zone));
            seen.push(url);
            next = page.next_link.filter(|link| !link.is_empty());
        }

        log::debug!("[{}] Listed {} DNS zones", self.provider_name(), zones.len());
        sort_zones(&mut zones);
        Ok(zones)
    }
}
