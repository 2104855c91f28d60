//! Snapshot aggregation
//!
//! Collects properties, environment, both scans, the pod's containers and
//! every provider's zones for a single request. Only a fail-fast scan error
//! fails the snapshot; a provider or pod lookup error or timeout is rendered
//! inline as `ERROR`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use kubernetes_hello_provider::ZoneProvider;

use crate::config::AppConfig;
use crate::error::{CoreError, CoreResult};
use crate::types::{NameValuePair, NameValuePairs, Snapshot, ZoneSection};

use super::certificate::{CertificateDecoder, CommandCertificateDecoder};
use super::classifier::ContentClassifier;
use super::environment::collect_environment;
use super::pod::PodInspector;
use super::properties::collect_properties;
use super::scanner::DirectoryScanner;

/// Long-lived state shared by all requests.
pub struct SnapshotService {
    scanner: DirectoryScanner,
    providers: Vec<Arc<dyn ZoneProvider>>,
    pod: Arc<dyn PodInspector>,
    secrets_dir: PathBuf,
    configs_dir: PathBuf,
    provider_timeout: Duration,
    started: Instant,
}

impl SnapshotService {
    #[must_use]
    pub fn new(
        scanner: DirectoryScanner,
        providers: Vec<Arc<dyn ZoneProvider>>,
        pod: Arc<dyn PodInspector>,
        secrets_dir: PathBuf,
        configs_dir: PathBuf,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            scanner,
            providers,
            pod,
            secrets_dir,
            configs_dir,
            provider_timeout,
            started: Instant::now(),
        }
    }

    /// Build the service from configuration, decoding certificates with the
    /// configured command.
    pub fn from_config(
        config: &AppConfig,
        providers: Vec<Arc<dyn ZoneProvider>>,
        pod: Arc<dyn PodInspector>,
    ) -> CoreResult<Self> {
        let decoder: Arc<dyn CertificateDecoder> =
            Arc::new(CommandCertificateDecoder::new(&config.certificate_command)?);
        let scanner = DirectoryScanner::new(ContentClassifier::new(decoder), config.scan_policy);
        Ok(Self::new(
            scanner,
            providers,
            pod,
            config.secrets_dir.clone(),
            config.configs_dir.clone(),
            config.provider_timeout(),
        ))
    }

    /// Collect a full snapshot.
    pub async fn collect(&self) -> CoreResult<Snapshot> {
        let uptime = self.started.elapsed();
        let environment = collect_environment();

        let (secrets, configs, zones, pod_containers) = tokio::join!(
            self.scanner.scan(&self.secrets_dir),
            self.scanner.scan(&self.configs_dir),
            self.collect_zones(),
            self.pod_containers(),
        );
        let properties = collect_properties(uptime, pod_containers)?;

        Ok(Snapshot {
            properties,
            environment,
            secrets: secrets?,
            configs: configs?,
            zones,
        })
    }

    /// One section per provider, in registration order.
    pub async fn collect_zones(&self) -> Vec<ZoneSection> {
        let futures = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            async move {
                let pairs = self.zone_pairs(provider.as_ref()).await;
                ZoneSection {
                    provider: provider.provider_type(),
                    pairs,
                }
            }
        });
        join_all(futures).await
    }

    /// Rendered container list, or `ERROR <message>` on failure or timeout.
    pub async fn pod_containers(&self) -> String {
        match tokio::time::timeout(self.provider_timeout, self.pod.containers()).await {
            Ok(Ok(containers)) => containers,
            Ok(Err(e)) => {
                if e.is_expected() {
                    log::warn!("Listing pod containers failed: {e}");
                } else {
                    log::error!("Listing pod containers failed: {e}");
                }
                format!("ERROR {e}")
            }
            Err(_) => {
                let message = format!(
                    "[kubernetes] timed out after {}s",
                    self.provider_timeout.as_secs_f32()
                );
                log::error!("Listing pod containers failed: {message}");
                format!("ERROR {message}")
            }
        }
    }

    async fn zone_pairs(&self, provider: &dyn ZoneProvider) -> Vec<NameValuePair> {
        let result = tokio::time::timeout(self.provider_timeout, provider.list_zones()).await;
        match result {
            Ok(Ok(zones)) => {
                log::debug!("[{}] Listed {} zones", provider.id(), zones.len());
                zones
                    .into_iter()
                    .map(NameValuePair::from)
                    .collect::<NameValuePairs>()
                    .sorted()
            }
            Ok(Err(e)) => {
                let e = CoreError::from(e);
                if e.is_expected() {
                    log::warn!("Listing zones failed: {e}");
                } else {
                    log::error!("Listing zones failed: {e}");
                }
                vec![NameValuePair::error(e.to_string())]
            }
            Err(_) => {
                let message = format!(
                    "[{}] timed out after {}s",
                    provider.id(),
                    self.provider_timeout.as_secs_f32()
                );
                log::error!("Listing zones failed: {message}");
                vec![NameValuePair::error(message)]
            }
        }
    }
}
