//! Test helpers
//!
//! Mock implementations of the certificate decoder, the zone provider and
//! the pod inspector.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use kubernetes_hello_provider::{HostedZone, ProviderError, ProviderType, ZoneProvider};

use crate::error::{CoreError, CoreResult};
use crate::services::certificate::CertificateDecoder;
use crate::services::pod::PodInspector;

// ===== MockCertificateDecoder =====

pub struct MockCertificateDecoder {
    result: Result<String, String>,
    calls: Mutex<Vec<Vec<u8>>>,
}

impl MockCertificateDecoder {
    pub fn ok(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every PEM input seen so far.
    pub fn calls(&self) -> Vec<Vec<u8>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CertificateDecoder for MockCertificateDecoder {
    async fn decode(&self, pem: &[u8]) -> CoreResult<String> {
        self.calls.lock().unwrap().push(pem.to_vec());
        self.result.clone().map_err(CoreError::Certificate)
    }
}

// ===== MockZoneProvider =====

enum ZoneBehavior {
    Zones(Vec<HostedZone>),
    Fail(ProviderError),
    Hang(Duration),
}

pub struct MockZoneProvider {
    provider_type: ProviderType,
    applicable: bool,
    behavior: ZoneBehavior,
}

impl MockZoneProvider {
    pub fn zones(provider_type: ProviderType, zones: Vec<HostedZone>) -> Self {
        Self {
            provider_type,
            applicable: true,
            behavior: ZoneBehavior::Zones(zones),
        }
    }

    pub fn failing(provider_type: ProviderType, error: ProviderError) -> Self {
        Self {
            provider_type,
            applicable: true,
            behavior: ZoneBehavior::Fail(error),
        }
    }

    /// Sleeps for `delay` before answering with no zones.
    pub fn hanging(provider_type: ProviderType, delay: Duration) -> Self {
        Self {
            provider_type,
            applicable: true,
            behavior: ZoneBehavior::Hang(delay),
        }
    }

    pub fn not_applicable(provider_type: ProviderType) -> Self {
        Self {
            provider_type,
            applicable: false,
            behavior: ZoneBehavior::Zones(Vec::new()),
        }
    }
}

#[async_trait]
impl ZoneProvider for MockZoneProvider {
    fn id(&self) -> &'static str {
        match self.provider_type {
            ProviderType::Aws => "aws",
            ProviderType::Azure => "azure",
        }
    }

    fn provider_type(&self) -> ProviderType {
        self.provider_type
    }

    fn is_applicable(&self) -> bool {
        self.applicable
    }

    async fn list_zones(&self) -> kubernetes_hello_provider::Result<Vec<HostedZone>> {
        if !self.applicable {
            return Ok(Vec::new());
        }
        match &self.behavior {
            ZoneBehavior::Zones(zones) => Ok(zones.clone()),
            ZoneBehavior::Fail(error) => Err(error.clone()),
            ZoneBehavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Vec::new())
            }
        }
    }
}

// ===== MockPodInspector =====

enum PodBehavior {
    Containers(String),
    Fail(ProviderError),
    Hang(Duration),
}

pub struct MockPodInspector {
    behavior: PodBehavior,
}

impl MockPodInspector {
    pub fn containers(text: &str) -> Self {
        Self {
            behavior: PodBehavior::Containers(text.to_string()),
        }
    }

    pub fn outside_cluster() -> Self {
        Self::containers("")
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            behavior: PodBehavior::Fail(error),
        }
    }

    pub fn hanging(delay: Duration) -> Self {
        Self {
            behavior: PodBehavior::Hang(delay),
        }
    }
}

#[async_trait]
impl PodInspector for MockPodInspector {
    async fn containers(&self) -> CoreResult<String> {
        match &self.behavior {
            PodBehavior::Containers(text) => Ok(text.clone()),
            PodBehavior::Fail(error) => Err(CoreError::Provider(error.clone())),
            PodBehavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(String::new())
            }
        }
    }
}
