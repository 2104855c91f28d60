//! Containers of the pod serving the request

use async_trait::async_trait;
use kubernetes_hello_provider::{KubernetesClient, PodContainer};

use crate::error::CoreResult;

/// Describes the containers of the current pod.
#[async_trait]
pub trait PodInspector: Send + Sync {
    /// One `<name> <image>` line per container; empty outside a cluster.
    async fn containers(&self) -> CoreResult<String>;
}

#[async_trait]
impl PodInspector for KubernetesClient {
    async fn containers(&self) -> CoreResult<String> {
        let containers = self.pod_containers().await?;
        Ok(format_containers(&containers))
    }
}

pub fn format_containers(containers: &[PodContainer]) -> String {
    containers
        .iter()
        .map(|container| format!("{} {}\n", container.name, container.image))
        .collect()
}
