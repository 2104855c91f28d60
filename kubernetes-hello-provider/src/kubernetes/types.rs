//! Core API (`v1`) objects, reduced to the fields read here

use serde::{Deserialize, Serialize};

/// A container of the current pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodContainer {
    pub name: String,
    #[serde(default)]
    pub image: String,
}

/// `v1.Pod`
#[derive(Debug, Deserialize)]
pub(crate) struct Pod {
    #[serde(default)]
    pub spec: PodSpec,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PodSpec {
    #[serde(default)]
    pub containers: Vec<PodContainer>,
}

/// `v1.Status`, the body of every API error response.
#[derive(Debug, Deserialize)]
pub(crate) struct Status {
    pub reason: Option<String>,
    #[serde(default)]
    pub message: String,
}
