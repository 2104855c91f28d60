//! Public data types shared by all providers.

use serde::{Deserialize, Serialize};

/// Cloud vendor behind a [`ZoneProvider`](crate::ZoneProvider).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Amazon Route 53. Requires feature `aws`.
    #[cfg(feature = "aws")]
    Aws,
    /// Azure DNS. Requires feature `azure`.
    #[cfg(feature = "azure")]
    Azure,
}

impl ProviderType {
    /// Every provider type enabled via feature flags.
    pub fn all() -> Vec<Self> {
        vec![
            #[cfg(feature = "azure")]
            Self::Azure,
            #[cfg(feature = "aws")]
            Self::Aws,
        ]
    }

    /// Human readable vendor name.
    pub fn display_name(self) -> &'static str {
        match self {
            #[cfg(feature = "aws")]
            Self::Aws => "AWS",
            #[cfg(feature = "azure")]
            Self::Azure => "Azure",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "aws")]
            Self::Aws => write!(f, "aws"),
            #[cfg(feature = "azure")]
            Self::Azure => write!(f, "azure"),
        }
    }
}

/// A hosted DNS zone and its delegation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedZone {
    /// Zone name exactly as the vendor reports it (Route 53 keeps the trailing dot).
    pub name: String,
    /// Authoritative name servers, in the order the vendor returned them.
    pub name_servers: Vec<String>,
}

impl HostedZone {
    /// Creates a zone.
    pub fn new(name: impl Into<String>, name_servers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            name_servers,
        }
    }

    /// Name servers joined by newlines.
    pub fn delegation(&self) -> String {
        self.name_servers.join("\n")
    }
}
