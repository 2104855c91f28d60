//! # kubernetes-hello-provider
//!
//! Discovers the public DNS zones hosted by the cloud account a workload runs
//! in, together with each zone's delegation set (its authoritative name
//! servers).
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Ambient marker | Auth Method |
//! |----------|-------------|----------------|-------------|
//! | [AWS Route 53](https://aws.amazon.com/route53/) | `aws` | `AWS_CONTAINER_AUTHORIZATION_TOKEN_FILE` | EKS Pod Identity + SigV4 |
//! | [Azure DNS](https://azure.microsoft.com/products/dns) | `azure` | `AZURE_SUBSCRIPTION_ID` | Workload identity client assertion |
//!
//! A provider whose ambient marker is absent is *not applicable*: it returns
//! an empty zone list without touching the network.
//!
//! [`KubernetesClient`] follows the same rule for the in-cluster pod lookup,
//! gated on `KUBERNETES_SERVICE_HOST`.
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)*: Enable both providers.
//! - **`aws`** / **`azure`**: Enable a single provider.
//! - **`kubernetes`** *(default)*: In-cluster lookup of the current pod's containers.
//! - **`rustls`** *(default)* / **`native-tls`**: TLS backend for `reqwest`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use kubernetes_hello_provider::{ambient_providers, ProcessEnv};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     for provider in ambient_providers(&ProcessEnv)? {
//!         match provider.list_zones().await {
//!             Ok(zones) => {
//!                 for zone in &zones {
//!                     println!("{} -> {:?}", zone.name, zone.name_servers);
//!                 }
//!             }
//!             Err(e) => eprintln!("{}: {e}", provider.id()),
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//! Transient errors (`NetworkError`, `Timeout`, `RateLimited`) are retried
//! with exponential backoff before they are surfaced.

mod env;
mod error;
mod factory;
mod http_client;
#[cfg(feature = "kubernetes")]
mod kubernetes;
mod providers;
mod traits;
mod types;
mod utils;

pub use env::{EnvSource, ProcessEnv, StaticEnv};

pub use error::{ProviderError, Result};

pub use factory::{ambient_providers, create_provider};

pub use traits::ZoneProvider;

pub use types::{HostedZone, ProviderType};

pub use utils::log_sanitizer;

#[cfg(feature = "aws")]
pub use providers::{AwsProvider, AwsProviderBuilder};

#[cfg(feature = "azure")]
pub use providers::{AzureProvider, AzureProviderBuilder};

#[cfg(feature = "kubernetes")]
pub use kubernetes::{KubernetesClient, KubernetesClientBuilder, PodContainer, SERVICE_ACCOUNT_DIR};
