//! Zone provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "aws")]
mod aws;
#[cfg(feature = "azure")]
mod azure;

#[cfg(feature = "aws")]
pub use aws::{AwsProvider, AwsProviderBuilder};
#[cfg(feature = "azure")]
pub use azure::{AzureProvider, AzureProviderBuilder};
