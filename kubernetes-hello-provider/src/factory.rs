//! Provider factory functions.

use std::sync::Arc;

use crate::env::EnvSource;
use crate::error::Result;
use crate::traits::ZoneProvider;
use crate::types::ProviderType;

#[cfg(feature = "aws")]
use crate::providers::AwsProvider;
#[cfg(feature = "azure")]
use crate::providers::AzureProvider;

/// Creates a [`ZoneProvider`] of the given type, reading its ambient
/// markers from `env`.
///
/// The provider is created even when its markers are absent; it then
/// reports itself as not applicable and lists no zones.
///
/// # Examples
///
/// ```rust,no_run
/// use kubernetes_hello_provider::{create_provider, ProcessEnv, ProviderType};
///
/// let provider = create_provider(ProviderType::Azure, &ProcessEnv).unwrap();
/// assert_eq!(provider.id(), "azure");
/// ```
pub fn create_provider(
    provider_type: ProviderType,
    env: &dyn EnvSource,
) -> Result<Arc<dyn ZoneProvider>> {
    match provider_type {
        #[cfg(feature = "aws")]
        ProviderType::Aws => Ok(Arc::new(AwsProvider::from_env(env)?)),
        #[cfg(feature = "azure")]
        ProviderType::Azure => Ok(Arc::new(AzureProvider::from_env(env)?)),
    }
}

/// Creates every provider enabled via feature flags, in page order
/// (Azure before AWS).
pub fn ambient_providers(env: &dyn EnvSource) -> Result<Vec<Arc<dyn ZoneProvider>>> {
    ProviderType::all()
        .into_iter()
        .map(|provider_type| create_provider(provider_type, env))
        .collect()
}
