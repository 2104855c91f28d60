//! Azure DNS provider

mod credentials;
mod error;
mod http;
mod provider;
/// Azure Resource Manager and Entra ID request/response types.
pub(crate) mod types;

use reqwest::{Client, Url};

use crate::env::EnvSource;
use crate::error::{ProviderError, Result};
use crate::providers::common::{DEFAULT_MAX_RETRIES, create_http_client};

/// Public cloud Entra ID authority.
pub(crate) const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com/";
/// Public cloud Resource Manager endpoint.
pub(crate) const MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";
/// Token scope for Resource Manager.
pub(crate) const MANAGEMENT_SCOPE: &str = "https://management.azure.com/.default";
/// `Microsoft.Network/dnszones` API version.
pub(crate) const DNS_API_VERSION: &str = "2018-05-01";
/// Assertion type for a federated service account token.
pub(crate) const CLIENT_ASSERTION_TYPE: &str =
    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Marker set when the workload is meant to talk to an Azure subscription.
pub(crate) const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";
// Injected by the Azure AD Workload Identity webhook
pub(crate) const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
pub(crate) const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub(crate) const ENV_FEDERATED_TOKEN_FILE: &str = "AZURE_FEDERATED_TOKEN_FILE";
pub(crate) const ENV_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";

/// Identity material found in the environment.
///
/// Only the subscription id gates the provider; the workload identity
/// fields are validated when a token is requested.
#[derive(Debug, Clone)]
pub(crate) struct AzureAmbient {
    pub subscription_id: String,
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub token_file: Option<String>,
    pub authority_host: String,
}

impl AzureAmbient {
    /// `None` when `AZURE_SUBSCRIPTION_ID` is absent: not running in Azure.
    fn from_env(env: &dyn EnvSource) -> Option<Self> {
        let subscription_id = env.non_empty(ENV_SUBSCRIPTION_ID)?;
        Some(Self {
            subscription_id,
            tenant_id: env.non_empty(ENV_TENANT_ID),
            client_id: env.non_empty(ENV_CLIENT_ID),
            token_file: env.non_empty(ENV_FEDERATED_TOKEN_FILE),
            authority_host: env
                .non_empty(ENV_AUTHORITY_HOST)
                .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string()),
        })
    }

    /// `<authority>/<tenant>/oauth2/v2.0/token`
    pub fn token_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/{tenant_id}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/')
        )
    }
}

/// Azure DNS zone provider.
///
/// Exchanges the projected service account token for a Resource Manager
/// access token (client assertion grant), then lists the subscription's
/// DNS zones.
///
/// # Construction
///
/// ```rust,no_run
/// use kubernetes_hello_provider::{AzureProvider, ProcessEnv};
///
/// let provider = AzureProvider::builder(&ProcessEnv).build()?;
/// # Ok::<(), kubernetes_hello_provider::ProviderError>(())
/// ```
#[derive(Debug)]
pub struct AzureProvider {
    pub(crate) client: Client,
    pub(crate) ambient: Option<AzureAmbient>,
    pub(crate) management_endpoint: Url,
    pub(crate) max_retries: u32,
}

/// Builder for [`AzureProvider`].
pub struct AzureProviderBuilder {
    ambient: Option<AzureAmbient>,
    management_endpoint: String,
    max_retries: u32,
}

impl AzureProviderBuilder {
    fn new(env: &dyn EnvSource) -> Self {
        Self {
            ambient: AzureAmbient::from_env(env),
            management_endpoint: MANAGEMENT_ENDPOINT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the Resource Manager endpoint (default `https://management.azure.com`).
    #[must_use]
    pub fn management_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.management_endpoint = endpoint.into();
        self
    }

    /// Set the maximum number of automatic retries for transient errors (default: 2).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the [`AzureProvider`] instance.
    pub fn build(self) -> Result<AzureProvider> {
        let management_endpoint = Url::parse(&self.management_endpoint).map_err(|e| {
            ProviderError::CredentialSource {
                provider: "azure".to_string(),
                detail: format!(
                    "invalid Resource Manager endpoint {}: {e}",
                    self.management_endpoint
                ),
            }
        })?;
        Ok(AzureProvider {
            client: create_http_client("azure")?,
            ambient: self.ambient,
            management_endpoint,
            max_retries: self.max_retries,
        })
    }
}

impl AzureProvider {
    /// Create a provider from the given environment with default settings.
    pub fn from_env(env: &dyn EnvSource) -> Result<Self> {
        Self::builder(env).build()
    }

    /// Create a builder reading its ambient markers from `env`.
    pub fn builder(env: &dyn EnvSource) -> AzureProviderBuilder {
        AzureProviderBuilder::new(env)
    }

    /// First page of the subscription's DNS zone list.
    pub(crate) fn zones_url(&self, subscription_id: &str) -> String {
        format!(
            "{}/subscriptions/{}/providers/Microsoft.Network/dnszones?api-version={DNS_API_VERSION}",
            self.management_endpoint.as_str().trim_end_matches('/'),
            urlencoding::encode(subscription_id)
        )
    }
}
