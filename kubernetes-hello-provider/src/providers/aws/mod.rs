//! Amazon Route 53 provider

mod credentials;
mod error;
mod http;
mod provider;
mod sign;
/// Route 53 API-specific request/response types.
pub(crate) mod types;

use reqwest::{Client, Url};

use crate::env::EnvSource;
use crate::error::{ProviderError, Result};
use crate::providers::common::{DEFAULT_MAX_RETRIES, create_http_client};

pub(crate) use credentials::AwsCredentials;

/// Global Route 53 endpoint.
pub(crate) const ROUTE53_ENDPOINT: &str = "https://route53.amazonaws.com";
/// Route 53 is a global service signed in `us-east-1`.
pub(crate) const ROUTE53_REGION: &str = "us-east-1";
/// SigV4 service name.
pub(crate) const ROUTE53_SERVICE: &str = "route53";
/// REST API version prefix.
pub(crate) const ROUTE53_API_VERSION: &str = "2013-04-01";
/// Maximum number of zones on a single `ListHostedZones` page.
pub(crate) const MAX_PAGE_SIZE: u32 = 100;

/// Marker injected by the EKS Pod Identity webhook.
/// See <https://docs.aws.amazon.com/eks/latest/userguide/pod-id-how-it-works.html>
pub(crate) const ENV_AUTHORIZATION_TOKEN_FILE: &str = "AWS_CONTAINER_AUTHORIZATION_TOKEN_FILE";
pub(crate) const ENV_CREDENTIALS_FULL_URI: &str = "AWS_CONTAINER_CREDENTIALS_FULL_URI";
pub(crate) const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub(crate) const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub(crate) const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
const ENV_ENDPOINT_URL_ROUTE_53: &str = "AWS_ENDPOINT_URL_ROUTE_53";
const ENV_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";

/// Address of the EKS Pod Identity agent.
pub(crate) const DEFAULT_CREDENTIALS_FULL_URI: &str = "http://169.254.170.23/v1/credentials";

/// Identity material found in the environment.
#[derive(Debug, Clone)]
pub(crate) struct AwsAmbient {
    /// Path of the projected service account token.
    pub token_file: String,
    /// Container credentials endpoint the token is presented to.
    pub credentials_uri: String,
    /// Static keys from `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`; these win
    /// over the container endpoint, as in the AWS SDK default chain.
    pub static_credentials: Option<AwsCredentials>,
}

impl AwsAmbient {
    /// `None` when the Pod Identity marker is absent: not running on EKS.
    fn from_env(env: &dyn EnvSource) -> Option<Self> {
        let token_file = env.non_empty(ENV_AUTHORIZATION_TOKEN_FILE)?;
        let credentials_uri = env
            .non_empty(ENV_CREDENTIALS_FULL_URI)
            .unwrap_or_else(|| DEFAULT_CREDENTIALS_FULL_URI.to_string());
        let static_credentials = match (
            env.non_empty(ENV_ACCESS_KEY_ID),
            env.non_empty(ENV_SECRET_ACCESS_KEY),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(AwsCredentials {
                access_key_id,
                secret_access_key,
                session_token: env.non_empty(ENV_SESSION_TOKEN),
            }),
            _ => None,
        };
        Some(Self {
            token_file,
            credentials_uri,
            static_credentials,
        })
    }
}

/// Amazon Route 53 zone provider.
///
/// Authenticates with EKS Pod Identity container credentials and signs
/// requests with AWS Signature Version 4.
///
/// # Construction
///
/// ```rust,no_run
/// use kubernetes_hello_provider::{AwsProvider, ProcessEnv};
///
/// let provider = AwsProvider::builder(&ProcessEnv).max_retries(1).build()?;
/// # Ok::<(), kubernetes_hello_provider::ProviderError>(())
/// ```
#[derive(Debug)]
pub struct AwsProvider {
    pub(crate) client: Client,
    pub(crate) ambient: Option<AwsAmbient>,
    pub(crate) endpoint: Url,
    pub(crate) max_retries: u32,
}

/// Builder for [`AwsProvider`].
pub struct AwsProviderBuilder {
    ambient: Option<AwsAmbient>,
    endpoint: String,
    max_retries: u32,
}

impl AwsProviderBuilder {
    fn new(env: &dyn EnvSource) -> Self {
        let endpoint = env
            .non_empty(ENV_ENDPOINT_URL_ROUTE_53)
            .or_else(|| env.non_empty(ENV_ENDPOINT_URL))
            .unwrap_or_else(|| ROUTE53_ENDPOINT.to_string());
        Self {
            ambient: AwsAmbient::from_env(env),
            endpoint,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Override the Route 53 endpoint (default `https://route53.amazonaws.com`).
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the maximum number of automatic retries for transient errors (default: 2).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the [`AwsProvider`] instance.
    pub fn build(self) -> Result<AwsProvider> {
        let endpoint =
            Url::parse(&self.endpoint).map_err(|e| ProviderError::CredentialSource {
                provider: "aws".to_string(),
                detail: format!("invalid Route 53 endpoint {}: {e}", self.endpoint),
            })?;
        Ok(AwsProvider {
            client: create_http_client("aws")?,
            ambient: self.ambient,
            endpoint,
            max_retries: self.max_retries,
        })
    }
}

impl AwsProvider {
    /// Create a provider from the given environment with default settings.
    pub fn from_env(env: &dyn EnvSource) -> Result<Self> {
        Self::builder(env).build()
    }

    /// Create a builder reading its ambient markers from `env`.
    pub fn builder(env: &dyn EnvSource) -> AwsProviderBuilder {
        AwsProviderBuilder::new(env)
    }
}
