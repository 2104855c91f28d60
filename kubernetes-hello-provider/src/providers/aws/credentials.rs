//! Container credentials (EKS Pod Identity)
//!
//! The projected service account token is presented to the Pod Identity
//! agent, which answers with short-lived IAM role credentials.

use serde::Deserialize;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::providers::common::read_token_file;
use crate::traits::ProviderErrorMapper;
use crate::utils::log_sanitizer::{mask_secret, truncate_for_log};

use super::{AwsAmbient, AwsProvider};

/// IAM credentials used to sign Route 53 requests.
#[derive(Clone)]
pub(crate) struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &mask_secret(&self.access_key_id))
            .field("secret_access_key", &"****")
            .field("session_token", &self.session_token.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Response of the container credentials endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ContainerCredentialsResponse {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub token: Option<String>,
    pub expiration: Option<String>,
}

impl From<ContainerCredentialsResponse> for AwsCredentials {
    fn from(response: ContainerCredentialsResponse) -> Self {
        Self {
            access_key_id: response.access_key_id,
            secret_access_key: response.secret_access_key,
            session_token: response.token,
        }
    }
}

impl AwsProvider {
    /// Resolve credentials: static keys first, then the container endpoint.
    pub(crate) async fn resolve_credentials(&self, ambient: &AwsAmbient) -> Result<AwsCredentials> {
        if let Some(credentials) = &ambient.static_credentials {
            log::debug!(
                "[{}] Using static credentials {}",
                self.provider_name(),
                mask_secret(&credentials.access_key_id)
            );
            return Ok(credentials.clone());
        }

        let token = read_token_file(&ambient.token_file, self.provider_name()).await?;
        let request = self
            .client
            .get(&ambient.credentials_uri)
            .header("Authorization", token);

        let response = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "GET",
            &ambient.credentials_uri,
            self.max_retries,
        )
        .await?;

        if !response.is_success() {
            return Err(self.credential_endpoint_error(response.status, &response.body));
        }

        let credentials: ContainerCredentialsResponse =
            HttpUtils::parse_json(&response.body, self.provider_name())?;
        log::debug!(
            "[{}] Obtained container credentials {} (expires {})",
            self.provider_name(),
            mask_secret(&credentials.access_key_id),
            credentials.expiration.as_deref().unwrap_or("unknown")
        );
        Ok(credentials.into())
    }

    /// The agent answers 400/401/403 for rejected tokens.
    fn credential_endpoint_error(&self, status: u16, body: &str) -> ProviderError {
        let message = format!("HTTP {status}: {}", truncate_for_log(body.trim()));
        match status {
            400 | 401 | 403 => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(message),
            },
            _ => self.credential_source_error(format!("credentials endpoint returned {message}")),
        }
    }
}
