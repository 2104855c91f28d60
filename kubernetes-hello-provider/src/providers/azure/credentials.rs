//! Workload identity token exchange
//!
//! The federated service account token is presented as a client assertion
//! to Entra ID, which answers with a Resource Manager access token.
//! See <https://azure.github.io/azure-workload-identity/docs/>

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::providers::common::read_token_file;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::types::{TokenErrorResponse, TokenResponse};
use super::{
    AzureAmbient, AzureProvider, CLIENT_ASSERTION_TYPE, ENV_CLIENT_ID, ENV_FEDERATED_TOKEN_FILE,
    ENV_TENANT_ID, MANAGEMENT_SCOPE,
};

impl AzureProvider {
    /// Exchange the federated token for a bearer token.
    pub(crate) async fn acquire_token(&self, ambient: &AzureAmbient) -> Result<String> {
        let tenant_id = self.require(ambient.tenant_id.as_deref(), ENV_TENANT_ID)?;
        let client_id = self.require(ambient.client_id.as_deref(), ENV_CLIENT_ID)?;
        let token_file = self.require(ambient.token_file.as_deref(), ENV_FEDERATED_TOKEN_FILE)?;

        let assertion = read_token_file(token_file, self.provider_name()).await?;
        let url = ambient.token_url(tenant_id);

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("scope", MANAGEMENT_SCOPE),
            ("client_assertion_type", CLIENT_ASSERTION_TYPE),
            ("client_assertion", assertion.as_str()),
        ];
        let request = self.client.post(&url).form(&form);

        let response = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "POST",
            &url,
            self.max_retries,
        )
        .await?;

        if !response.is_success() {
            return Err(self.token_error(response.status, &response.body));
        }

        let token: TokenResponse = HttpUtils::parse_json(&response.body, self.provider_name())?;
        log::debug!(
            "[{}] Obtained {} token for client {client_id} (expires in {}s)",
            self.provider_name(),
            token.token_type.as_deref().unwrap_or("access"),
            token.expires_in.unwrap_or_default()
        );
        Ok(token.access_token)
    }

    fn require<'a>(&self, value: Option<&'a str>, variable: &str) -> Result<&'a str> {
        value.ok_or_else(|| self.credential_source_error(format!("{variable} is not set")))
    }

    /// Map an OAuth2 error body (`{"error": "...", "error_description": "..."}`).
    fn token_error(&self, status: u16, body: &str) -> crate::ProviderError {
        match serde_json::from_str::<TokenErrorResponse>(body) {
            Ok(error) => self.map_error(
                RawApiError::with_code(
                    error.error,
                    error.error_description.unwrap_or_default(),
                ),
                ErrorContext::default(),
            ),
            Err(_) => self.unknown_error(RawApiError::new(format!(
                "token endpoint returned HTTP {status}: {}",
                truncate_for_log(body.trim())
            ))),
        }
    }
}
