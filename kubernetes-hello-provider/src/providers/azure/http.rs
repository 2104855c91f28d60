//! Resource Manager requests

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::AzureProvider;
use super::types::ArmErrorResponse;

impl AzureProvider {
    /// Map a non-2xx Resource Manager response.
    fn handle_response_error(&self, status: u16, response_text: &str, ctx: ErrorContext) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        if let Ok(error) = serde_json::from_str::<ArmErrorResponse>(response_text) {
            return Err(self.map_error(
                RawApiError::with_code(error.error.code, error.error.message.unwrap_or_default()),
                ctx,
            ));
        }

        Err(self.unknown_error(RawApiError::new(format!(
            "HTTP {status}: {}",
            truncate_for_log(response_text.trim())
        ))))
    }

    /// GET an absolute Resource Manager URL with a bearer token.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
        ctx: ErrorContext,
    ) -> Result<T> {
        let request = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .header("Accept", "application/json");

        let response = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "GET",
            url,
            self.max_retries,
        )
        .await?;

        self.handle_response_error(response.status, &response.body, ctx)?;
        HttpUtils::parse_json(&response.body, self.provider_name())
    }
}
