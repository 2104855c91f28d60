//! Signed Route 53 requests

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::sign::{SigningScope, canonical_query_string};
use super::types::ErrorResponse;
use super::{AwsCredentials, AwsProvider, ROUTE53_REGION, ROUTE53_SERVICE};

const SCOPE: SigningScope<'static> = SigningScope {
    region: ROUTE53_REGION,
    service: ROUTE53_SERVICE,
};

impl AwsProvider {
    /// Map a non-2xx response onto a [`ProviderError`](crate::ProviderError).
    fn handle_response_error(&self, status: u16, response_text: &str, ctx: ErrorContext) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        if let Ok(error) = quick_xml::de::from_str::<ErrorResponse>(response_text) {
            if let Some(code) = error.error.code {
                return Err(self.map_error(
                    RawApiError::with_code(code, error.error.message.unwrap_or_default()),
                    ctx,
                ));
            }
        }

        Err(self.unknown_error(RawApiError::new(format!(
            "HTTP {status}: {}",
            truncate_for_log(response_text.trim())
        ))))
    }

    /// `Host` header value for the configured endpoint.
    fn host_header(&self) -> String {
        let host = self.endpoint.host_str().unwrap_or_default();
        match self.endpoint.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Execute a signed GET and parse the XML body.
    pub(crate) async fn get_xml<T: DeserializeOwned>(
        &self,
        credentials: &AwsCredentials,
        path: &str,
        query: &[(&str, &str)],
        ctx: ErrorContext,
    ) -> Result<T> {
        let amz_date = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
        let host = self.host_header();

        let mut headers = vec![
            ("Host".to_string(), host),
            ("X-Amz-Date".to_string(), amz_date.clone()),
        ];
        if let Some(token) = &credentials.session_token {
            headers.push(("X-Amz-Security-Token".to_string(), token.clone()));
        }

        let authorization = credentials.sign(SCOPE, "GET", path, query, &headers, "", &amz_date);

        let base = self.endpoint.as_str().trim_end_matches('/');
        let canonical_query = canonical_query_string(query);
        let url = if canonical_query.is_empty() {
            format!("{base}{path}")
        } else {
            format!("{base}{path}?{canonical_query}")
        };

        // reqwest derives Host from the URL
        let mut request = self.client.get(&url).header("Authorization", authorization);
        for (name, value) in headers.iter().filter(|(name, _)| name != "Host") {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = HttpUtils::execute_request_with_retry(
            request,
            self.provider_name(),
            "GET",
            &url,
            self.max_retries,
        )
        .await?;

        self.handle_response_error(response.status, &response.body, ctx)?;
        HttpUtils::parse_xml(&response.body, self.provider_name())
    }
}
