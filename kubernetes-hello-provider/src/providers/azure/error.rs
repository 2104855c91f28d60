//! Azure error mapping
//!
//! Covers Resource Manager error codes and the OAuth2 error codes returned
//! by the Entra ID token endpoint.
//!
//! Reference: <https://learn.microsoft.com/azure/azure-resource-manager/troubleshooting/common-deployment-errors>

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::AzureProvider;

impl ProviderErrorMapper for AzureProvider {
    fn provider_name(&self) -> &'static str {
        "azure"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // Resource Manager and OAuth2 authentication failures
            Some(
                "AuthenticationFailed"
                | "InvalidAuthenticationToken"
                | "InvalidAuthenticationTokenTenant"
                | "ExpiredAuthenticationToken"
                | "invalid_client"
                | "invalid_grant"
                | "unauthorized_client",
            ) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("AuthorizationFailed" | "LinkedAuthorizationFailed") => {
                ProviderError::PermissionDenied {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            // AZURE_SUBSCRIPTION_ID does not name a usable subscription
            Some("SubscriptionNotFound" | "InvalidSubscriptionId" | "invalid_request") => {
                self.credential_source_error(raw.message)
            }

            Some("TooManyRequests" | "SubscriptionRequestsThrottled" | "temporarily_unavailable") => {
                ProviderError::RateLimited {
                    provider: self.provider_name().to_string(),
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            Some("ResourceNotFound" | "ParentResourceNotFound") => ProviderError::ZoneNotFound {
                provider: self.provider_name().to_string(),
                zone: context.zone.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            Some("InternalServerError" | "ServiceUnavailable" | "GatewayTimeout") => {
                ProviderError::NetworkError {
                    provider: self.provider_name().to_string(),
                    detail: raw.message,
                }
            }

            _ => self.unknown_error(raw),
        }
    }
}
