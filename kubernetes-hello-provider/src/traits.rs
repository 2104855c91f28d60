use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{HostedZone, ProviderType};

/// Raw API error (internal use)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error code (format differs per vendor)
    pub code: Option<String>,
    /// Original error message
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra information used while mapping an error (internal use)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Zone identifier (for `ZoneNotFound`)
    pub zone: Option<String>,
}

impl ErrorContext {
    pub fn zone(zone: impl Into<String>) -> Self {
        Self {
            zone: Some(zone.into()),
        }
    }
}

/// Maps vendor error codes onto [`ProviderError`] (internal use)
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: parse error
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: ambient identity material is missing or broken
    fn credential_source_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::CredentialSource {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// Shortcut: unknown error (fallback)
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Hosted DNS zone discovery for one cloud vendor.
///
/// Implementations decide from ambient markers (captured at construction)
/// whether the process runs on their platform. When it does not,
/// [`list_zones`](Self::list_zones) returns an empty list and performs no I/O.
#[async_trait]
pub trait ZoneProvider: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// Vendor of this provider
    fn provider_type(&self) -> ProviderType;

    /// Whether the ambient markers for this vendor are present
    fn is_applicable(&self) -> bool;

    /// Lists every hosted zone with its delegation set, sorted by zone name.
    ///
    /// Any failure while authenticating or enumerating fails the whole call;
    /// a partial zone list is never returned.
    async fn list_zones(&self) -> Result<Vec<HostedZone>>;
}
