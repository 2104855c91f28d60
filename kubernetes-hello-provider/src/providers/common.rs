//! Helpers shared by the provider implementations

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::error::{ProviderError, Result};
use crate::types::HostedZone;

// ============ HTTP Client ============

/// Connection timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Whole-request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default number of automatic retries for transient errors
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Client builder with the default timeouts
pub fn http_client_builder() -> ClientBuilder {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
}

/// Create an HTTP client with timeouts configured
pub fn create_http_client(provider: &str) -> Result<Client> {
    build_http_client(http_client_builder(), provider)
}

pub fn build_http_client(builder: ClientBuilder, provider: &str) -> Result<Client> {
    builder.build().map_err(|e| ProviderError::NetworkError {
        provider: provider.to_string(),
        detail: format!("Failed to create HTTP client: {e}"),
    })
}

// ============ HMAC-SHA256 ============

#[cfg(feature = "aws")]
type HmacSha256 = hmac::Hmac<sha2::Sha256>;

/// HMAC-SHA256 (SigV4 key derivation and signing)
#[cfg(feature = "aws")]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    use hmac::Mac;

    #[allow(clippy::expect_used)]
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Lowercase hex SHA-256 digest
#[cfg(feature = "aws")]
pub fn sha256_hex(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};

    hex::encode(Sha256::digest(data))
}

// ============ Zones ============

/// Sort zones by name, byte-wise ascending. Name server order is untouched.
pub fn sort_zones(zones: &mut [HostedZone]) {
    zones.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Read an identity token file, trimming surrounding whitespace.
pub async fn read_token_file(path: &str, provider: &str) -> Result<String> {
    let token = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ProviderError::CredentialSource {
            provider: provider.to_string(),
            detail: format!("failed to read token file {path}: {e}"),
        })?;
    let token = token.trim();
    if token.is_empty() {
        return Err(ProviderError::CredentialSource {
            provider: provider.to_string(),
            detail: format!("token file {path} is empty"),
        });
    }
    Ok(token.to_string())
}
