//! File content classification
//!
//! First match wins:
//! 1. PEM certificate marker: the whole content goes to the [`CertificateDecoder`]
//! 2. JWT-shaped token: header and payload are base64url-decoded and shown
//!    before the raw content
//! 3. Anything else: the content as text

use std::sync::{Arc, LazyLock};

use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use regex::bytes::Regex;

use super::certificate::CertificateDecoder;

const CERTIFICATE_MARKER: &[u8] = b"-----BEGIN CERTIFICATE-----";

#[allow(clippy::expect_used)]
static JWT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z0-9_-]+)\.([A-Za-z0-9_-]+)\.[A-Za-z0-9_-]+\s*").expect("valid JWT regex")
});

/// Unpadded base64url that tolerates non-zero trailing bits.
const BASE64_URL_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Turns raw file bytes into display text.
#[derive(Clone)]
pub struct ContentClassifier {
    certificates: Arc<dyn CertificateDecoder>,
}

impl ContentClassifier {
    pub fn new(certificates: Arc<dyn CertificateDecoder>) -> Self {
        Self { certificates }
    }

    /// Never fails; decoding problems become inline `ERROR ...` text.
    pub async fn classify(&self, raw: &[u8]) -> String {
        if contains(raw, CERTIFICATE_MARKER) {
            return match self.certificates.decode(raw).await {
                Ok(text) => text,
                Err(e) => {
                    log::debug!("Certificate decoding failed: {e}");
                    format!("ERROR {e}")
                }
            };
        }

        let text = String::from_utf8_lossy(raw);

        if let Some(captures) = JWT.captures(raw) {
            let decoded = match (captures.get(1), captures.get(2)) {
                (Some(header), Some(payload)) => jwt_text(header.as_bytes(), payload.as_bytes()),
                _ => Err("token segments not captured".to_string()),
            };
            return match decoded {
                Ok(info) => format!("{info}\n\n{text}"),
                Err(e) => format!("ERROR {e}\n\n{text}"),
            };
        }

        text.into_owned()
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

/// `header: <json>\n\npayload: <json>`; the signature is never decoded.
fn jwt_text(encoded_header: &[u8], encoded_payload: &[u8]) -> Result<String, String> {
    let header = BASE64_URL_LENIENT
        .decode(encoded_header)
        .map_err(|e| format!("failed to decode encodedHeader: {e}"))?;
    let payload = BASE64_URL_LENIENT
        .decode(encoded_payload)
        .map_err(|e| format!("failed to decode encodedPayload: {e}"))?;
    Ok(format!(
        "header: {}\n\npayload: {}",
        pretty_json(&header),
        pretty_json(&payload)
    ))
}

/// Two-space indented JSON with the original key order, or the bytes as-is.
fn pretty_json(bytes: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
}
