//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use kubernetes_hello_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// A file discovered by a scan could not be inspected or read
    #[error("Scan error: {path}: {message}")]
    Scan { path: String, message: String },

    /// Certificate decoding command failed
    #[error("{0}")]
    Certificate(String),

    /// Local I/O error outside of a scan
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (missing credentials, denied access), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Config(_) | Self::Certificate(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::Scan { .. } | Self::Io(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_names_the_path() {
        let err = CoreError::Scan {
            path: "/var/run/secrets/token".to_string(),
            message: "Permission denied (os error 13)".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Scan error: /var/run/secrets/token: Permission denied (os error 13)"
        );
        assert!(!err.is_expected());
    }

    #[test]
    fn provider_errors_pass_through() {
        let err = CoreError::from(ProviderError::CredentialSource {
            provider: "aws".to_string(),
            detail: "token file /t is empty".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "[aws] Credential source error: token file /t is empty"
        );
        assert!(err.is_expected());
    }

    #[test]
    fn serializes_with_code_tag() {
        let json = serde_json::to_value(CoreError::Config("bad listen".to_string())).unwrap();
        assert_eq!(json["code"], "Config");
        assert_eq!(json["details"], "bad listen");
    }
}
