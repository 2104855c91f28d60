//! Application configuration
//!
//! Loaded from a TOML file; every key is optional.
//!
//! ```toml
//! listen = "0.0.0.0:8000"
//! secrets_dir = "/var/run/secrets"
//! configs_dir = "/var/run/configs"
//! provider_timeout_secs = 20
//! scan_policy = "degrade"
//! certificate_command = ["openssl", "x509", "-text"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// What a scan does when a discovered file cannot be inspected or read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanPolicy {
    /// Keep going; the file's value becomes `ERROR <message>`.
    #[default]
    Degrade,
    /// Abort the scan, and with it the whole snapshot.
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Listen address of the HTTP server.
    pub listen: String,
    pub secrets_dir: PathBuf,
    pub configs_dir: PathBuf,
    /// Upper bound for one provider's `list_zones`.
    pub provider_timeout_secs: u64,
    pub scan_policy: ScanPolicy,
    /// Program and arguments; the PEM is written to its stdin.
    pub certificate_command: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
            secrets_dir: PathBuf::from("/var/run/secrets"),
            configs_dir: PathBuf::from("/var/run/configs"),
            provider_timeout_secs: 20,
            scan_policy: ScanPolicy::Degrade,
            certificate_command: vec!["openssl".to_string(), "x509".to_string(), "-text".to_string()],
        }
    }
}

impl AppConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.listen.trim().is_empty() {
            return Err(CoreError::Config("listen must not be empty".to_string()));
        }
        if self.provider_timeout_secs == 0 {
            return Err(CoreError::Config(
                "provider_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.certificate_command.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(CoreError::Config(
                "certificate_command must name a program".to_string(),
            ));
        }
        Ok(())
    }
}
