//! Command line interface

use std::path::PathBuf;

use clap::Parser;
use kubernetes_hello_core::{AppConfig, CoreResult};

/// Diagnostic page describing the pod it runs in.
#[derive(Debug, Parser)]
#[command(name = "kubernetes-hello", version, about)]
pub struct Cli {
    /// Listen address, e.g. `0.0.0.0:8000` or `:8000`.
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// TOML configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Configuration file (or defaults) with command line overrides applied.
    pub fn load_config(&self) -> CoreResult<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(listen) = &self.listen {
            config.listen.clone_from(listen);
        }
        config.validate()?;
        Ok(config)
    }
}

/// `:8000` binds every interface, like Go's `net.Listen`.
pub fn bind_address(listen: &str) -> String {
    if listen.starts_with(':') {
        format!("0.0.0.0{listen}")
    } else {
        listen.to_string()
    }
}
