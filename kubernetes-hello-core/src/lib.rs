//! kubernetes-hello core library
//!
//! Builds the diagnostic snapshot served by `kubernetes-hello-web`:
//! - process properties and environment
//! - recursive scans of the secrets and configs roots, with certificate and
//!   JWT decoding of file contents
//! - the containers of the pod, read from the Kubernetes API
//! - hosted DNS zones of every cloud provider the workload runs on
//!
//! Platform-independent; the web layer only renders a [`Snapshot`].

pub mod config;
pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{AppConfig, ScanPolicy};
pub use error::{CoreError, CoreResult};
pub use services::{PodInspector, SnapshotService};
pub use types::{NameValuePair, NameValuePairs, Properties, Snapshot, ZoneSection};
