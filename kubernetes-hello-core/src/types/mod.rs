//! Type definitions

mod pairs;
mod snapshot;

pub use pairs::{NameValuePair, NameValuePairs};
pub use snapshot::{Properties, Snapshot, ZoneSection};

// Re-export the provider library's public types
pub use kubernetes_hello_provider::{HostedZone, ProviderType};
