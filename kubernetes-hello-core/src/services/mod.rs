//! Snapshot collection services

pub mod certificate;
pub mod classifier;
pub mod environment;
pub mod pod;
pub mod properties;
pub mod scanner;
mod snapshot;

pub use certificate::{CertificateDecoder, CommandCertificateDecoder};
pub use classifier::ContentClassifier;
pub use environment::{collect_environment, environment_pairs};
pub use pod::{PodInspector, format_containers};
pub use properties::{collect_properties, format_uptime};
pub use scanner::DirectoryScanner;
pub use snapshot::SnapshotService;
