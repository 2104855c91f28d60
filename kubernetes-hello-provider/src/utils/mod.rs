//! Utility modules.

/// Log sanitization utilities to keep tokens and keys out of logs.
pub mod log_sanitizer;
