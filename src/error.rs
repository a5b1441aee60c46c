//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Individual probe
//! failures are not errors: they are reported as
//! [`ProbeOutcome`](crate::scanner::ProbeOutcome) values and never abort a scan.

use crate::types::{PortError, TargetError};
use std::path::PathBuf;
use thiserror::Error;

/// Scan-level failures, distinct from "no open ports found".
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("DNS resolution failed for '{host}': {reason}")]
    DnsResolution { host: String, reason: String },

    #[error("no IP addresses found for host '{0}'")]
    NoAddresses(String),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised while writing scan results to a file.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("unsupported export format: '{0}' (expected json, csv or txt)")]
    UnsupportedFormat(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Configuration file and directory errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory for this platform")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Scan profile errors.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("profile '{0}' not found")]
    NotFound(String),

    #[error("profile '{0}' already exists")]
    AlreadyExists(String),

    #[error("invalid profile: {0}")]
    Invalid(String),

    #[error("failed to save profile: {0}")]
    SaveFailed(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type ProfileResult<T> = Result<T, ProfileError>;

/// Errors surfaced by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message() {
        let err = ExportError::UnsupportedFormat("invalid".to_string());
        assert!(err.to_string().contains("'invalid'"));
    }

    #[test]
    fn test_cli_error_wraps_scan_error() {
        let err: CliError = ScanError::NoAddresses("example.invalid".to_string()).into();
        assert!(matches!(err, CliError::Scan(ScanError::NoAddresses(_))));
        assert_eq!(
            err.to_string(),
            "no IP addresses found for host 'example.invalid'"
        );
    }
}
