//! # portsweep - A concurrent TCP connect port scanner
//!
//! Probes an inclusive range of TCP ports on one host with a bounded pool
//! of async workers, names open ports from a small table of well-known
//! services, and reports progress with an estimated time to completion.
//!
//! ## Features
//!
//! - **Bounded concurrency**: at most `concurrency` connect attempts in flight
//! - **Stealth timing**: randomized probe order and a per-probe delay
//! - **Live callbacks**: open ports and progress as they happen
//! - **Cancellation**: stop a running scan and keep what it found
//! - **Export**: JSON, CSV and plain-text reports with scan metadata
//! - **Profiles**: named, reusable scan policies
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsweep::scanner::{scan, Hooks, ScanPolicy};
//! use portsweep::types::ScanTarget;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let target = ScanTarget::new("127.0.0.1", 1, 1024)?;
//!     let policy = ScanPolicy::new().with_concurrency(100);
//!
//!     let mut hooks = Hooks::new()
//!         .on_result(|port, service| println!("Port {port}: OPEN - {service}"));
//!     let results = scan(&target, policy, &mut hooks).await?;
//!
//!     println!("{}", results.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated ports, ranges and scan targets
//! - [`services`] - Well-known port to service name table
//! - [`scanner`] - Probe, work queue and coordinator
//! - [`progress`] - ETA derivation and formatting
//! - [`export`] - File export of results
//! - [`config`] - Settings file and scan profiles
//! - [`output`] - Terminal rendering
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ExportError, ScanError};
pub use export::{export, ExportFormat, Metadata};
pub use progress::{estimate_remaining, format_eta};
pub use scanner::{scan, scan_with_cancel, Hooks, ScanObserver, ScanPolicy, ScanResults};
pub use services::service_name;
pub use types::{Port, PortRange, ScanTarget};
