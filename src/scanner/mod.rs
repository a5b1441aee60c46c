//! Scanning engine.
//!
//! - [`probe`]: one bounded TCP connect attempt, classified
//! - [`queue`]: the shared, optionally shuffled port queue
//! - [`coordinator`]: the worker pool, result collection and callbacks
//! - [`policy`]: timeout, concurrency and stealth timing

pub mod coordinator;
pub mod policy;
pub mod probe;
pub mod queue;

pub use coordinator::{scan, scan_with_cancel, Coordinator, Hooks, ScanObserver, ScanResults};
pub use policy::ScanPolicy;
pub use probe::{probe, OpenPort, ProbeOutcome, Prober, TcpProber};
pub use queue::WorkQueue;
