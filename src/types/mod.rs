//! Core type definitions using newtype patterns for type safety.
//!
//! These types make invalid ports, inverted ranges and empty hosts
//! unrepresentable once construction succeeds.

mod port;
mod target;

pub use port::{Port, PortError, PortRange};
pub use target::{parse_ipv4_literal, ScanTarget, TargetError};
