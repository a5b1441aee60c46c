//! Scan target definition, validation and host resolution.

use super::port::{PortError, PortRange};
use crate::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// A host and the inclusive port range to probe on it.
///
/// Immutable once a scan starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScanTarget")]
pub struct ScanTarget {
    host: String,
    ports: PortRange,
}

#[derive(Deserialize)]
struct RawScanTarget {
    host: String,
    ports: PortRange,
}

impl TryFrom<RawScanTarget> for ScanTarget {
    type Error = TargetError;

    fn try_from(raw: RawScanTarget) -> Result<Self, Self::Error> {
        Self::with_range(raw.host, raw.ports)
    }
}

impl ScanTarget {
    /// Create a target from a host and raw port bounds.
    pub fn new(host: impl Into<String>, low: u16, high: u16) -> Result<Self, TargetError> {
        Self::with_range(host, PortRange::from_bounds(low, high)?)
    }

    /// Create a target from a host and an already validated range.
    pub fn with_range(host: impl Into<String>, ports: PortRange) -> Result<Self, TargetError> {
        let host = host.into().trim().to_string();
        if host.is_empty() {
            return Err(TargetError::EmptyHost);
        }
        Ok(Self { host, ports })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ports(&self) -> PortRange {
        self.ports
    }

    /// Number of ports this target covers.
    pub fn total_ports(&self) -> usize {
        self.ports.len()
    }

    /// Resolve the host to a single IP address.
    ///
    /// IP literals are returned as-is; anything else goes through DNS.
    /// Failure here is a scan-level error, never a per-probe one.
    pub async fn resolve(&self) -> ScanResult<IpAddr> {
        if let Ok(ip) = self.host.parse::<IpAddr>() {
            return Ok(ip);
        }

        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

        let response = resolver
            .lookup_ip(self.host.as_str())
            .await
            .map_err(|e| ScanError::DnsResolution {
                host: self.host.clone(),
                reason: e.to_string(),
            })?;

        let ip = response
            .iter()
            .next()
            .ok_or_else(|| ScanError::NoAddresses(self.host.clone()))?;
        debug!(host = %self.host, %ip, "resolved target");
        Ok(ip)
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.ports)
    }
}

/// Error type for target validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("target host cannot be empty")]
    EmptyHost,
    #[error("invalid IP address: '{0}' (expected four dot-separated octets, each 0-255)")]
    InvalidIp(String),
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Validate an IPv4 literal the way the front end accepts it.
///
/// Exactly four dot-separated groups of one to three decimal digits, each
/// in 0-255. Leading zeros are allowed ("010" is 10).
pub fn parse_ipv4_literal(s: &str) -> Result<Ipv4Addr, TargetError> {
    let s = s.trim();
    let invalid = || TargetError::InvalidIp(s.to_string());

    let mut octets = [0u8; 4];
    let mut count = 0;
    for part in s.split('.') {
        if count == 4 || part.is_empty() || part.len() > 3 {
            return Err(invalid());
        }
        if !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: u16 = part.parse().map_err(|_| invalid())?;
        octets[count] = u8::try_from(value).map_err(|_| invalid())?;
        count += 1;
    }

    if count != 4 {
        return Err(invalid());
    }
    Ok(Ipv4Addr::from(octets))
}
