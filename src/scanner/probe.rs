//! Single-port TCP connect probe.
//!
//! Performs one connect attempt using the operating system's socket API,
//! bounded by a timeout, and classifies the outcome. Completes the full
//! handshake, so it needs no privileges but is easily logged by the target.

use crate::services::service_label;
use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// An open port and the service label it was tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenPort {
    pub port: Port,
    pub service: String,
}

impl OpenPort {
    /// Tag a port with its label from the service table.
    pub fn new(port: Port) -> Self {
        Self {
            port,
            service: service_label(port.as_u16()).to_string(),
        }
    }
}

impl fmt::Display for OpenPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Port {}: OPEN - {}", self.port, self.service)
    }
}

/// Classified result of one probe.
///
/// Only `Open` is retained by the coordinator; everything else counts as
/// "not open" for the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Connection established within the timeout.
    Open(OpenPort),
    /// Connection actively refused.
    Closed,
    /// Timed out, or host/network unreachable.
    Unreachable,
    /// Any other network-layer failure.
    Error(String),
}

impl ProbeOutcome {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// Something that can probe one port of an already resolved host.
///
/// The coordinator is generic over this so alternative probes (and scripted
/// ones in tests) can be swapped in.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, port: Port) -> ProbeOutcome;
}

/// TCP connect prober for one resolved address.
#[derive(Debug, Clone)]
pub struct TcpProber {
    ip: IpAddr,
    timeout: Duration,
}

impl TcpProber {
    /// # Arguments
    /// * `ip` - Resolved target address
    /// * `timeout` - Connect timeout per port
    pub fn new(ip: IpAddr, timeout: Duration) -> Self {
        Self { ip, timeout }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, port: Port) -> ProbeOutcome {
        probe(self.ip, port, self.timeout).await
    }
}

/// Attempt one TCP connection to `(ip, port)` bounded by `connect_timeout`.
///
/// The stream, if any, is dropped before returning.
pub async fn probe(ip: IpAddr, port: Port, connect_timeout: Duration) -> ProbeOutcome {
    let addr = SocketAddr::new(ip, port.as_u16());

    match timeout(connect_timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            ProbeOutcome::Open(OpenPort::new(port))
        }
        Ok(Err(e)) => classify_error(&e),
        Err(_) => ProbeOutcome::Unreachable,
    }
}

fn classify_error(e: &io::Error) -> ProbeOutcome {
    match e.kind() {
        io::ErrorKind::ConnectionRefused => ProbeOutcome::Closed,
        io::ErrorKind::TimedOut
        | io::ErrorKind::HostUnreachable
        | io::ErrorKind::NetworkUnreachable => ProbeOutcome::Unreachable,
        _ => {
            // Some platforms report unreachability under a generic kind.
            let message = e.to_string();
            if message.to_lowercase().contains("unreachable") {
                ProbeOutcome::Unreachable
            } else {
                ProbeOutcome::Error(message)
            }
        }
    }
}
