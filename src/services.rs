//! Service labels for well-known port numbers.
//!
//! Pure lookup; the table is built once on first use.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Label used for ports that have no entry in the table.
pub const UNKNOWN_SERVICE: &str = "Unknown Service";

/// Static map of well-known ports to service labels.
static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert(20, "FTP Data");
    m.insert(21, "FTP Control");
    m.insert(22, "SSH");
    m.insert(23, "Telnet");
    m.insert(25, "SMTP");
    m.insert(53, "DNS");
    m.insert(69, "TFTP");
    m.insert(80, "HTTP");
    m.insert(88, "Kerberos");
    m.insert(110, "POP3");
    m.insert(111, "RPCbind");
    m.insert(123, "NTP");
    m.insert(135, "MS RPC");
    m.insert(139, "NetBIOS Session");
    m.insert(143, "IMAP");
    m.insert(161, "SNMP");
    m.insert(389, "LDAP");
    m.insert(443, "HTTPS");
    m.insert(445, "SMB");
    m.insert(465, "SMTPS");
    m.insert(587, "SMTP Submission");
    m.insert(636, "LDAPS");
    m.insert(993, "IMAPS");
    m.insert(995, "POP3S");
    m.insert(1433, "MSSQL");
    m.insert(1521, "Oracle");
    m.insert(1883, "MQTT");
    m.insert(2049, "NFS");
    m.insert(2375, "Docker");
    m.insert(3306, "MySQL");
    m.insert(3389, "RDP");
    m.insert(5432, "PostgreSQL");
    m.insert(5672, "AMQP");
    m.insert(5900, "VNC");
    m.insert(6379, "Redis");
    m.insert(8080, "HTTP Proxy");
    m.insert(8443, "HTTPS Alt");
    m.insert(9200, "Elasticsearch");
    m.insert(11211, "Memcached");
    m.insert(27017, "MongoDB");

    m
});

/// Look up the service label for a port.
///
/// Returns `None` if the port is not in the table.
pub fn service_name(port: u16) -> Option<&'static str> {
    PORT_SERVICES.get(&port).copied()
}

/// Service label for a port, falling back to [`UNKNOWN_SERVICE`].
pub fn service_label(port: u16) -> &'static str {
    service_name(port).unwrap_or(UNKNOWN_SERVICE)
}
