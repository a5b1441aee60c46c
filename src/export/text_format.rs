//! Plain-text report.

use super::Metadata;
use crate::scanner::ScanResults;
use std::fmt::Write;

const TITLE: &str = "portsweep - Scan Results";

pub fn render_text(results: &ScanResults, metadata: &Metadata) -> String {
    let mut out = String::new();
    let _ = write_report(&mut out, results, metadata);
    out
}

fn write_report(out: &mut String, results: &ScanResults, metadata: &Metadata) -> std::fmt::Result {
    writeln!(out, "{}", TITLE)?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out)?;

    if !metadata.is_empty() {
        writeln!(out, "Scan Metadata:")?;
        for (key, value) in metadata {
            writeln!(out, "  {}: {}", key, value)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Target IP: {}", results.target.host())?;
    writeln!(out, "Port Range: {}", results.target.ports())?;
    writeln!(out, "Total Open Ports: {}", results.open_count())?;
    writeln!(out)?;

    if results.open_ports.is_empty() {
        writeln!(out, "No open ports found.")?;
    } else {
        writeln!(out, "Open Ports:")?;
        writeln!(out, "{}", "-".repeat(60))?;
        for open in &results.open_ports {
            writeln!(out, "Port {:>5}: OPEN - {}", open.port, open.service)?;
        }
    }
    Ok(())
}
