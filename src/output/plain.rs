//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::{ScanPolicy, ScanResults};
use crate::types::ScanTarget;
use console::style;
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print results to stdout.
pub fn print_results(results: &ScanResults) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_results(&mut out, results)
}

/// Render the results table and status line.
pub fn write_results<W: Write>(out: &mut W, results: &ScanResults) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                   {} Scan Results",
        style("portsweep").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), results.target.host())?;
    writeln!(out, "  {} {}", style("Port Range:").bold(), results.target.ports())?;
    writeln!(
        out,
        "  {} {}/{} ports scanned in {:.2}s",
        style("Statistics:").bold(),
        results.ports_scanned,
        results.total_ports,
        results.duration.as_secs_f64()
    )?;
    writeln!(out)?;

    if results.open_ports.is_empty() {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    } else {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {:<8}  {}",
            style("PORT").bold(),
            style("STATE").bold(),
            style("SERVICE").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for open in &results.open_ports {
            writeln!(
                out,
                "  {:>6}  {:<8}  {}",
                open.port,
                style("open").green().bold(),
                open.service
            )?;
        }

        writeln!(out, "  {}", style(THIN_RULE).dim())?;
    }

    writeln!(out)?;
    let summary = results.summary();
    if results.cancelled {
        writeln!(out, "  {}", style(summary).yellow().bold())?;
    } else {
        writeln!(out, "  {}", style(summary).green())?;
    }
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &ScanTarget, policy: &ScanPolicy) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Target: {}",
        style("•").dim(),
        style(target.host()).white().bold()
    );
    println!(
        "{} Scanning {} ports ({}) with {} workers, {}ms timeout",
        style("•").dim(),
        style(target.total_ports()).white().bold(),
        target.ports(),
        policy.effective_workers(target.total_ports()),
        policy.timeout.as_millis()
    );
    if policy.is_stealthy() {
        println!(
            "{} Stealth: randomized={}, delay={}ms",
            style("•").dim(),
            style(policy.randomize).yellow(),
            style(policy.inter_probe_delay.as_millis()).yellow()
        );
    }
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Truncate a string to at most `max_len` characters, adding an ellipsis if
/// truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::OpenPort;
    use crate::types::Port;
    use std::time::Duration;

    fn results(open: &[u16], cancelled: bool) -> ScanResults {
        ScanResults {
            target: ScanTarget::new("127.0.0.1", 20, 30).unwrap(),
            timeout: Duration::from_millis(300),
            open_ports: open
                .iter()
                .map(|&p| OpenPort::new(Port::new(p).unwrap()))
                .collect(),
            ports_scanned: if cancelled { 4 } else { 11 },
            total_ports: 11,
            duration: Duration::from_millis(50),
            cancelled,
        }
    }

    fn render(results: &ScanResults) -> String {
        let mut buf = Vec::new();
        write_results(&mut buf, results).unwrap();
        console::strip_ansi_codes(&String::from_utf8(buf).unwrap()).into_owned()
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("ééééé", 4), "é...");
    }

    #[test]
    fn test_results_table() {
        let text = render(&results(&[22, 25], false));
        assert!(text.contains("Port Range: 20-30"));
        assert!(text.contains("11/11 ports scanned"));
        assert!(text.contains("SSH"));
        assert!(text.contains("SMTP"));
        assert!(text.contains("Scan complete - Found 2 open port(s)"));
    }

    #[test]
    fn test_empty_and_cancelled() {
        let text = render(&results(&[], false));
        assert!(text.contains("No open ports found."));
        assert!(text.contains("Scan complete - No open ports found"));

        let text = render(&results(&[], true));
        assert!(text.contains("Scan stopped by user"));
        assert!(text.contains("4/11 ports scanned"));
    }
}
