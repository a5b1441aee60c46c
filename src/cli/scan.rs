//! Scan subcommand implementation.
//!
//! Handles the `portsweep scan <ip>` command.

use super::Context;
use crate::config::AppSettings;
use crate::error::CliResult;
use crate::export::{self, ExportFormat, Metadata};
use crate::output;
use crate::progress::ProgressReporter;
use crate::scanner::{scan_with_cancel, ScanObserver, ScanPolicy, ScanResults};
use crate::types::{parse_ipv4_literal, Port, PortRange, ScanTarget};
use chrono::{DateTime, Local};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Scan a port range on one IPv4 host.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Target IPv4 address (dotted quad, e.g. 192.168.1.10)
    #[arg(value_name = "IP")]
    pub target: String,

    /// First port of the range
    #[arg(short = 's', long = "start-port", default_value = "1")]
    pub start_port: Port,

    /// Last port of the range (inclusive)
    #[arg(short = 'e', long = "end-port", default_value = "1024")]
    pub end_port: Port,

    /// Connection timeout in milliseconds
    #[arg(
        short = 't',
        long = "timeout",
        env = "PORTSWEEP_TIMEOUT_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_ms: Option<u64>,

    /// Maximum number of probes in flight
    #[arg(short = 'c', long, env = "PORTSWEEP_CONCURRENCY", value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Probe ports in random order
    #[arg(short = 'r', long)]
    pub randomize: bool,

    /// Delay before each probe, per worker, in milliseconds
    #[arg(short = 'd', long = "delay", env = "PORTSWEEP_DELAY_MS")]
    pub delay_ms: Option<u64>,

    /// Use a saved scan profile
    #[arg(short = 'P', long = "profile", env = "PORTSWEEP_PROFILE")]
    pub profile: Option<String>,

    /// Export results to this file
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub export_path: Option<PathBuf>,

    /// Export format: json, csv or txt (default: from the file extension)
    #[arg(short = 'f', long = "format", requires = "export_path")]
    pub format: Option<String>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

fn parse_concurrency(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("concurrency must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(&self, ctx: &Context, quiet: bool) -> CliResult<()> {
        let target = self.target()?;
        let policy = self.policy(ctx)?;
        let export_format = self.export_format(&ctx.settings)?;

        if !quiet {
            output::print_scan_header(&target, &policy);
        }

        let started_at = Local::now();
        let mut observer = TerminalObserver::new(target.total_ports(), quiet || self.no_progress, quiet);

        let cancel = CancellationToken::new();
        let signal = cancel.clone();
        let ctrl_c = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                signal.cancel();
            }
        });

        let outcome = scan_with_cancel(&target, policy.clone(), &mut observer, cancel).await;
        ctrl_c.abort();
        observer.finish();
        let results = outcome?;

        output::print_results(&results)?;

        if let Some(notice) = partial_results_notice(&results) {
            output::print_warning(&notice);
        }

        if let (Some(path), Some(format)) = (&self.export_path, export_format) {
            let metadata = scan_metadata(&results, &policy, started_at);
            export::export_as(&results, path, format, &metadata)?;
            if !quiet {
                output::print_success(&format!("Results exported to {}", path.display()));
            }
        }

        Ok(())
    }

    /// Validated target: a strict IPv4 literal and an ordered range.
    pub fn target(&self) -> CliResult<ScanTarget> {
        let ip = parse_ipv4_literal(&self.target)?;
        let range = PortRange::new(self.start_port, self.end_port)?;
        Ok(ScanTarget::with_range(ip.to_string(), range)?)
    }

    /// Flags override the profile, which overrides the settings file.
    pub fn policy(&self, ctx: &Context) -> CliResult<ScanPolicy> {
        let mut policy = match &self.profile {
            Some(name) => {
                let manager = ctx.profiles()?;
                let profile = manager.get(name)?;
                debug!(profile = %profile.name, "using scan profile");
                profile.policy()
            }
            None => ctx.settings.policy(),
        };

        if let Some(ms) = self.timeout_ms {
            policy.timeout = Duration::from_millis(ms);
        }
        if let Some(n) = self.concurrency {
            policy.concurrency = n;
        }
        if self.randomize {
            policy.randomize = true;
        }
        if let Some(ms) = self.delay_ms {
            policy.inter_probe_delay = Duration::from_millis(ms);
        }

        Ok(policy)
    }

    /// Resolved before scanning so a bad format fails fast.
    fn export_format(&self, settings: &AppSettings) -> CliResult<Option<ExportFormat>> {
        let Some(path) = &self.export_path else {
            return Ok(None);
        };

        let name = match &self.format {
            Some(format) => format.clone(),
            None => format_from_extension(path)
                .unwrap_or_else(|| settings.default_export_format.clone()),
        };

        Ok(Some(name.parse()?))
    }
}

fn format_from_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    ext.parse::<ExportFormat>().ok().map(|f| f.extension().to_string())
}

/// Warning shown when a scan was stopped before every port was probed.
fn partial_results_notice(results: &ScanResults) -> Option<String> {
    results.cancelled.then(|| {
        format!(
            "Scan stopped by user: {} of {} ports probed, results are partial",
            results.ports_scanned, results.total_ports
        )
    })
}

/// Metadata written into every export.
pub fn scan_metadata(
    results: &ScanResults,
    policy: &ScanPolicy,
    started_at: DateTime<Local>,
) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(
        "timestamp".to_string(),
        started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    metadata.insert(
        "scan_duration_seconds".to_string(),
        format!("{:.2}", results.duration.as_secs_f64()),
    );
    metadata.insert("randomized".to_string(), policy.randomize.to_string());
    metadata.insert(
        "scan_delay_ms".to_string(),
        policy.inter_probe_delay.as_millis().to_string(),
    );
    metadata.insert("concurrency".to_string(), policy.concurrency.to_string());
    metadata
}

/// Drives the progress bar and prints open ports as they are found.
struct TerminalObserver {
    bar: ProgressBar,
    reporter: ProgressReporter,
    silent: bool,
}

impl TerminalObserver {
    fn new(total: usize, hide_bar: bool, silent: bool) -> Self {
        let bar = if hide_bar {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(total as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-");
            bar.set_style(style);
            bar.set_message("ETC: calculating...");
            bar
        };

        Self {
            bar,
            reporter: ProgressReporter::start(),
            silent,
        }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ScanObserver for TerminalObserver {
    fn on_result(&mut self, port: Port, service: &str) {
        if self.silent {
            return;
        }
        let line = format!("Port {}: OPEN - {}", port, service);
        if self.bar.is_hidden() {
            println!("{}", line);
        } else {
            self.bar.println(line);
        }
    }

    fn on_progress(&mut self, scanned: usize, total: usize) {
        self.bar.set_position(scanned as u64);
        let snapshot = self.reporter.snapshot(scanned, total);
        self.bar.set_message(format!("ETC: {}", snapshot.eta_display()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use crate::scanner::OpenPort;

    fn parse(args: &[&str]) -> ScanCommand {
        let mut argv = vec!["scan"];
        argv.extend_from_slice(args);
        ScanCommand::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_come_from_settings() {
        let cmd = parse(&["127.0.0.1"]);
        let ctx = Context {
            settings: AppSettings {
                default_concurrency: 64,
                ..AppSettings::default()
            },
            profiles_dir: None,
        };

        let policy = cmd.policy(&ctx).unwrap();
        assert_eq!(policy.concurrency, 64);
        assert_eq!(policy.timeout, Duration::from_millis(300));

        let target = cmd.target().unwrap();
        assert_eq!(target.ports().to_string(), "1-1024");
    }

    #[test]
    fn test_flags_override_settings() {
        let cmd = parse(&["10.0.0.1", "-s", "20", "-e", "25", "-t", "150", "-c", "10", "-r", "-d", "5"]);
        let policy = cmd.policy(&Context::default()).unwrap();

        assert_eq!(policy.timeout, Duration::from_millis(150));
        assert_eq!(policy.concurrency, 10);
        assert!(policy.randomize);
        assert_eq!(policy.inter_probe_delay, Duration::from_millis(5));
        assert_eq!(cmd.target().unwrap().total_ports(), 6);
    }

    #[test]
    fn test_profile_from_config_directory() {
        let dir = tempfile::tempdir().unwrap();
        let profiles_dir = dir.path().join("profiles");
        let mut profile = crate::config::Profile::new("lab");
        profile.concurrency = 9;
        profile.randomize = true;
        crate::config::ProfileManager::open(&profiles_dir)
            .unwrap()
            .create(profile)
            .unwrap();

        let ctx = Context {
            settings: AppSettings::default(),
            profiles_dir: Some(profiles_dir),
        };

        let policy = parse(&["127.0.0.1", "-P", "lab"]).policy(&ctx).unwrap();
        assert_eq!(policy.concurrency, 9);
        assert!(policy.randomize);

        let policy = parse(&["127.0.0.1", "-P", "lab", "-c", "4"]).policy(&ctx).unwrap();
        assert_eq!(policy.concurrency, 4);

        assert!(matches!(
            parse(&["127.0.0.1", "-P", "missing"]).policy(&ctx),
            Err(CliError::Profile(_))
        ));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            parse(&["256.1.1.1"]).target(),
            Err(CliError::Target(_))
        ));
        assert!(matches!(
            parse(&["example.com"]).target(),
            Err(CliError::Target(_))
        ));
        assert!(matches!(
            parse(&["127.0.0.1", "-s", "100", "-e", "10"]).target(),
            Err(CliError::Port(_))
        ));

        assert!(ScanCommand::try_parse_from(["scan", "127.0.0.1", "-s", "0"]).is_err());
        assert!(ScanCommand::try_parse_from(["scan", "127.0.0.1", "-e", "65536"]).is_err());
        assert!(ScanCommand::try_parse_from(["scan", "127.0.0.1", "-c", "0"]).is_err());
        assert!(ScanCommand::try_parse_from(["scan", "127.0.0.1", "-t", "0"]).is_err());
    }

    #[test]
    fn test_export_format_resolution() {
        let settings = AppSettings::default();

        assert_eq!(parse(&["127.0.0.1"]).export_format(&settings).unwrap(), None);
        assert_eq!(
            parse(&["127.0.0.1", "-o", "out.csv"]).export_format(&settings).unwrap(),
            Some(ExportFormat::Csv)
        );
        assert_eq!(
            parse(&["127.0.0.1", "-o", "out.log"]).export_format(&settings).unwrap(),
            Some(ExportFormat::Json)
        );
        assert_eq!(
            parse(&["127.0.0.1", "-o", "out.csv", "-f", "TXT"]).export_format(&settings).unwrap(),
            Some(ExportFormat::Text)
        );
        assert!(matches!(
            parse(&["127.0.0.1", "-o", "out.x", "-f", "xml"]).export_format(&settings),
            Err(CliError::Export(_))
        ));
    }

    #[test]
    fn test_partial_results_notice() {
        let mut results = ScanResults {
            target: ScanTarget::new("127.0.0.1", 1, 100).unwrap(),
            timeout: Duration::from_millis(300),
            open_ports: Vec::new(),
            ports_scanned: 100,
            total_ports: 100,
            duration: Duration::from_millis(40),
            cancelled: false,
        };
        assert_eq!(partial_results_notice(&results), None);

        results.ports_scanned = 37;
        results.cancelled = true;
        assert_eq!(
            partial_results_notice(&results).unwrap(),
            "Scan stopped by user: 37 of 100 ports probed, results are partial"
        );
    }

    #[test]
    fn test_scan_metadata() {
        let results = ScanResults {
            target: ScanTarget::new("127.0.0.1", 80, 80).unwrap(),
            timeout: Duration::from_millis(300),
            open_ports: vec![OpenPort::new(Port::new(80).unwrap())],
            ports_scanned: 1,
            total_ports: 1,
            duration: Duration::from_millis(1250),
            cancelled: false,
        };
        let policy = ScanPolicy::new()
            .with_randomize(true)
            .with_delay(Duration::from_millis(50));

        let metadata = scan_metadata(&results, &policy, Local::now());
        assert_eq!(metadata["scan_duration_seconds"], "1.25");
        assert_eq!(metadata["randomized"], "true");
        assert_eq!(metadata["scan_delay_ms"], "50");
        assert_eq!(metadata["concurrency"], "200");
        assert_eq!(metadata["timestamp"].len(), "2024-01-01 12:00:00".len());
    }
}
