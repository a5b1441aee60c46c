//! CLI subcommand definitions and handlers.
//!
//! - `portsweep scan <ip>` - Scan a port range on one IPv4 host
//! - `portsweep profiles list|show|create|delete` - Manage scan profiles

mod profiles;
mod scan;

pub use profiles::{ProfilesAction, ProfilesCommand};
pub use scan::ScanCommand;

use crate::config::{AppSettings, Paths, ProfileManager};
use crate::error::{CliResult, ConfigError};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;

/// portsweep - A concurrent TCP connect port scanner.
///
/// Probes a range of ports on one IPv4 host with a bounded worker pool,
/// optionally in random order with a delay between probes, and reports
/// open ports with a live ETA.
#[derive(Parser, Debug)]
#[command(name = "portsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP connect port scanner", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to custom settings file
    #[arg(long, global = true, value_name = "PATH", env = "PORTSWEEP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a target for open ports
    #[command(alias = "s")]
    Scan(ScanCommand),

    /// Manage scan profiles
    #[command(alias = "p")]
    Profiles(ProfilesCommand),
}

impl Cli {
    /// Default tracing filter for the chosen verbosity. `RUST_LOG` wins over
    /// this when set.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "portsweep=debug"
        } else if self.quiet {
            "portsweep=error"
        } else {
            "portsweep=warn"
        }
    }

    pub fn command_name(&self) -> &'static str {
        match self.command {
            Commands::Scan(_) => "scan",
            Commands::Profiles(_) => "profiles",
        }
    }
}

/// Settings and profile location for one invocation.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub settings: AppSettings,
    /// `None` means the platform profiles directory.
    pub profiles_dir: Option<PathBuf>,
}

impl Context {
    /// With `--config`, profiles live in a `profiles/` directory next to the
    /// settings file.
    pub fn load(config: Option<&Path>) -> CliResult<Self> {
        Ok(Self {
            settings: load_settings(config)?,
            profiles_dir: config.map(profiles_dir_for),
        })
    }

    pub fn profiles(&self) -> CliResult<ProfileManager> {
        match &self.profiles_dir {
            Some(dir) => Ok(ProfileManager::open(dir)?),
            None => Ok(ProfileManager::new()?),
        }
    }
}

fn profiles_dir_for(config: &Path) -> PathBuf {
    Paths::at(config.parent().unwrap_or(Path::new(""))).profiles_dir()
}

/// Load settings and dispatch to the selected subcommand.
pub async fn run(cli: Cli) -> CliResult<()> {
    let ctx = Context::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Scan(cmd) => cmd.execute(&ctx, cli.quiet).await,
        Commands::Profiles(cmd) => cmd.execute(&ctx, cli.quiet),
    }
}

/// An explicit `--config` file must exist; the default location may not.
fn load_settings(path: Option<&Path>) -> CliResult<AppSettings> {
    match path {
        Some(path) => Ok(AppSettings::load_from(path)?),
        None => match AppSettings::load() {
            Ok(settings) => Ok(settings),
            Err(ConfigError::DirectoryNotFound) => {
                warn!("no configuration directory on this platform, using defaults");
                Ok(AppSettings::default())
            }
            Err(e) => Err(e.into()),
        },
    }
}
