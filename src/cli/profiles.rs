//! Profiles subcommand implementation.
//!
//! Handles the `portsweep profiles` command for managing scan profiles.

use super::Context;
use crate::config::{Profile, ProfileManager};
use crate::error::CliResult;
use crate::output;
use clap::{Parser, Subcommand};

/// Manage scan profiles.
#[derive(Parser, Debug)]
pub struct ProfilesCommand {
    #[command(subcommand)]
    pub action: ProfilesAction,
}

/// Profile management actions.
#[derive(Subcommand, Debug)]
pub enum ProfilesAction {
    /// List all available profiles
    List,

    /// Show details of a specific profile
    Show {
        /// Profile name
        name: String,
    },

    /// Create a new profile
    Create {
        /// Profile name
        name: String,

        /// Timeout in milliseconds
        #[arg(short, long, default_value = "300")]
        timeout: u64,

        /// Concurrency level
        #[arg(short, long, default_value = "200")]
        concurrency: usize,

        /// Probe ports in random order
        #[arg(short, long)]
        randomize: bool,

        /// Delay before each probe in milliseconds
        #[arg(short, long, default_value = "0")]
        delay: u64,

        /// Profile description
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

impl ProfilesCommand {
    /// Execute the profiles command against the invocation's profile store.
    pub fn execute(&self, ctx: &Context, quiet: bool) -> CliResult<()> {
        let mut manager = ctx.profiles()?;
        self.execute_with(&mut manager, quiet)
    }

    pub fn execute_with(&self, manager: &mut ProfileManager, quiet: bool) -> CliResult<()> {
        match &self.action {
            ProfilesAction::List => list_profiles(manager, quiet),
            ProfilesAction::Show { name } => show_profile(manager, name),
            ProfilesAction::Create {
                name,
                timeout,
                concurrency,
                randomize,
                delay,
                description,
            } => {
                let profile = Profile {
                    name: name.clone(),
                    description: description.clone().unwrap_or_default(),
                    timeout_ms: *timeout,
                    concurrency: *concurrency,
                    randomize: *randomize,
                    delay_ms: *delay,
                };
                manager.create(profile)?;

                if !quiet {
                    output::print_success(&format!("Profile '{}' created successfully", name));
                }
                Ok(())
            }
            ProfilesAction::Delete { name, yes } => delete_profile(manager, name, *yes, quiet),
        }
    }
}

fn list_profiles(manager: &ProfileManager, quiet: bool) -> CliResult<()> {
    if !quiet {
        println!(
            "\n{:<15} {:>9} {:>7} {:>6} {:>9}  {}",
            "NAME", "TIMEOUT", "WORKERS", "RANDOM", "DELAY", "DESCRIPTION"
        );
        println!("{}", "-".repeat(80));
    }

    for profile in manager.list() {
        println!(
            "{:<15} {:>7}ms {:>7} {:>6} {:>7}ms  {}",
            profile.name,
            profile.timeout_ms,
            profile.concurrency,
            if profile.randomize { "yes" } else { "no" },
            profile.delay_ms,
            output::truncate_string(&profile.description, 30)
        );
    }

    if !quiet {
        println!();
    }

    Ok(())
}

fn show_profile(manager: &ProfileManager, name: &str) -> CliResult<()> {
    let profile = manager.get(name)?;

    println!("\nProfile: {}", profile.name);
    println!("{}", "=".repeat(40));
    println!("Description:  {}", profile.description);
    println!("Timeout:      {} ms", profile.timeout_ms);
    println!("Concurrency:  {}", profile.concurrency);
    println!("Randomize:    {}", if profile.randomize { "yes" } else { "no" });
    println!(
        "Delay:        {}",
        if profile.delay_ms == 0 {
            "none".to_string()
        } else {
            format!("{} ms", profile.delay_ms)
        }
    );
    println!(
        "Built-in:     {}",
        if Profile::is_builtin(&profile.name) { "yes" } else { "no" }
    );
    println!();

    Ok(())
}

fn delete_profile(manager: &mut ProfileManager, name: &str, yes: bool, quiet: bool) -> CliResult<()> {
    // Fail before prompting.
    manager.get(name)?;

    if !yes {
        println!("Delete profile '{}'? [y/N] ", name);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    manager.delete(name)?;

    if !quiet {
        output::print_success(&format!("Profile '{}' deleted", name));
    }

    Ok(())
}
