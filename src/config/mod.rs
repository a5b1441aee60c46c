//! Configuration for portsweep.
//!
//! A JSON settings file supplies defaults; named profiles bundle a scan
//! policy. Both live under the platform configuration directory.

mod profiles;
mod settings;

pub use profiles::{Profile, ProfileManager};
pub use settings::{AppSettings, Paths};
