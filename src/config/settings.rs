//! Application settings and paths.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::ScanPolicy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Platform configuration locations.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portsweep on Linux)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory for this platform.
    ///
    /// Does not create anything on disk.
    pub fn discover() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portsweep", "portsweep")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self::at(project.config_dir()))
    }

    /// Paths rooted at an explicit directory.
    pub fn at(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.config_dir.join("profiles")
    }
}

/// Application-wide defaults, overridden by profiles and flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Connect timeout in milliseconds.
    pub default_timeout_ms: u64,
    pub default_concurrency: usize,
    pub default_randomize: bool,
    /// Per-worker sleep before each probe, in milliseconds.
    pub default_delay_ms: u64,
    /// Used when `-o` is given without `-f`.
    pub default_export_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_timeout_ms: ScanPolicy::DEFAULT_TIMEOUT.as_millis() as u64,
            default_concurrency: ScanPolicy::DEFAULT_CONCURRENCY,
            default_randomize: false,
            default_delay_ms: 0,
            default_export_format: "json".to_string(),
        }
    }
}

impl AppSettings {
    /// Load settings from the platform location, or defaults if there is no
    /// settings file yet.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::discover()?.settings_file();

        if !file.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file, which must exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "default_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.default_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "default_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The scan policy these settings describe.
    pub fn policy(&self) -> ScanPolicy {
        ScanPolicy::new()
            .with_timeout(Duration::from_millis(self.default_timeout_ms))
            .with_concurrency(self.default_concurrency)
            .with_randomize(self.default_randomize)
            .with_delay(Duration::from_millis(self.default_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.default_timeout_ms, 300);
        assert_eq!(settings.default_concurrency, 200);
        assert_eq!(settings.policy(), ScanPolicy::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "default_concurrency": 50, "default_randomize": true }"#).unwrap();

        let settings = AppSettings::load_from(&path).unwrap();
        assert_eq!(settings.default_concurrency, 50);
        assert!(settings.default_randomize);
        assert_eq!(settings.default_timeout_ms, 300);
        assert_eq!(settings.default_export_format, "json");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = Paths::at(dir.path().join("nested")).settings_file();

        let settings = AppSettings {
            default_delay_ms: 25,
            ..AppSettings::default()
        };
        settings.save_to(&path).unwrap();

        assert_eq!(AppSettings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_rejects_bad_files() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            AppSettings::load_from(&missing),
            Err(ConfigError::ReadFailed { .. })
        ));

        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, "not json").unwrap();
        assert!(matches!(
            AppSettings::load_from(&garbage),
            Err(ConfigError::InvalidFormat(_))
        ));

        let zero = dir.path().join("zero.json");
        fs::write(&zero, r#"{ "default_concurrency": 0 }"#).unwrap();
        assert!(matches!(
            AppSettings::load_from(&zero),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_paths_layout() {
        let paths = Paths::at("/tmp/portsweep");
        assert_eq!(paths.settings_file(), Path::new("/tmp/portsweep/settings.json"));
        assert_eq!(paths.profiles_dir(), Path::new("/tmp/portsweep/profiles"));
    }
}
