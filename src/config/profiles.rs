//! Scan profile management.
//!
//! Profiles bundle a scan policy under a name. Four presets ship built in;
//! user profiles are stored one JSON file per profile and take precedence
//! over a built-in of the same name.

use crate::error::{ConfigError, ProfileError, ProfileResult};
use crate::scanner::ScanPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use super::settings::Paths;

const MAX_CONCURRENCY: usize = 10_000;

/// A saved scan profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name (used as identifier).
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub randomize: bool,
    /// Per-worker sleep before each probe, in milliseconds.
    #[serde(default)]
    pub delay_ms: u64,
}

fn default_timeout() -> u64 {
    ScanPolicy::DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_concurrency() -> usize {
    ScanPolicy::DEFAULT_CONCURRENCY
}

impl Profile {
    /// Create a new profile with default policy values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            timeout_ms: default_timeout(),
            concurrency: default_concurrency(),
            randomize: false,
            delay_ms: 0,
        }
    }

    pub fn is_builtin(name: &str) -> bool {
        Self::builtins().iter().any(|p| p.name == name)
    }

    /// Validate the profile configuration.
    pub fn validate(&self) -> ProfileResult<()> {
        if self.name.is_empty() {
            return Err(ProfileError::Invalid("name cannot be empty".to_string()));
        }

        if !self.name.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
            return Err(ProfileError::Invalid(
                "name can only contain alphanumeric characters, hyphens, and underscores".to_string(),
            ));
        }

        if self.timeout_ms == 0 {
            return Err(ProfileError::Invalid("timeout must be greater than 0".to_string()));
        }

        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(ProfileError::Invalid(format!(
                "concurrency must be between 1 and {}",
                MAX_CONCURRENCY
            )));
        }

        Ok(())
    }

    pub fn policy(&self) -> ScanPolicy {
        ScanPolicy::new()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_concurrency(self.concurrency)
            .with_randomize(self.randomize)
            .with_delay(Duration::from_millis(self.delay_ms))
    }
}

/// Built-in profile presets.
impl Profile {
    /// Same values as the built-in defaults.
    pub fn default_profile() -> Self {
        Self {
            description: "Sequential connect scan with default timing".to_string(),
            ..Self::new("default")
        }
    }

    /// Short timeout, wide worker pool. Best on a LAN.
    pub fn fast() -> Self {
        Self {
            name: "fast".to_string(),
            description: "Short timeout and high concurrency for local networks".to_string(),
            timeout_ms: 150,
            concurrency: 500,
            randomize: false,
            delay_ms: 0,
        }
    }

    /// Shuffled order with a small per-probe delay.
    pub fn stealth() -> Self {
        Self {
            name: "stealth".to_string(),
            description: "Randomized order with a 50ms delay between probes".to_string(),
            timeout_ms: 500,
            concurrency: 20,
            randomize: true,
            delay_ms: 50,
        }
    }

    /// One probe at a time, shuffled, half a second apart.
    pub fn paranoid() -> Self {
        Self {
            name: "paranoid".to_string(),
            description: "Single worker, randomized order, 500ms between probes".to_string(),
            timeout_ms: 1000,
            concurrency: 1,
            randomize: true,
            delay_ms: 500,
        }
    }

    /// Get all built-in profiles.
    pub fn builtins() -> Vec<Profile> {
        vec![
            Self::default_profile(),
            Self::fast(),
            Self::stealth(),
            Self::paranoid(),
        ]
    }
}

/// Manages profile storage and retrieval.
pub struct ProfileManager {
    profiles_dir: PathBuf,
    cache: HashMap<String, Profile>,
}

impl ProfileManager {
    /// Open the profile store under the platform configuration directory.
    pub fn new() -> ProfileResult<Self> {
        let paths = Paths::discover()?;
        Self::open(paths.profiles_dir())
    }

    /// Open a profile store rooted at `profiles_dir`, creating it if needed.
    pub fn open(profiles_dir: impl Into<PathBuf>) -> ProfileResult<Self> {
        let profiles_dir = profiles_dir.into();

        fs::create_dir_all(&profiles_dir).map_err(|e| {
            ProfileError::Config(ConfigError::WriteFailed {
                path: profiles_dir.clone(),
                reason: e.to_string(),
            })
        })?;

        let mut manager = Self {
            profiles_dir,
            cache: HashMap::new(),
        };
        manager.load_all()?;

        Ok(manager)
    }

    pub fn profiles_dir(&self) -> &Path {
        &self.profiles_dir
    }

    /// Get a profile by name.
    pub fn get(&self, name: &str) -> ProfileResult<&Profile> {
        self.cache
            .get(name)
            .ok_or_else(|| ProfileError::NotFound(name.to_string()))
    }

    /// All profiles, sorted by name.
    pub fn list(&self) -> Vec<&Profile> {
        let mut profiles: Vec<&Profile> = self.cache.values().collect();
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        profiles
    }

    /// Validate and persist a new profile.
    pub fn create(&mut self, profile: Profile) -> ProfileResult<()> {
        profile.validate()?;

        if self.cache.contains_key(&profile.name) {
            return Err(ProfileError::AlreadyExists(profile.name.clone()));
        }

        self.save_profile(&profile)?;
        self.cache.insert(profile.name.clone(), profile);

        Ok(())
    }

    /// Delete a user profile. Built-ins cannot be deleted.
    pub fn delete(&mut self, name: &str) -> ProfileResult<()> {
        if Profile::is_builtin(name) {
            return Err(ProfileError::Invalid(format!(
                "cannot delete built-in profile '{}'",
                name
            )));
        }

        if !self.cache.contains_key(name) {
            return Err(ProfileError::NotFound(name.to_string()));
        }

        let file = self.profile_file(name);
        if file.exists() {
            fs::remove_file(&file).map_err(|e| ProfileError::SaveFailed(e.to_string()))?;
        }

        self.cache.remove(name);

        Ok(())
    }

    fn load_all(&mut self) -> ProfileResult<()> {
        for profile in Profile::builtins() {
            self.cache.insert(profile.name.clone(), profile);
        }

        // User profiles override built-ins with the same name.
        let entries = fs::read_dir(&self.profiles_dir).map_err(|e| {
            ProfileError::Config(ConfigError::ReadFailed {
                path: self.profiles_dir.clone(),
                reason: e.to_string(),
            })
        })?;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match Self::read_profile(&path) {
                Ok(profile) => {
                    self.cache.insert(profile.name.clone(), profile);
                }
                Err(reason) => warn!(path = %path.display(), %reason, "skipping unreadable profile"),
            }
        }

        Ok(())
    }

    fn read_profile(path: &Path) -> Result<Profile, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        let profile: Profile = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        profile.validate().map_err(|e| e.to_string())?;
        Ok(profile)
    }

    fn save_profile(&self, profile: &Profile) -> ProfileResult<()> {
        let file = self.profile_file(&profile.name);
        let content = serde_json::to_string_pretty(profile)
            .map_err(|e| ProfileError::SaveFailed(e.to_string()))?;

        fs::write(&file, content).map_err(|e| ProfileError::SaveFailed(e.to_string()))
    }

    fn profile_file(&self, name: &str) -> PathBuf {
        self.profiles_dir.join(format!("{}.json", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (tempfile::TempDir, ProfileManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = ProfileManager::open(dir.path().join("profiles")).unwrap();
        (dir, manager)
    }

    #[test]
    fn test_profile_validation() {
        let mut profile = Profile::new("test");
        assert!(profile.validate().is_ok());

        profile.name = "".to_string();
        assert!(profile.validate().is_err());

        profile.name = "test!@#".to_string();
        assert!(profile.validate().is_err());

        let mut profile = Profile::new("zero");
        profile.concurrency = 0;
        assert!(matches!(profile.validate(), Err(ProfileError::Invalid(_))));

        let mut profile = Profile::new("instant");
        profile.timeout_ms = 0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_builtin_profiles() {
        let builtins = Profile::builtins();
        let names: Vec<&str> = builtins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["default", "fast", "stealth", "paranoid"]);

        for profile in &builtins {
            assert!(profile.validate().is_ok(), "{}", profile.name);
        }

        assert_eq!(Profile::default_profile().policy(), ScanPolicy::default());
        assert!(Profile::stealth().policy().is_stealthy());
        assert_eq!(Profile::paranoid().policy().concurrency, 1);
    }

    #[test]
    fn test_partial_profile_file() {
        let profile: Profile = serde_json::from_str(r#"{ "name": "slow", "delay_ms": 200 }"#).unwrap();
        assert_eq!(profile.timeout_ms, 300);
        assert_eq!(profile.concurrency, 200);
        assert_eq!(profile.policy().inter_probe_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_create_get_delete() {
        let (_dir, mut manager) = manager();

        let mut profile = Profile::new("office");
        profile.concurrency = 32;
        manager.create(profile.clone()).unwrap();

        assert_eq!(manager.get("office").unwrap(), &profile);
        assert!(manager.profiles_dir().join("office.json").exists());
        assert!(matches!(
            manager.create(profile),
            Err(ProfileError::AlreadyExists(_))
        ));

        manager.delete("office").unwrap();
        assert!(matches!(manager.get("office"), Err(ProfileError::NotFound(_))));
        assert!(!manager.profiles_dir().join("office.json").exists());
    }

    #[test]
    fn test_profiles_persist_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let profiles_dir = dir.path().join("profiles");

        let mut first = ProfileManager::open(&profiles_dir).unwrap();
        first.create(Profile::new("saved")).unwrap();

        let second = ProfileManager::open(&profiles_dir).unwrap();
        assert!(second.get("saved").is_ok());

        let names: Vec<&str> = second.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["default", "fast", "paranoid", "saved", "stealth"]);
    }

    #[test]
    fn test_user_file_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let profiles_dir = dir.path().join("profiles");
        fs::create_dir_all(&profiles_dir).unwrap();
        fs::write(
            profiles_dir.join("fast.json"),
            r#"{ "name": "fast", "timeout_ms": 80, "concurrency": 1000 }"#,
        )
        .unwrap();
        fs::write(profiles_dir.join("broken.json"), "{").unwrap();

        let manager = ProfileManager::open(&profiles_dir).unwrap();
        assert_eq!(manager.get("fast").unwrap().timeout_ms, 80);
        assert!(manager.get("broken").is_err());
    }

    #[test]
    fn test_builtins_cannot_be_deleted() {
        let (_dir, mut manager) = manager();
        assert!(matches!(manager.delete("stealth"), Err(ProfileError::Invalid(_))));
        assert!(matches!(manager.delete("nope"), Err(ProfileError::NotFound(_))));
    }
}
