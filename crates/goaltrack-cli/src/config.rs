//! Configuration management

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_DEMO_LATENCY_MS: u64 = 300;

/// Prefix of environment overrides, e.g. `GOALTRACK_DEMO_MODE=true`
const ENV_PREFIX: &str = "GOALTRACK";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_url: String,
    pub demo_mode: bool,
    pub demo_latency_ms: u64,
    /// Bearer token from the last login
    pub access_token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            demo_mode: false,
            demo_latency_ms: DEFAULT_DEMO_LATENCY_MS,
            access_token: None,
        }
    }
}

pub struct SettingsManager {
    home: PathBuf,
}

impl SettingsManager {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Manager rooted at `$GOALTRACK_HOME`, or `~/.goaltrack`
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Self::goaltrack_home()?))
    }

    pub fn goaltrack_home() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("GOALTRACK_HOME") {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".goaltrack"))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn settings_path(&self) -> PathBuf {
        self.home.join("settings.json")
    }

    /// Settings file overlaid with `GOALTRACK_*` environment variables
    pub fn load(&self) -> Result<Settings> {
        self.load_with(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    /// Settings file only; used when the result is going to be saved back
    pub fn load_file(&self) -> Result<Settings> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {:?}", path))
    }

    fn load_with(&self, env: Environment) -> Result<Settings> {
        let defaults = serde_json::to_string(&Settings::default())?;
        let path = self.settings_path();

        Config::builder()
            .add_source(File::from_str(&defaults, FileFormat::Json))
            .add_source(File::from(path.as_path()).format(FileFormat::Json).required(false))
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize::<Settings>())
            .with_context(|| format!("Failed to load settings from {:?}", path))
    }

    /// Load the file, apply `update`, and write it back
    pub fn update(&self, update: impl FnOnce(&mut Settings)) -> Result<Settings> {
        let mut settings = self.load_file()?;
        update(&mut settings);
        self.save(&settings)?;
        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        let path = self.settings_path();

        std::fs::create_dir_all(&self.home)
            .with_context(|| format!("Failed to create directory {:?}", self.home))?;

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;

        // The file holds the access token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SettingsManager::new(dir.path());

        let settings = manager.load_with(env(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!manager.settings_path().exists());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SettingsManager::new(dir.path().join("nested"));

        let saved = manager
            .update(|s| {
                s.api_url = "https://goals.example.com/api".to_string();
                s.access_token = Some("tok".to_string());
            })
            .unwrap();

        let loaded = manager.load_with(env(&[])).unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.demo_latency_ms, DEFAULT_DEMO_LATENCY_MS);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SettingsManager::new(dir.path());
        manager.update(|s| s.demo_mode = false).unwrap();

        let settings = manager
            .load_with(env(&[
                ("GOALTRACK_DEMO_MODE", "true"),
                ("GOALTRACK_DEMO_LATENCY_MS", "0"),
            ]))
            .unwrap();
        assert!(settings.demo_mode);
        assert_eq!(settings.demo_latency_ms, 0);
        assert_eq!(settings.api_url, DEFAULT_API_URL);

        // Overrides never leak into the file
        assert!(!manager.load_file().unwrap().demo_mode);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SettingsManager::new(dir.path());
        std::fs::write(manager.settings_path(), r#"{"demo_mode": true}"#).unwrap();

        let settings = manager.load_with(env(&[])).unwrap();
        assert!(settings.demo_mode);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.access_token, None);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SettingsManager::new(dir.path());
        std::fs::write(manager.settings_path(), "{not json").unwrap();

        assert!(manager.load_file().is_err());
        assert!(manager.load_with(env(&[])).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_settings_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let manager = SettingsManager::new(dir.path());
        manager.save(&Settings::default()).unwrap();

        let mode = std::fs::metadata(manager.settings_path())
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
