//! Application configuration management.
//!
//! Configuration is stored at `~/.config/finsite/config.json`. Every field has
//! a default, so a missing file is not an error. Environment variables
//! `FINSITE_BACKEND_URL` and `FINSITE_CACHE_DIR` override the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::offline::CacheNames;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "finsite";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Lead intake and market summary backend.
const DEFAULT_BACKEND_URL: &str = "https://aadhar-capital-backend.vercel.app";

/// Origin the offline controller is registered for.
const DEFAULT_SITE_ORIGIN: &str = "https://aadhaarcapital.com";

/// Prefix of the offline cache namespace names.
const DEFAULT_CACHE_APP_NAME: &str = "aadhaar-capital";

/// Version tag embedded in namespace names. Bumping it retires old caches.
const DEFAULT_CACHE_VERSION: u32 = 1;

/// HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const ENV_BACKEND_URL: &str = "FINSITE_BACKEND_URL";
const ENV_CACHE_DIR: &str = "FINSITE_CACHE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site_origin: String,
    pub backend_url: String,
    pub cache_app_name: String,
    pub cache_version: u32,
    pub request_timeout_secs: u64,
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            cache_app_name: DEFAULT_CACHE_APP_NAME.to_string(),
            cache_version: DEFAULT_CACHE_VERSION,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Load from the default location and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = Self::load_from(&path)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_BACKEND_URL) {
            if !url.trim().is_empty() {
                self.backend_url = url;
            }
        }
        if let Ok(dir) = std::env::var(ENV_CACHE_DIR) {
            if !dir.trim().is_empty() {
                self.cache_dir = Some(PathBuf::from(dir));
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the offline cache namespaces.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn site_origin(&self) -> Result<Url> {
        Url::parse(&self.site_origin)
            .with_context(|| format!("Invalid site origin: {}", self.site_origin))
    }

    /// Namespace names of the currently configured cache version.
    pub fn cache_names(&self) -> CacheNames {
        CacheNames::new(&self.cache_app_name, self.cache_version)
    }

    /// Backend base URL without a trailing slash.
    pub fn backend_base(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config.cache_version, DEFAULT_CACHE_VERSION);
        assert_eq!(config.backend_base(), DEFAULT_BACKEND_URL);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"cache_version": 3, "backend_url": "http://localhost:8000/"}"#)
            .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.cache_version, 3);
        assert_eq!(config.backend_base(), "http://localhost:8000");
        assert_eq!(config.cache_app_name, DEFAULT_CACHE_APP_NAME);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.cache_names().primary, "aadhaar-capital-v3");
    }

    #[test]
    fn test_invalid_origin_is_an_error() {
        let config = Config {
            site_origin: "not an origin".to_string(),
            ..Config::default()
        };
        assert!(config.site_origin().is_err());
        assert!(Config::default().site_origin().is_ok());
    }

    #[test]
    fn test_explicit_cache_dir_wins() {
        let config = Config {
            cache_dir: Some(PathBuf::from("/tmp/finsite-cache")),
            ..Config::default()
        };
        assert_eq!(config.cache_dir().unwrap(), PathBuf::from("/tmp/finsite-cache"));
    }
}
