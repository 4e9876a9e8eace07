//! `config.toml` in the platform config directory, overridden by environment.
//!
//! ```toml
//! api_url = "http://localhost:5000"
//! timeout_secs = 10
//! ```
//!
//! A missing file is the default configuration. `EXPENSETUI_API_URL` and
//! `EXPENSETUI_TIMEOUT_SECS` win over the file.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const ENV_API_URL: &str = "EXPENSETUI_API_URL";
pub const ENV_TIMEOUT: &str = "EXPENSETUI_TIMEOUT_SECS";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://localhost:5000".into()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    pub fn filename() -> &'static str {
        "config.toml"
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Read `config.toml` from `dir` and apply process environment overrides.
    pub fn load(dir: &Path) -> Result<Self> {
        Self::load_with(dir, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`] with an injectable variable lookup.
    pub fn load_with(dir: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = dir.join(Self::filename());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_toml(&text)
                .with_context(|| format!("Invalid config file: {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };
        if config.timeout_secs == 0 {
            warn!("Ignoring timeout_secs = 0 in {}", path.display());
            config.timeout_secs = default_timeout_secs();
        }

        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(0) => warn!("Ignoring {ENV_TIMEOUT}=0, requests need a timeout"),
                Ok(secs) => config.timeout_secs = secs,
                Err(e) => warn!("Ignoring invalid {ENV_TIMEOUT} value '{raw}': {e}"),
            }
        }

        config.api_url = config.api_url.trim_end_matches('/').to_string();
        info!(api_url = %config.api_url, timeout_secs = config.timeout_secs, "Loaded config");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;

    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_with(dir.path(), no_env).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("timeout_secs = 3\n").unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.api_url, "http://localhost:5000");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "api_url = \"https://api.example.com/\"\ntimeout_secs = 30\n",
        )
        .unwrap();
        let config = Config::load_with(dir.path(), no_env).unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "api_url = \"http://file\"\n").unwrap();
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_API_URL, "http://env:8080"), (ENV_TIMEOUT, "2")]);

        let config =
            Config::load_with(dir.path(), |k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_url, "http://env:8080");
        assert_eq!(config.timeout_secs, 2);
    }

    #[test]
    fn test_bad_env_timeout_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_with(dir.path(), |k| {
            (k == ENV_TIMEOUT).then(|| "soon".to_string())
        })
        .unwrap();
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_zero_timeout_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "timeout_secs = 0\n").unwrap();
        let config = Config::load_with(dir.path(), no_env).unwrap();
        assert_eq!(config.timeout_secs, 10);

        std::fs::write(dir.path().join("config.toml"), "timeout_secs = 4\n").unwrap();
        let config = Config::load_with(dir.path(), |k| {
            (k == ENV_TIMEOUT).then(|| "0".to_string())
        })
        .unwrap();
        assert_eq!(config.timeout_secs, 4);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "timeout_secs = \"ten\"").unwrap();
        let err = Config::load_with(dir.path(), no_env).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid config file"));
    }
}
