use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.waqi.info/";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// token = "..."
/// base_url = "https://api.waqi.info/"
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// API token for the World Air Quality Index feed.
    pub token: Option<String>,

    /// Override for the feed endpoint; mostly useful for testing against a local server.
    pub base_url: Option<String>,

    /// Where the search history is kept. Defaults to the platform data directory.
    pub history_file: Option<PathBuf>,
}

impl Config {
    /// Return the configured API token.
    pub fn api_token(&self) -> Result<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No API token configured.\n\
                 Hint: run `aqi configure` and enter your token first."
            )
        })
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Feed endpoint, always ending in a slash.
    pub fn endpoint(&self) -> String {
        let base = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);

        if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the search history file, honouring `history_file` when set.
    pub fn history_file_path(&self) -> Result<PathBuf> {
        match &self.history_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("history.json")),
        }
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "aircheck", "aqi-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_token_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_token().unwrap_err();

        assert!(err.to_string().contains("No API token configured"));
        assert!(err.to_string().contains("aqi configure"));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_token("   ".into());

        assert!(cfg.api_token().is_err());
    }

    #[test]
    fn set_token_is_returned() {
        let mut cfg = Config::default();
        cfg.set_token("TOKEN".into());

        assert_eq!(cfg.api_token().expect("token must exist"), "TOKEN");
    }

    #[test]
    fn endpoint_defaults_and_normalises_trailing_slash() {
        let mut cfg = Config::default();
        assert_eq!(cfg.endpoint(), DEFAULT_BASE_URL);

        cfg.base_url = Some("http://localhost:8080".into());
        assert_eq!(cfg.endpoint(), "http://localhost:8080/");

        cfg.base_url = Some("http://localhost:8080/".into());
        assert_eq!(cfg.endpoint(), "http://localhost:8080/");

        cfg.base_url = Some("  ".into());
        assert_eq!(cfg.endpoint(), DEFAULT_BASE_URL);
    }

    #[test]
    fn explicit_history_file_wins() {
        let cfg = Config {
            history_file: Some(PathBuf::from("/tmp/aqi-history.json")),
            ..Default::default()
        };

        let path = cfg.history_file_path().expect("explicit path is always available");
        assert_eq!(path, PathBuf::from("/tmp/aqi-history.json"));
    }

    #[test]
    fn toml_roundtrip_keeps_fields() {
        let cfg = Config {
            token: Some("abc".into()),
            base_url: Some("http://localhost/".into()),
            history_file: None,
        };

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: Config = toml::from_str(&text).expect("parse");
        assert_eq!(back, cfg);
    }
}
