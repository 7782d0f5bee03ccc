use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::TemperatureUnit;

/// Environment variable that overrides the configured API base URL.
pub const BASE_URL_ENV: &str = "FORECAST_API_URL";

/// Base URL used when neither the environment nor the config file sets one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_base_url = "https://weather.example.com"
/// default_unit = "fahrenheit"
/// request_timeout_secs = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_base_url: Option<String>,

    pub default_unit: Option<TemperatureUnit>,

    /// No timeout is applied when unset.
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-forecast", "forecast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Effective base URL: `FORECAST_API_URL`, then the config file, then the default.
    pub fn base_url(&self) -> Result<String> {
        self.resolve_base_url(std::env::var(BASE_URL_ENV).ok())
    }

    /// Same as [`Config::base_url`] with the environment value passed in explicitly.
    pub fn resolve_base_url(&self, env_value: Option<String>) -> Result<String> {
        let raw = env_value
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let trimmed = raw.trim().trim_end_matches('/').to_string();

        let url = Url::parse(&trimmed)
            .with_context(|| format!("Invalid API base URL '{trimmed}'"))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Invalid API base URL '{trimmed}': scheme must be http or https"
            ));
        }

        Ok(trimmed)
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.default_unit.unwrap_or_default()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
