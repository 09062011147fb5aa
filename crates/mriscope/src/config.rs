use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::auth::WELCOME_DURATION;
use crate::parallax::ParallaxMode;
use crate::slider::DEFAULT_INTERVAL;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "mriscope";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const VALID_KEYS: &str = "server.base_url, server.timeout_secs, ui.slide_interval_secs, \
     ui.welcome_secs, ui.parallax, ui.assume_registered, ui.theme";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide_interval_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallax: Option<ParallaxMode>,

    /// Open the auth overlay on the login form instead of signup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_registered: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Fully resolved settings the page and commands run with.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub timeout: Duration,
    pub slide_interval: Duration,
    pub welcome_duration: Duration,
    pub parallax: ParallaxMode,
    pub assume_registered: bool,
    pub theme: String,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `mriscope config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# MRIScope configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn settings(&self) -> Settings {
        let server = self.server.clone().unwrap_or_default();
        let ui = self.ui.clone().unwrap_or_default();
        Settings {
            base_url: server
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(server.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            slide_interval: ui
                .slide_interval_secs
                .map_or(DEFAULT_INTERVAL, Duration::from_secs),
            welcome_duration: ui
                .welcome_secs
                .map_or(WELCOME_DURATION, Duration::from_secs),
            parallax: ui.parallax.unwrap_or_default(),
            assume_registered: ui.assume_registered.unwrap_or(false),
            theme: ui.theme.unwrap_or_else(|| "light".to_string()),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server.base_url" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    anyhow::bail!("Invalid base_url: {value}. Must start with http:// or https://.");
                }
                self.server
                    .get_or_insert_with(ServerConfig::default)
                    .base_url = Some(value.trim_end_matches('/').to_string());
            }
            "server.timeout_secs" => {
                let secs = parse_positive(key, value)?;
                self.server
                    .get_or_insert_with(ServerConfig::default)
                    .timeout_secs = Some(secs);
            }
            "ui.slide_interval_secs" => {
                let secs = parse_positive(key, value)?;
                self.ui
                    .get_or_insert_with(UiConfig::default)
                    .slide_interval_secs = Some(secs);
            }
            "ui.welcome_secs" => {
                let secs = parse_positive(key, value)?;
                self.ui.get_or_insert_with(UiConfig::default).welcome_secs = Some(secs);
            }
            "ui.parallax" => {
                let mode = match value {
                    "independent" => ParallaxMode::Independent,
                    "compounding" => ParallaxMode::Compounding,
                    _ => anyhow::bail!(
                        "Invalid parallax: {value}. Must be 'independent' or 'compounding'."
                    ),
                };
                self.ui.get_or_insert_with(UiConfig::default).parallax = Some(mode);
            }
            "ui.assume_registered" => {
                let flag = match value {
                    "true" => true,
                    "false" => false,
                    _ => anyhow::bail!(
                        "Invalid assume_registered: {value}. Must be 'true' or 'false'."
                    ),
                };
                self.ui
                    .get_or_insert_with(UiConfig::default)
                    .assume_registered = Some(flag);
            }
            "ui.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.ui.get_or_insert_with(UiConfig::default).theme = Some(value.to_string());
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => anyhow::bail!("Invalid {key}: {value}. Must be a positive whole number of seconds."),
    }
}
