use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::acquire::Timing;
use crate::api::join_endpoint;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
}

impl Config {
    /// Proxy endpoint for downloads: the explicit setting, else
    /// `<base>/download_video` when a base URL is known, else none
    pub fn proxy_endpoint(&self, base_url: Option<&Url>) -> Option<Url> {
        if let Some(endpoint) = &self.acquisition.proxy_endpoint {
            return Some(endpoint.clone());
        }
        let base = base_url?;
        match join_endpoint(base, "download_video") {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                log::warn!("Cannot derive proxy endpoint from {}: {}", base, e);
                None
            }
        }
    }
}

/// General configuration settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Backend base URL for short links, share parsing, crypto and the proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<Url>,

    /// Where downloaded videos are saved (default: data dir /downloads)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// Enable debug logging
    #[serde(default)]
    pub debug_logging: bool,
}

/// Download chain settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// Explicit proxy endpoint, overriding `<api_base_url>/download_video`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_endpoint: Option<Url>,

    /// Referer sent on direct downloads
    #[serde(default = "default_referer")]
    pub referer: String,

    /// User-Agent sent on direct downloads
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Connect and idle-read limit for downloads; total limit for backend API calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Pause between a failure notice and the next strategy
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// How long the final status stays visible
    #[serde(default = "default_status_linger_ms")]
    pub status_linger_ms: u64,
}

impl AcquisitionConfig {
    /// Engine delays derived from this config
    pub fn timing(&self) -> Timing {
        Timing {
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            status_linger: Duration::from_millis(self.status_linger_ms),
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        AcquisitionConfig {
            proxy_endpoint: None,
            referer: default_referer(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            retry_delay_ms: default_retry_delay_ms(),
            status_linger_ms: default_status_linger_ms(),
        }
    }
}

// Default value functions for serde
fn default_referer() -> String {
    "https://www.douyin.com/".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_status_linger_ms() -> u64 {
    3000
}

/// Trait for configuration storage
pub trait ConfigStorage: Send + Sync {
    /// Load configuration from file
    fn load(&self) -> Result<Config>;

    /// Save configuration to file
    fn save(&self, config: &Config) -> Result<()>;

    /// Get the config file path
    fn path(&self) -> &PathBuf;

    /// Create default configuration file if it doesn't exist
    fn create_default(&self) -> Result<()>;
}

/// TOML-based implementation of ConfigStorage
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    /// Create a new TomlConfigStorage with the given path
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        use anyhow::Context;
        use std::fs;

        // If file doesn't exist, create default and return it
        if !self.path.exists() {
            log::info!(
                "Config file not found at {:?}, creating default configuration",
                self.path
            );
            self.create_default()?;
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))?;

        log::info!("Loaded configuration from {:?}", self.path);
        log::debug!(
            "Config: api_base_url={:?}, proxy_endpoint={:?}",
            config.general.api_base_url.as_ref().map(Url::as_str),
            config.acquisition.proxy_endpoint.as_ref().map(Url::as_str)
        );

        Ok(config)
    }

    fn save(&self, config: &Config) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        let toml_str = toml::to_string_pretty(config)
            .with_context(|| "Failed to serialize configuration")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(&self.path, toml_str)
            .with_context(|| format!("Failed to write config to {:?}", self.path))?;

        log::debug!("Saved configuration to {:?}", self.path);

        Ok(())
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn create_default(&self) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        // Use the example config compiled into the binary
        let example_config = include_str!("../../dylink.toml.example");

        fs::write(&self.path, example_config)
            .with_context(|| format!("Failed to create default config at {:?}", self.path))?;

        log::info!("Created default configuration at {:?}", self.path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AcquisitionConfig::default();
        assert_eq!(config.referer, "https://www.douyin.com/");
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(
            config.timing(),
            Timing {
                retry_delay: Duration::from_millis(1000),
                status_linger: Duration::from_millis(3000),
            }
        );
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let config: Config = toml::from_str(include_str!("../../dylink.toml.example")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
        [general]
        api_base_url = "https://api.example.com/s"

        [acquisition]
        retry_delay_ms = 10
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.general.api_base_url.as_ref().map(Url::as_str),
            Some("https://api.example.com/s")
        );
        assert_eq!(config.acquisition.retry_delay_ms, 10);
        assert_eq!(config.acquisition.status_linger_ms, 3000);
    }

    #[test]
    fn test_proxy_endpoint_resolution() {
        let base = Url::parse("https://api.example.com/s").unwrap();
        let mut config = Config::default();

        assert_eq!(config.proxy_endpoint(None), None);
        assert_eq!(
            config.proxy_endpoint(Some(&base)).unwrap().as_str(),
            "https://api.example.com/s/download_video"
        );

        let explicit = Url::parse("https://proxy.example.com/fetch").unwrap();
        config.acquisition.proxy_endpoint = Some(explicit.clone());
        assert_eq!(config.proxy_endpoint(Some(&base)), Some(explicit));
    }

    #[test]
    fn test_load_creates_default_file() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = TomlConfigStorage::new(tmp.path().join("nested/dylink.toml"));

        let config = storage.load().unwrap();

        assert_eq!(config, Config::default());
        assert!(storage.path().exists());
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = TomlConfigStorage::new(tmp.path().join("dylink.toml"));
        let mut config = Config::default();
        config.general.api_base_url = Some(Url::parse("https://api.example.com/").unwrap());
        config.general.debug_logging = true;

        storage.save(&config).unwrap();

        assert_eq!(storage.load().unwrap(), config);
    }
}
