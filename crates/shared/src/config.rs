//! Configuration management for malscraper.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Scraper settings
    pub scraper: ScraperConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Scraper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Site base URL
    pub base_url: String,

    /// User agent sent with every request
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Maximum number of requests per URL while the site answers 429
    pub max_attempts: u32,

    /// Backoff step in milliseconds; the n-th retry waits n steps
    pub retry_delay_ms: u64,

    /// Cache settings
    pub cache: CacheConfig,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache directory (relative to data directory or absolute)
    pub cache_dir: String,

    /// Age in seconds after which a cached page is fetched again
    pub flush_time_seconds: u64,

    /// Load every cached page into memory on startup
    #[serde(default)]
    pub preload: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: ".malscraper".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: false,
                json_format: false,
            },
            scraper: ScraperConfig {
                base_url: "https://myanimelist.net".to_string(),
                user_agent: "malscraper/0.1.0".to_string(),
                timeout_seconds: 30,
                max_attempts: 30,
                retry_delay_ms: 1000,
                cache: CacheConfig {
                    cache_dir: "cache".to_string(),
                    flush_time_seconds: 86400, // One day
                    preload: false,
                },
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    /// Get the absolute path for the cache directory
    pub fn cache_dir(&self) -> PathBuf {
        self.resolve(&self.scraper.cache.cache_dir)
    }

    /// Cache freshness window
    pub fn flush_time(&self) -> Duration {
        Duration::from_secs(self.scraper.cache.flush_time_seconds)
    }

    /// Backoff step between rate-limited attempts
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.scraper.retry_delay_ms)
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.scraper.timeout_seconds)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.root_dir, ".malscraper");
        assert_eq!(config.scraper.max_attempts, 30);
        assert_eq!(config.flush_time(), Duration::from_secs(86400));
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert!(!config.scraper.cache.preload);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut original_config = Config::default();
        original_config.scraper.max_attempts = 5;
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.data.root_dir, original_config.data.root_dir);
        assert_eq!(loaded_config.scraper.base_url, original_config.scraper.base_url);
        assert_eq!(loaded_config.scraper.max_attempts, 5);

        Ok(())
    }

    #[test]
    fn test_preload_defaults_to_false() -> Result<()> {
        let toml = r#"
            [data]
            root_dir = "data"

            [logging]
            log_dir = "logs"
            default_level = "debug"
            console = true
            file = false
            json_format = false

            [scraper]
            base_url = "https://myanimelist.net"
            user_agent = "test"
            timeout_seconds = 10
            max_attempts = 3
            retry_delay_ms = 10

            [scraper.cache]
            cache_dir = "/tmp/malcache"
            flush_time_seconds = 60
        "#;

        let config: Config = toml::from_str(toml)?;
        assert!(!config.scraper.cache.preload);
        assert_eq!(config.cache_dir(), PathBuf::from("/tmp/malcache"));
        assert_eq!(config.flush_time(), Duration::from_secs(60));

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        // Should return default config without error
        assert_eq!(config.data.root_dir, ".malscraper");
    }

    #[test]
    fn test_path_resolution() {
        let config = Config::default();

        let log_dir = config.log_dir();
        assert!(log_dir.ends_with(".malscraper/logs"));

        let cache_dir = config.cache_dir();
        assert!(cache_dir.ends_with(".malscraper/cache"));
    }
}
