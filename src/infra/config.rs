//! Configuration loading from TOML files
//!
//! Config file is selected via the --config command line argument,
//! defaulting to config/dev.toml. A missing or invalid file falls back
//! to built-in defaults with a warning.

use crate::domain::types::ActivityThresholds;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Gates endpoint on the device
    #[serde(default = "default_source_url")]
    pub url: String,
    /// Per-request timeout; transport concern, not an engine timeout
    #[serde(default = "default_request_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_source_url() -> String {
    "http://192.168.4.1:3000/gates".to_string()
}

fn default_request_timeout_ms() -> u64 {
    2000
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { url: default_source_url(), timeout_ms: default_request_timeout_ms() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Observed values in this domain are 250-1000ms
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    250
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_ms: default_poll_interval_ms() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_interval_secs")]
    pub interval_secs: u64,
}

fn default_metrics_interval_secs() -> u64 {
    10
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { interval_secs: default_metrics_interval_secs() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub activity: Option<ActivityThresholds>,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    source_url: String,
    request_timeout_ms: u64,
    poll_interval_ms: u64,
    activity_thresholds: ActivityThresholds,
    metrics_interval_secs: u64,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            request_timeout_ms: default_request_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            activity_thresholds: ActivityThresholds::default(),
            metrics_interval_secs: default_metrics_interval_secs(),
            config_file: "default".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self {
            source_url: toml_config.source.url,
            request_timeout_ms: toml_config.source.timeout_ms,
            poll_interval_ms: toml_config.poll.interval_ms,
            activity_thresholds: toml_config.activity.unwrap_or_default(),
            metrics_interval_secs: toml_config.metrics.interval_secs,
            config_file: path.display().to_string(),
        })
    }

    /// Load configuration - tries the TOML file first, falls back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn request_timeout_ms(&self) -> u64 {
        self.request_timeout_ms
    }

    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    pub fn activity_thresholds(&self) -> ActivityThresholds {
        self.activity_thresholds
    }

    pub fn metrics_interval_secs(&self) -> u64 {
        self.metrics_interval_secs
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source_url(), "http://192.168.4.1:3000/gates");
        assert_eq!(config.poll_interval_ms(), 250);
        assert_eq!(config.request_timeout_ms(), 2000);
        assert_eq!(config.metrics_interval_secs(), 10);
        assert_eq!(config.activity_thresholds().fresh_max_secs, 1.0);
        assert_eq!(config.activity_thresholds().recent_max_secs, 10.0);
        assert_eq!(config.activity_thresholds().moderate_max_secs, 60.0);
    }

    #[test]
    fn test_partial_toml_uses_section_defaults() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
            [poll]
            interval_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(toml_config.poll.interval_ms, 500);
        assert_eq!(toml_config.source.url, default_source_url());
        assert!(toml_config.activity.is_none());
    }
}
