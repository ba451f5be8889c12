//! # PMOSignage Configuration Module
//!
//! This module provides configuration management for the signage agent:
//! - Reading settings from environment variables
//! - Documented defaults for every setting
//! - A single explicit [`Config`] struct built once at startup
//!
//! No component reads the process environment directly: the struct is
//! constructed in `main` and handed to each component constructor.
//!
//! ## Usage
//!
//! ```no_run
//! use psgconfig::Config;
//!
//! let config = Config::from_env()?;
//! println!("Polling {} every {:?}", config.base_url, config.poll_interval);
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Context, Result};
use dirs::home_dir;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Environment variable names
const ENV_API_URL: &str = "SIGNAGE_API_URL";
const ENV_API_KEY: &str = "SIGNAGE_API_KEY";
const ENV_SCREEN_ID: &str = "SIGNAGE_SCREEN_ID";
const ENV_POLL_INTERVAL: &str = "SIGNAGE_POLL_INTERVAL";
const ENV_HEARTBEAT_INTERVAL: &str = "SIGNAGE_HEARTBEAT_INTERVAL";
const ENV_HTTP_PORT: &str = "SIGNAGE_HTTP_PORT";
const ENV_CACHE_DIR: &str = "SIGNAGE_CACHE_DIR";

// Default values for configuration
const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_API_KEY: &str = "signage-api-key-2025";
const DEFAULT_SCREEN_ID: &str = "tv-1";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 60;
const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_CACHE_DIR_NAME: &str = "signage_cache";

/// Agent configuration, resolved once at startup.
///
/// Every field is overridable through a `SIGNAGE_*` environment variable
/// and falls back to a documented default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote signage manager (`SIGNAGE_API_URL`)
    pub base_url: String,
    /// API key sent with every manager request (`SIGNAGE_API_KEY`)
    pub api_key: String,
    /// Identifier of the screen this agent drives (`SIGNAGE_SCREEN_ID`)
    pub screen_id: String,
    /// Outer playlist poll cadence (`SIGNAGE_POLL_INTERVAL`, seconds)
    pub poll_interval: Duration,
    /// Heartbeat cadence (`SIGNAGE_HEARTBEAT_INTERVAL`, seconds)
    pub heartbeat_interval: Duration,
    /// Port of the local announcement/display surface (`SIGNAGE_HTTP_PORT`)
    pub http_port: u16,
    /// Root directory of the on-disk asset cache (`SIGNAGE_CACHE_DIR`)
    pub cache_dir: PathBuf,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        info!(
            api = %config.base_url,
            screen = %config.screen_id,
            cache = %config.cache_dir.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests can pass a map instead of
    /// mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup(ENV_API_URL)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let cache_dir = match lookup(ENV_CACHE_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_cache_dir()?,
        };

        Ok(Self {
            base_url,
            api_key: lookup(ENV_API_KEY).unwrap_or_else(|| DEFAULT_API_KEY.to_string()),
            screen_id: lookup(ENV_SCREEN_ID).unwrap_or_else(|| DEFAULT_SCREEN_ID.to_string()),
            poll_interval: Duration::from_secs(parse_secs(
                lookup(ENV_POLL_INTERVAL),
                ENV_POLL_INTERVAL,
                DEFAULT_POLL_INTERVAL_SECS,
            )?),
            heartbeat_interval: Duration::from_secs(parse_secs(
                lookup(ENV_HEARTBEAT_INTERVAL),
                ENV_HEARTBEAT_INTERVAL,
                DEFAULT_HEARTBEAT_INTERVAL_SECS,
            )?),
            http_port: match lookup(ENV_HTTP_PORT) {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("{ENV_HTTP_PORT} must be a port number: {raw:?}"))?,
                None => DEFAULT_HTTP_PORT,
            },
            cache_dir,
        })
    }

    /// Build a configuration from an in-memory map (test helper).
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Stable local address the display surface is pointed at.
    pub fn display_url(&self) -> String {
        format!("http://127.0.0.1:{}/", self.http_port)
    }
}

/// Default cache root: `$HOME/signage_cache`.
fn default_cache_dir() -> Result<PathBuf> {
    let home = home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
    Ok(home.join(DEFAULT_CACHE_DIR_NAME))
}

fn parse_secs(raw: Option<String>, key: &str, default: u64) -> Result<u64> {
    match raw {
        Some(value) => {
            let secs: u64 = value
                .parse()
                .with_context(|| format!("{key} must be a number of seconds: {value:?}"))?;
            if secs == 0 {
                return Err(anyhow!("{key} must be greater than zero"));
            }
            Ok(secs)
        }
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_map(&HashMap::new()).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.api_key, DEFAULT_API_KEY);
        assert_eq!(config.screen_id, DEFAULT_SCREEN_ID);
        assert_eq!(
            config.poll_interval,
            Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS)
        );
        assert_eq!(
            config.heartbeat_interval,
            Duration::from_secs(DEFAULT_HEARTBEAT_INTERVAL_SECS)
        );
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert!(config.cache_dir.ends_with(DEFAULT_CACHE_DIR_NAME));
    }

    #[test]
    fn test_overrides() {
        let vars = map(&[
            (ENV_API_URL, "https://manager.example.com/"),
            (ENV_API_KEY, "secret"),
            (ENV_SCREEN_ID, "lobby-7"),
            (ENV_POLL_INTERVAL, "10"),
            (ENV_HEARTBEAT_INTERVAL, "120"),
            (ENV_HTTP_PORT, "9090"),
            (ENV_CACHE_DIR, "/var/cache/signage"),
        ]);
        let config = Config::from_map(&vars).unwrap();

        // Trailing slash is stripped so endpoint joining stays predictable.
        assert_eq!(config.base_url, "https://manager.example.com");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.screen_id, "lobby-7");
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.heartbeat_interval, Duration::from_secs(120));
        assert_eq!(config.http_port, 9090);
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/signage"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_map(&map(&[(ENV_POLL_INTERVAL, "soon")])).is_err());
        assert!(Config::from_map(&map(&[(ENV_POLL_INTERVAL, "0")])).is_err());
        assert!(Config::from_map(&map(&[(ENV_HTTP_PORT, "99999")])).is_err());
    }

    #[test]
    fn test_display_url() {
        let vars = map(&[(ENV_HTTP_PORT, "8123")]);
        let config = Config::from_map(&vars).unwrap();
        assert_eq!(config.display_url(), "http://127.0.0.1:8123/");
    }
}
