//! Plugin configuration
//! Process-wide request timeout and environment overrides

use crate::providers::{resolve_endpoint_url, DEFAULT_ENDPOINT_URL};
use std::path::PathBuf;
use std::time::Duration;

/// Timeout applied to every outbound call the plugin makes itself
pub const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub const ENDPOINT_URL_VAR: &str = "AIPING_ENDPOINT_URL";
pub const PLUGIN_ROOT_VAR: &str = "AIPING_PLUGIN_ROOT";
pub const REQUEST_TIMEOUT_VAR: &str = "MAX_REQUEST_TIMEOUT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {name} value '{value}': expected a positive number of seconds")]
    InvalidTimeout { name: &'static str, value: String },
    #[error("Failed to resolve current directory: {0}")]
    CurrentDir(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginConfig {
    /// Endpoint used for the startup catalog sync
    pub endpoint_url: String,
    /// Directory holding `models/` and `tools/`
    pub plugin_root: PathBuf,
    pub request_timeout: Duration,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            plugin_root: PathBuf::from("."),
            request_timeout: MAX_REQUEST_TIMEOUT,
        }
    }
}

impl PluginConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint_url = resolve_endpoint_url(lookup(ENDPOINT_URL_VAR).as_deref());

        let plugin_root = match lookup(PLUGIN_ROOT_VAR) {
            Some(root) if !root.trim().is_empty() => PathBuf::from(root),
            _ => std::env::current_dir()?,
        };

        let request_timeout = match lookup(REQUEST_TIMEOUT_VAR) {
            Some(value) => parse_timeout(&value)?,
            None => MAX_REQUEST_TIMEOUT,
        };

        Ok(Self {
            endpoint_url,
            plugin_root,
            request_timeout,
        })
    }
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            name: REQUEST_TIMEOUT_VAR,
            value: value.to_string(),
        }),
    }
}
