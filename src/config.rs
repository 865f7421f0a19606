use serde::Deserialize;
use std::fmt::Display;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::common::constants::{GOOGLE_API_BASE, YELP_API_BASE};
use crate::common::error::{GatewayError, Result};

const DEFAULT_CONFIG_PATH: &str = "gateway.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub google: ProviderConfig,
    pub yelp: ProviderConfig,
    pub upstream_timeout_seconds: u64,
    pub metrics_addr: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub cors_max_age_seconds: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_base: String,
    pub api_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            google: ProviderConfig {
                api_base: GOOGLE_API_BASE.to_string(),
                api_key: String::new(),
            },
            yelp: ProviderConfig {
                api_base: YELP_API_BASE.to_string(),
                api_key: String::new(),
            },
            upstream_timeout_seconds: 10,
            metrics_addr: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            cors_max_age_seconds: 600,
        }
    }
}

impl Config {
    /// Defaults, then the TOML file (`GATEWAY_CONFIG` or `gateway.toml` when
    /// present), then environment variables.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var("GATEWAY_CONFIG").ok();
        let mut config = match explicit.as_deref() {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GatewayError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let mut config: Config = toml::from_str(&content)?;

        // A provider table that only sets its key keeps the stock base URL.
        if config.google.api_base.is_empty() {
            config.google.api_base = GOOGLE_API_BASE.to_string();
        }
        if config.yelp.api_base.is_empty() {
            config.yelp.api_base = YELP_API_BASE.to_string();
        }
        info!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Overlay values from `lookup`, normally the process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(key) = lookup("GOOGLE_API_KEY") {
            self.google.api_key = key;
        }
        if let Some(key) = lookup("YELP_API_KEY") {
            self.yelp.api_key = key;
        }
        if let Some(base) = lookup("GOOGLE_API_BASE") {
            self.google.api_base = base;
        }
        if let Some(base) = lookup("YELP_API_BASE") {
            self.yelp.api_base = base;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(addr) = lookup("METRICS_ADDR") {
            self.metrics_addr = Some(addr);
        }
        if let Some(value) = lookup("UPSTREAM_TIMEOUT_SECONDS") {
            self.upstream_timeout_seconds = parse_var("UPSTREAM_TIMEOUT_SECONDS", &value)?;
        }
        if let Some(value) = lookup("CORS_MAX_AGE_SECONDS") {
            self.server.cors_max_age_seconds = parse_var("CORS_MAX_AGE_SECONDS", &value)?;
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        parse_var("BIND_ADDR", &self.server.bind_addr)
    }

    pub fn metrics_addr(&self) -> Result<Option<SocketAddr>> {
        self.metrics_addr
            .as_deref()
            .map(|addr| parse_var("METRICS_ADDR", addr))
            .transpose()
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| GatewayError::Config(format!("Invalid {key} value '{value}': {e}")))
}
