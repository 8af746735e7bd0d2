use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use super::upstream::{UpstreamBackend, UpstreamConfig};

/// Main configuration structure for sipdns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Locally supported transports and resolution limits
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Query backend and nameservers
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Record cache in front of the query backend
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. sipdns.toml in current directory
    /// 3. /etc/sipdns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("sipdns.toml").exists() {
            Self::from_file("sipdns.toml")?
        } else if std::path::Path::new("/etc/sipdns/config.toml").exists() {
            Self::from_file("/etc/sipdns/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if !overrides.servers.is_empty() {
            self.upstream.servers = overrides.servers;
        }
        if overrides.system_resolver {
            self.upstream.backend = UpstreamBackend::System;
        }
        if overrides.disable_cache {
            self.cache.enabled = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.transports.is_empty() {
            return Err(ConfigError::Validation(
                "At least one transport must be configured".to_string(),
            ));
        }

        for entry in &self.resolver.transports {
            if !entry.ipv4 && !entry.ipv6 {
                return Err(ConfigError::Validation(format!(
                    "Transport {} enables neither IPv4 nor IPv6",
                    entry.transport
                )));
            }
        }

        if self.upstream.backend == UpstreamBackend::Upstream && self.upstream.servers.is_empty() {
            return Err(ConfigError::Validation(
                "No upstream servers configured".to_string(),
            ));
        }

        if self.upstream.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Upstream timeout cannot be 0".to_string(),
            ));
        }

        if self.cache.min_ttl > self.cache.max_ttl {
            return Err(ConfigError::Validation(format!(
                "cache.min_ttl ({}) exceeds cache.max_ttl ({})",
                self.cache.min_ttl, self.cache.max_ttl
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub servers: Vec<SocketAddr>,
    pub system_resolver: bool,
    pub disable_cache: bool,
}
