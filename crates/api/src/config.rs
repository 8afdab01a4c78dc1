//! Server configuration from the environment.

use std::net::SocketAddr;

use pirs_core::{DomainError, EngineConfig};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PIRS_BIND_ADDR is not a socket address: {0}")]
    BindAddr(String),

    #[error("PIRS_SEED_DEMO must be a boolean: {0}")]
    SeedDemo(String),

    #[error(transparent)]
    Engine(#[from] DomainError),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Load the demo catalog at startup.
    pub seed_demo: bool,
    pub engine: EngineConfig,
}

impl ApiConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:8080";

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_addr = lookup("PIRS_BIND_ADDR").unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::BindAddr(raw_addr.clone()))?;

        let seed_demo = match lookup("PIRS_SEED_DEMO") {
            None => false,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => return Err(ConfigError::SeedDemo(v)),
            },
        };

        Ok(Self {
            bind_addr,
            seed_demo,
            engine: EngineConfig::from_lookup(&lookup)?,
        })
    }
}
