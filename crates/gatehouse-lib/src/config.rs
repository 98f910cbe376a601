// ============================
// crates/gatehouse-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::auth::{PasswordRequirements, ProviderConfig};

/// Application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log level
    pub log_level: String,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// Password requirements for registration
    pub password_requirements: PasswordRequirements,
    /// Federated identity provider
    pub provider: ProviderConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:4000".parse().unwrap(),
            log_level: "info".to_string(),
            session_ttl_secs: 60 * 60 * 24 * 7, // 7 days
            password_requirements: PasswordRequirements::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from `config.toml` and `GATEHOUSE_`-prefixed
    /// environment variables (nested keys split on `__`, e.g.
    /// `GATEHOUSE_PROVIDER__CLIENT_ID`).
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Load settings with an explicit config file path
    pub fn load_from(path: &str) -> Result<Self> {
        let settings = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("GATEHOUSE_").split("__"))
            .extract()?;
        Ok(settings)
    }
}
