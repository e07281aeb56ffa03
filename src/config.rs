use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::store::{ResourceLocation, StoreOptions};

pub const DEFAULT_SNAPSHOT: &str = "public/nestris-db.sqlite3";
pub const DEFAULT_AVATAR_MANIFEST: &str = "public/img/avatar/manifest.json";
pub const DEFAULT_AVATAR_BASE_URL: &str = "/img/avatar";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Runtime settings, read from `NESTRIS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub snapshot: ResourceLocation,
    /// `None` when avatars are disabled.
    pub avatar_manifest: Option<ResourceLocation>,
    pub avatar_base_url: String,
    pub bind_addr: SocketAddr,
    pub cache_dir: PathBuf,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snapshot = lookup("NESTRIS_SNAPSHOT")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SNAPSHOT.to_string());

        // An explicitly empty manifest location turns avatars off
        let avatar_manifest = match lookup("NESTRIS_AVATAR_MANIFEST") {
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(ResourceLocation::parse(&value)),
            None => Some(ResourceLocation::parse(DEFAULT_AVATAR_MANIFEST)),
        };

        let bind_value =
            lookup("NESTRIS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: "NESTRIS_BIND_ADDR",
                value: bind_value.clone(),
            })?;

        let max_connections = match lookup("NESTRIS_MAX_CONNECTIONS") {
            Some(value) => match value.trim().parse::<u32>() {
                Ok(count) if count > 0 => count,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "NESTRIS_MAX_CONNECTIONS",
                        value,
                    })
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let cache_dir = lookup("NESTRIS_CACHE_DIR")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        Ok(Self {
            snapshot: ResourceLocation::parse(&snapshot),
            avatar_manifest,
            avatar_base_url: lookup("NESTRIS_AVATAR_BASE_URL")
                .unwrap_or_else(|| DEFAULT_AVATAR_BASE_URL.to_string()),
            bind_addr,
            cache_dir,
            max_connections,
        })
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            max_connections: self.max_connections,
            cache_dir: self.cache_dir.clone(),
        }
    }
}
