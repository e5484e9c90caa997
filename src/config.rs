use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming a TOML file that replaces the embedded defaults.
pub const CONFIG_ENV: &str = "POKEDEX_CONFIG";

const DEFAULT_CONFIG: &str = include_str!("../config/config.toml");

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub pokemon: PokemonConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
    pub favorites: FavoritesConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PokemonConfig {
    pub api_url: String,
    /// Per-request timeout in seconds. Unset means requests never time out.
    pub timeout: Option<u64>,
    pub cache_enabled: bool,
    /// Freshness hint for cached GET responses, in seconds.
    pub revalidate: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CacheConfig {
    pub r#type: String,
    pub max_size: u32,
    pub expiration: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FavoritesConfig {
    pub path: PathBuf,
}

impl PokemonConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    pub fn revalidate(&self) -> Duration {
        Duration::from_secs(self.revalidate)
    }
}

impl Config {
    /// Loads the configuration file named by `POKEDEX_CONFIG`, falling back to
    /// the defaults compiled into the binary.
    pub fn load() -> Result<Config, AppError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                tracing::info!("Loading configuration from {}", path);
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    tracing::error!("Failed to read {}: {}", path, e);
                    AppError::ConfigError(format!("{}: {}", path, e))
                })?;
                Self::from_toml(&contents)
            }
            Err(_) => Self::from_toml(DEFAULT_CONFIG),
        }
    }

    pub fn from_toml(contents: &str) -> Result<Config, AppError> {
        toml::from_str(contents).map_err(|e| {
            tracing::error!("Failed to parse configuration: {}", e);
            AppError::from(e)
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            r#type: "memory".to_string(),
            max_size: 1000,
            expiration: 3600,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pokemon: PokemonConfig {
                api_url: "https://pokeapi.co/api/v2".to_string(),
                timeout: None,
                cache_enabled: true,
                revalidate: 60 * 30,
            },
            cache: CacheConfig::default(),
            server: ServerConfig {
                bind_addr: "0.0.0.0:3000".to_string(),
            },
            favorites: FavoritesConfig {
                path: PathBuf::from("favorites.json"),
            },
        }
    }
}
