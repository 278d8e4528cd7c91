use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

const DEFAULT_CONFIG: &str = include_str!("../config/config.toml");
const CONFIG_ENV: &str = "POKEDEX_CONFIG";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub pokeapi: PokeApiConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PokeApiConfig {
    pub api_url: String,
    /// Request timeout in seconds.
    pub timeout: u32,
    pub page_size: u32,
    /// Preferred language for flavor text, English is the fallback.
    pub language: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CacheConfig {
    pub enabled: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub address: String,
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let config: Config = toml::from_str(raw)?;
        if config.pokeapi.page_size == 0 {
            return Err(CatalogError::Config(
                "pokeapi.page_size must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }

    /// Loads the file named by `POKEDEX_CONFIG`, or the compiled-in defaults.
    pub fn load() -> Result<Self, CatalogError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) => {
                tracing::info!("Loading configuration from {}", path);
                let raw = std::fs::read_to_string(&path).map_err(|e| {
                    CatalogError::Config(format!("failed to read {}: {}", path, e))
                })?;
                Self::from_toml_str(&raw)
            }
            Err(_) => Self::from_toml_str(DEFAULT_CONFIG),
        }
    }
}

// Mirrors config/config.toml
impl Default for Config {
    fn default() -> Self {
        Self {
            pokeapi: PokeApiConfig {
                api_url: "https://pokeapi.co/api/v2".to_string(),
                timeout: 10,
                page_size: 6,
                language: "es".to_string(),
            },
            cache: CacheConfig { enabled: true },
            server: ServerConfig {
                address: "0.0.0.0:3000".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.pokeapi.api_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.pokeapi.page_size, 6);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_default_matches_bundled_file() {
        let bundled = Config::from_toml_str(DEFAULT_CONFIG).unwrap();
        let default = Config::default();

        assert_eq!(default.pokeapi.language, "es");
        assert_eq!(default, bundled);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let raw = r#"
            [pokeapi]
            api_url = "http://localhost"
            timeout = 5
            page_size = 0
            language = "en"

            [cache]
            enabled = false

            [server]
            address = "127.0.0.1:0"
        "#;
        assert!(matches!(
            Config::from_toml_str(raw),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        assert!(matches!(
            Config::from_toml_str("[pokeapi"),
            Err(CatalogError::Config(_))
        ));
    }
}
