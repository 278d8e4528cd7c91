use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("API request to {url} failed with status: {status}")]
    Status { url: String, status: u16 },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Pokémon #{0} has not been loaded")]
    NotLoaded(u32),
    #[error("Catalog state unavailable: {0}")]
    State(String),
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache lock error: {0}")]
    LockError(String),
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Parse(err.to_string())
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(err: toml::de::Error) -> Self {
        CatalogError::Config(err.to_string())
    }
}
