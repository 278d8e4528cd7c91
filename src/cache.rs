use crate::config::CacheConfig;
use crate::error::CacheError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// Lookup seam so the client does not care how resources are kept
pub trait CacheTrait<T>: Send + Sync
where
    T: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<T>;
    fn insert(&self, key: String, value: T) -> Result<(), CacheError>;
    fn size(&self) -> usize;
}

/// Resources keyed by text (an id, a name or a URL). Entries live for the whole session.
pub struct ResourceCache<T>
where
    T: Clone + Send + Sync,
{
    store: Arc<Mutex<HashMap<String, T>>>,
    enabled: bool,
}

impl<T> ResourceCache<T>
where
    T: Clone + Send + Sync,
{
    pub fn new(config: &CacheConfig) -> Self {
        tracing::debug!("Initializing resource cache (enabled: {})", config.enabled);

        Self {
            store: Arc::new(Mutex::new(HashMap::new())),
            enabled: config.enabled,
        }
    }
}

impl<T> Default for ResourceCache<T>
where
    T: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new(&CacheConfig { enabled: true })
    }
}

impl<T> CacheTrait<T> for ResourceCache<T>
where
    T: Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Option<T> {
        if key.is_empty() {
            tracing::warn!("Attempted to get cache entry with empty key");
            return None;
        }
        if !self.enabled {
            return None;
        }

        match self.store.lock() {
            Ok(store) => {
                let result = store.get(key).cloned();
                if result.is_some() {
                    tracing::debug!("Cache hit for key: {}", key);
                } else {
                    tracing::debug!("Cache miss for key: {}", key);
                }
                result
            }
            Err(e) => {
                tracing::error!("Failed to acquire cache read lock for key {}: {}", key, e);
                None
            }
        }
    }

    fn insert(&self, key: String, value: T) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
        }
        if !self.enabled {
            return Ok(());
        }

        match self.store.lock() {
            Ok(mut store) => {
                if store.insert(key.clone(), value).is_some() {
                    tracing::debug!("Updated existing cache entry: {}", key);
                } else {
                    tracing::debug!("Inserted new cache entry: {}", key);
                }
                Ok(())
            }
            Err(e) => {
                let error_msg = format!("Failed to acquire cache write lock: {}", e);
                tracing::error!("{}", error_msg);
                Err(CacheError::LockError(error_msg))
            }
        }
    }

    fn size(&self) -> usize {
        match self.store.lock() {
            Ok(store) => store.len(),
            Err(_) => 0,
        }
    }
}
