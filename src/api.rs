use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::cache::{CacheTrait, ResourceCache};
use crate::config::Config;
use crate::error::CatalogError;
use crate::pokemon::{EvolutionChain, Pokemon, PokemonPage, PokemonSpecies};

/// Read-only access to the PokeAPI resources the catalog needs.
///
/// Everything except the list call and the by-name lookup is addressed by a
/// full URL taken from an earlier response.
pub trait PokeApi: Send + Sync {
    fn fetch_page(
        &self,
        offset: u32,
        limit: u32,
    ) -> impl Future<Output = Result<PokemonPage, CatalogError>> + Send;

    fn fetch_pokemon(&self, url: &str) -> impl Future<Output = Result<Pokemon, CatalogError>> + Send;

    fn fetch_pokemon_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Pokemon, CatalogError>> + Send;

    fn fetch_species(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<PokemonSpecies, CatalogError>> + Send;

    fn fetch_evolution_chain(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<EvolutionChain, CatalogError>> + Send;
}

/// PokeAPI over HTTP. Creatures are cached by id, species and chains by URL.
pub struct PokeApiClient {
    http: reqwest::Client,
    api_url: String,
    pokemon: ResourceCache<Pokemon>,
    pokemon_ids: ResourceCache<u32>,
    species: ResourceCache<PokemonSpecies>,
    chains: ResourceCache<EvolutionChain>,
}

impl PokeApiClient {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.pokeapi.timeout as u64))
            .build()?;

        Ok(Self {
            http,
            api_url: config.pokeapi.api_url.trim_end_matches('/').to_string(),
            pokemon: ResourceCache::new(&config.cache),
            pokemon_ids: ResourceCache::new(&config.cache),
            species: ResourceCache::new(&config.cache),
            chains: ResourceCache::new(&config.cache),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn cached_pokemon(&self) -> usize {
        self.pokemon.size()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        tracing::debug!("Fetching resource from URL: {}", url);

        let response = self.http.get(url).send().await.map_err(|e| {
            tracing::error!("Failed to make HTTP request to {}: {}", url, e);
            CatalogError::Network(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("API request to {} failed with status: {}", url, status);
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse JSON response from {}: {}", url, e);
            CatalogError::Parse(format!("JSON parsing failed: {}", e))
        })
    }

    /// Looks a creature up by decimal id or, failing that, through the name index.
    fn cached_creature(&self, key: &str) -> Option<Pokemon> {
        let id = match key.parse::<u32>() {
            Ok(id) => id,
            Err(_) => self.pokemon_ids.get(key)?,
        };
        self.pokemon.get(&id.to_string())
    }

    fn remember_creature(&self, pokemon: &Pokemon) {
        if let Err(e) = self.pokemon.insert(pokemon.id.to_string(), pokemon.clone()) {
            tracing::warn!("Failed to cache Pokemon #{}: {}", pokemon.id, e);
        }
        if let Err(e) = self.pokemon_ids.insert(pokemon.name.clone(), pokemon.id) {
            tracing::warn!("Failed to index Pokemon name {}: {}", pokemon.name, e);
        }
    }

    async fn get_creature(&self, key: &str, url: &str) -> Result<Pokemon, CatalogError> {
        if let Some(hit) = self.cached_creature(key) {
            return Ok(hit);
        }

        let pokemon: Pokemon = self.get_json(url).await?;
        self.remember_creature(&pokemon);
        tracing::debug!("Resolved Pokemon: {} (ID: {})", pokemon.name, pokemon.id);
        Ok(pokemon)
    }

    async fn get_cached<T>(&self, cache: &ResourceCache<T>, url: &str) -> Result<T, CatalogError>
    where
        T: DeserializeOwned + Clone + Send + Sync,
    {
        if let Some(hit) = cache.get(url) {
            return Ok(hit);
        }

        let value: T = self.get_json(url).await?;
        if let Err(e) = cache.insert(url.to_string(), value.clone()) {
            tracing::warn!("Failed to cache resource {}: {}", url, e);
        }
        Ok(value)
    }
}

impl PokeApi for PokeApiClient {
    async fn fetch_page(&self, offset: u32, limit: u32) -> Result<PokemonPage, CatalogError> {
        let url = format!("{}/pokemon?limit={}&offset={}", self.api_url, limit, offset);
        let page: PokemonPage = self.get_json(&url).await?;
        tracing::debug!(
            "Fetched page at offset {} with {} entries",
            offset,
            page.results.len()
        );
        Ok(page)
    }

    async fn fetch_pokemon(&self, url: &str) -> Result<Pokemon, CatalogError> {
        // `.../pokemon/25/` carries the id as its last segment
        let key = url.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
        self.get_creature(key, url).await
    }

    async fn fetch_pokemon_by_name(&self, name: &str) -> Result<Pokemon, CatalogError> {
        let url = format!("{}/pokemon/{}", self.api_url, name);
        self.get_creature(name, &url).await
    }

    async fn fetch_species(&self, url: &str) -> Result<PokemonSpecies, CatalogError> {
        self.get_cached(&self.species, url).await
    }

    async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChain, CatalogError> {
        self.get_cached(&self.chains, url).await
    }
}
