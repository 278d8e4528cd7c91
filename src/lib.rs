pub mod api;
pub mod cache;
pub mod config;
pub mod creature;
pub mod detail;
pub mod error;
pub mod evolution;
pub mod family;
pub mod loader;
pub mod pokemon;
pub mod projector;
pub mod server;
pub mod state;

pub use api::{PokeApi, PokeApiClient};
pub use config::*;
pub use creature::*;
pub use error::{CacheError, CatalogError};
pub use evolution::resolve_chain;
pub use family::{LoadedCreature, merge_batch};
pub use projector::{TypeFilter, project};
pub use state::CatalogState;
