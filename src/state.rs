use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;

use crate::creature::{Creature, Family};
use crate::error::CatalogError;
use crate::family::merge_batch;
use crate::loader::{Batch, PageRequest};
use crate::projector::{TypeFilter, project};

/// Session state of the catalog.
///
/// Families and favorites are immutable snapshots; every change swaps in a
/// whole new snapshot, so readers holding an `Arc` never see a partial update.
#[derive(Debug, Clone)]
pub struct CatalogState {
    families: Arc<[Family]>,
    favorites: Arc<BTreeSet<u32>>,
    page_size: u32,
    offset: u32,
    has_more: bool,
    loading: bool,
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub families: usize,
    pub creatures: usize,
    pub favorites: usize,
    pub loading: bool,
    pub has_more: bool,
    pub error: Option<String>,
}

impl CatalogState {
    pub fn new(page_size: u32) -> Self {
        Self {
            families: Arc::from(Vec::new()),
            favorites: Arc::new(BTreeSet::new()),
            page_size,
            offset: 0,
            has_more: true,
            loading: false,
            error: None,
        }
    }

    pub fn families(&self) -> Arc<[Family]> {
        Arc::clone(&self.families)
    }

    pub fn favorites(&self) -> Arc<BTreeSet<u32>> {
        Arc::clone(&self.favorites)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Claims the busy flag for the next page.
    ///
    /// Returns `None` while another load is running or once the list is
    /// exhausted; such requests are dropped, not queued.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if self.loading {
            tracing::debug!("Load already in progress, dropping request");
            return None;
        }
        if !self.has_more {
            tracing::debug!("No more pages after offset {}", self.offset);
            return None;
        }

        self.loading = true;
        self.error = None;
        Some(PageRequest {
            offset: self.offset,
            limit: self.page_size,
        })
    }

    /// Applies a finished load and releases the busy flag. Returns how many families were added.
    pub fn finish_load(&mut self, result: Result<Batch, CatalogError>) -> usize {
        self.loading = false;

        match result {
            Ok(batch) => {
                let added = merge_batch(batch.creatures, &self.families);
                let count = added.len();
                let mut families = self.families.to_vec();
                families.extend(added);
                self.families = Arc::from(families);
                self.offset = batch.next_offset;
                self.has_more = batch.has_more;
                tracing::debug!(
                    "Catalog now holds {} families, next offset {}",
                    self.families.len(),
                    self.offset
                );
                count
            }
            Err(e) => {
                self.error = Some(format!(
                    "Failed to load Pokémon ({}). Please try again.",
                    e
                ));
                0
            }
        }
    }

    /// Drops loaded data for a full reload. Favorites survive for the session.
    pub fn reset(&mut self) {
        self.families = Arc::from(Vec::new());
        self.offset = 0;
        self.has_more = true;
        self.error = None;
    }

    /// Flips membership and returns whether `id` is now a favorite.
    pub fn toggle_favorite(&mut self, id: u32) -> bool {
        let mut favorites = (*self.favorites).clone();
        let now_favorite = if favorites.remove(&id) {
            false
        } else {
            favorites.insert(id);
            true
        };
        self.favorites = Arc::new(favorites);
        now_favorite
    }

    pub fn is_favorite(&self, id: u32) -> bool {
        self.favorites.contains(&id)
    }

    pub fn visible(&self, query: &str, filter: &TypeFilter) -> Vec<&Family> {
        project(&self.families, query, filter, &self.favorites)
    }

    /// Looks a creature up across every stage of every loaded family.
    pub fn find_creature(&self, id: u32) -> Option<(&Creature, &Family)> {
        self.families.iter().find_map(|family| {
            family
                .creatures()
                .find(|creature| creature.id == id)
                .map(|creature| (creature, family))
        })
    }

    pub fn summary(&self) -> Summary {
        Summary {
            families: self.families.len(),
            creatures: self.families.iter().map(|f| f.chain.len()).sum(),
            favorites: self.favorites.len(),
            loading: self.loading,
            has_more: self.has_more,
            error: self.error.clone(),
        }
    }
}
