use futures::future::join_all;

use crate::api::PokeApi;
use crate::creature::{ChainSource, Creature, EvolutionStage};
use crate::error::CatalogError;
use crate::evolution::resolve_chain;
use crate::family::LoadedCreature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

/// Everything fetched for one page, ready to be merged into the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub creatures: Vec<LoadedCreature>,
    pub next_offset: u32,
    pub has_more: bool,
}

/// Loads one page: list, then details concurrently, then evolution chains concurrently.
///
/// Only the list call can fail the batch. A failed detail drops that entry, a
/// failed evolution lookup leaves the creature without a family source.
pub async fn load_batch<A: PokeApi>(api: &A, request: PageRequest) -> Result<Batch, CatalogError> {
    let page = api.fetch_page(request.offset, request.limit).await.map_err(|e| {
        tracing::error!("Failed to load page at offset {}: {}", request.offset, e);
        e
    })?;
    let listed = page.results.len() as u32;

    let details = join_all(page.results.iter().map(|entry| async move {
        match api.fetch_pokemon(&entry.url).await {
            Ok(pokemon) => Some(Creature::from(pokemon)),
            Err(e) => {
                tracing::warn!("Skipping {}: failed to fetch details: {}", entry.name, e);
                None
            }
        }
    }))
    .await;

    let creatures = join_all(
        details
            .into_iter()
            .flatten()
            .map(|creature| resolve_family(api, creature)),
    )
    .await;

    tracing::info!(
        "Loaded {} of {} Pokémon at offset {}",
        creatures.len(),
        listed,
        request.offset
    );

    Ok(Batch {
        creatures,
        next_offset: request.offset + listed,
        has_more: page.next.is_some(),
    })
}

async fn resolve_family<A: PokeApi>(api: &A, creature: Creature) -> LoadedCreature {
    match fetch_family(api, &creature).await {
        Ok((source, chain)) => LoadedCreature {
            creature,
            source: Some(source),
            chain,
        },
        Err(e) => {
            tracing::warn!(
                "Evolution lookup failed for {} (#{}), showing it alone: {}",
                creature.name,
                creature.id,
                e
            );
            LoadedCreature::standalone(creature)
        }
    }
}

async fn fetch_family<A: PokeApi>(
    api: &A,
    creature: &Creature,
) -> Result<(ChainSource, Vec<EvolutionStage>), CatalogError> {
    let species_url = creature
        .species_url
        .as_deref()
        .ok_or_else(|| CatalogError::Parse(format!("{} has no species reference", creature.name)))?;
    let species = api.fetch_species(species_url).await?;
    let chain_url = species
        .evolution_chain
        .map(|resource| resource.url)
        .ok_or_else(|| CatalogError::Parse(format!("{} has no evolution chain", species.name)))?;

    let chain = api.fetch_evolution_chain(&chain_url).await?;
    let stages = resolve_chain(api, &chain.chain).await;
    Ok((ChainSource(chain_url), stages))
}
