use crate::api::PokeApi;
use crate::creature::{Creature, EvolutionCondition, EvolutionStage};
use crate::pokemon::ChainLink;

/// Walks an evolution chain from `root`, fetching every stage in order.
///
/// Only the first `evolves_to` child of each node is followed. A failed fetch
/// ends the walk and the stages resolved so far are returned.
pub async fn resolve_chain<A: PokeApi>(api: &A, root: &ChainLink) -> Vec<EvolutionStage> {
    let mut stages = Vec::new();
    let mut current = Some(root);
    let mut condition = None;

    while let Some(node) = current {
        let name = &node.species.name;
        match api.fetch_pokemon_by_name(name).await {
            Ok(pokemon) => stages.push(EvolutionStage {
                creature: Creature::from(pokemon),
                condition,
            }),
            Err(e) => {
                tracing::warn!(
                    "Stopping evolution walk at {} after {} stages: {}",
                    name,
                    stages.len(),
                    e
                );
                break;
            }
        }

        if node.evolves_to.len() > 1 {
            tracing::debug!(
                "{} has {} evolution branches, following the first",
                name,
                node.evolves_to.len()
            );
        }
        current = node.evolves_to.first();
        condition = current.and_then(|next| EvolutionCondition::from_details(&next.evolution_details));
    }

    stages
}
