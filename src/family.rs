use std::collections::HashSet;

use crate::creature::{ChainSource, Creature, EvolutionStage, Family};

/// A fetched creature together with whatever evolution data could be resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCreature {
    pub creature: Creature,
    pub source: Option<ChainSource>,
    pub chain: Vec<EvolutionStage>,
}

impl LoadedCreature {
    /// A creature whose evolution lookup failed.
    pub fn standalone(creature: Creature) -> Self {
        Self {
            creature,
            source: None,
            chain: Vec::new(),
        }
    }

    fn into_family(self) -> Family {
        let chain = if self.chain.is_empty() {
            vec![EvolutionStage {
                creature: self.creature.clone(),
                condition: None,
            }]
        } else {
            self.chain
        };
        let representative = match self.source {
            Some(_) => chain[0].creature.clone(),
            None => self.creature,
        };

        Family {
            representative,
            chain,
            source: self.source,
        }
    }
}

/// Collapses a batch to one family per chain source, skipping sources
/// already present in `accumulated`. The result is meant to be appended.
///
/// Items without a source are never collapsed.
pub fn merge_batch(batch: Vec<LoadedCreature>, accumulated: &[Family]) -> Vec<Family> {
    let known: HashSet<&ChainSource> = accumulated
        .iter()
        .filter_map(|family| family.source.as_ref())
        .collect();
    let mut seen: HashSet<ChainSource> = HashSet::new();
    let mut merged = Vec::with_capacity(batch.len());

    for item in batch {
        if let Some(source) = &item.source {
            if !seen.insert(source.clone()) {
                tracing::debug!(
                    "Dropping {} (#{}), family {} already in this batch",
                    item.creature.name,
                    item.creature.id,
                    source.as_str()
                );
                continue;
            }
            if known.contains(source) {
                tracing::debug!(
                    "Dropping {} (#{}), family {} already loaded",
                    item.creature.name,
                    item.creature.id,
                    source.as_str()
                );
                continue;
            }
        }
        merged.push(item.into_family());
    }

    merged
}
