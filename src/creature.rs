use serde::{Deserialize, Serialize};

use crate::pokemon::{EvolutionDetail, Pokemon};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub sprite: Option<String>,
    pub artwork: Option<String>,
    pub stats: Vec<Stat>,
    pub abilities: Vec<Ability>,
    pub moves: Vec<String>,
    /// Decimetres.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    pub base_experience: Option<u32>,
    pub species_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub base: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub hidden: bool,
}

impl Creature {
    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn main_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }
}

impl From<Pokemon> for Creature {
    fn from(pokemon: Pokemon) -> Self {
        let artwork = pokemon
            .sprites
            .other
            .and_then(|other| other.official_artwork)
            .and_then(|art| art.front_default);

        Self {
            id: pokemon.id,
            name: pokemon.name,
            types: pokemon.types.into_iter().map(|t| t.r#type.name).collect(),
            sprite: pokemon.sprites.front_default,
            artwork,
            stats: pokemon
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    base: s.base_stat,
                })
                .collect(),
            abilities: pokemon
                .abilities
                .into_iter()
                .map(|a| Ability {
                    name: a.ability.name,
                    hidden: a.is_hidden,
                })
                .collect(),
            moves: pokemon.moves.into_iter().map(|m| m.r#move.name).collect(),
            height: pokemon.height,
            weight: pokemon.weight,
            base_experience: pokemon.base_experience,
            species_url: pokemon.species.map(|s| s.url).filter(|url| !url.is_empty()),
        }
    }
}

/// Identifies one evolution family. Only ever compared, never fetched again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainSource(pub String);

impl ChainSource {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChainSource {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EvolutionCondition {
    Level(u32),
    Item(String),
    Trigger(String),
    Special,
}

impl EvolutionCondition {
    /// Reads the first detail record: level, then item, then trigger.
    pub fn from_details(details: &[EvolutionDetail]) -> Option<Self> {
        let detail = details.first()?;
        let condition = if let Some(level) = detail.min_level {
            Self::Level(level)
        } else if let Some(item) = &detail.item {
            Self::Item(item.name.clone())
        } else if let Some(trigger) = &detail.trigger {
            Self::Trigger(trigger.name.clone())
        } else {
            Self::Special
        };
        Some(condition)
    }

    pub fn label(&self) -> String {
        match self {
            Self::Level(level) => format!("Level {}", level),
            Self::Item(item) => format!("Use {}", item),
            Self::Trigger(trigger) => capitalize(&trigger.replace('-', " ")),
            Self::Special => "Special condition".to_string(),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionStage {
    pub creature: Creature,
    pub condition: Option<EvolutionCondition>,
}

/// One evolution line. `chain` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub representative: Creature,
    pub chain: Vec<EvolutionStage>,
    pub source: Option<ChainSource>,
}

impl Family {
    /// Representative first, then every stage.
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> {
        std::iter::once(&self.representative).chain(self.chain.iter().map(|s| &s.creature))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokemon::NamedAPIResource;

    fn named(name: &str) -> Option<NamedAPIResource> {
        Some(NamedAPIResource {
            name: name.to_string(),
            url: String::new(),
        })
    }

    #[test]
    fn test_condition_prefers_level_over_item_and_trigger() {
        let details = vec![EvolutionDetail {
            min_level: Some(16),
            item: named("fire-stone"),
            trigger: named("level-up"),
        }];
        assert_eq!(
            EvolutionCondition::from_details(&details),
            Some(EvolutionCondition::Level(16))
        );
    }

    #[test]
    fn test_condition_falls_through_to_trigger_then_special() {
        let item = vec![EvolutionDetail {
            item: named("thunder-stone"),
            trigger: named("use-item"),
            ..Default::default()
        }];
        assert_eq!(
            EvolutionCondition::from_details(&item),
            Some(EvolutionCondition::Item("thunder-stone".to_string()))
        );

        let trade = vec![EvolutionDetail {
            trigger: named("trade"),
            ..Default::default()
        }];
        assert_eq!(
            EvolutionCondition::from_details(&trade).map(|c| c.label()),
            Some("Trade".to_string())
        );

        let empty = vec![EvolutionDetail::default()];
        assert_eq!(
            EvolutionCondition::from_details(&empty),
            Some(EvolutionCondition::Special)
        );
    }

    #[test]
    fn test_no_details_means_no_condition() {
        assert_eq!(EvolutionCondition::from_details(&[]), None);
    }

    #[test]
    fn test_creature_from_pokemon_drops_empty_species_url() {
        let pokemon = Pokemon {
            id: 25,
            name: "pikachu".to_string(),
            species: Some(NamedAPIResource {
                name: "pikachu".to_string(),
                url: String::new(),
            }),
            ..Default::default()
        };
        let creature = Creature::from(pokemon);
        assert_eq!(creature.id, 25);
        assert_eq!(creature.species_url, None);
    }

    #[test]
    fn test_chain_source_is_a_plain_url_key() {
        let url = "https://pokeapi.co/api/v2/evolution-chain/1/";
        let sources: std::collections::HashSet<ChainSource> =
            [ChainSource::from(url), ChainSource::from(url)].into_iter().collect();

        assert_eq!(sources.len(), 1);
        assert_eq!(
            serde_json::to_string(&ChainSource::from(url)).unwrap(),
            format!("\"{}\"", url)
        );
    }
}
