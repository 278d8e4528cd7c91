// pokemon.rs
// Wire shapes of the PokeAPI resources the catalog reads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub abilities: Vec<PokemonAbility>,
    #[serde(default)]
    pub moves: Vec<PokemonMove>,
    #[serde(default)]
    pub species: Option<NamedAPIResource>,
    #[serde(default)]
    pub sprites: PokemonSprites,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct NamedAPIResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct APIResource {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PokemonAbility {
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: u32,
    pub ability: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PokemonMove {
    pub r#move: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PokemonStat {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PokemonType {
    #[serde(default)]
    pub slot: u32,
    pub r#type: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PokemonSprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<ArtworkSprite>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ArtworkSprite {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// One page of `/pokemon?limit=N&offset=M`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PokemonPage {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PokemonSpecies {
    pub name: String,
    #[serde(default)]
    pub evolution_chain: Option<APIResource>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FlavorText {
    pub flavor_text: String,
    pub language: NamedAPIResource,
}

impl PokemonSpecies {
    /// Flavor text in `language`, falling back to English.
    pub fn flavor_text(&self, language: &str) -> Option<String> {
        let pick = |lang: &str| {
            self.flavor_text_entries
                .iter()
                .find(|entry| entry.language.name == lang)
        };
        pick(language)
            .or_else(|| pick("en"))
            .map(|entry| entry.flavor_text.replace(['\n', '\u{000C}'], " "))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EvolutionChain {
    #[serde(default)]
    pub id: u32,
    pub chain: ChainLink,
}

/// A node of the evolution tree. Each child carries the details that lead to it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChainLink {
    pub species: NamedAPIResource,
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct EvolutionDetail {
    #[serde(default)]
    pub min_level: Option<u32>,
    #[serde(default)]
    pub item: Option<NamedAPIResource>,
    #[serde(default)]
    pub trigger: Option<NamedAPIResource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pokemon_deserializes_api_shape() {
        let raw = r#"{
            "id": 4,
            "name": "charmander",
            "base_experience": 62,
            "height": 6,
            "weight": 85,
            "abilities": [
                {"ability": {"name": "blaze", "url": "a/66"}, "is_hidden": false, "slot": 1},
                {"ability": {"name": "solar-power", "url": "a/94"}, "is_hidden": true, "slot": 3}
            ],
            "moves": [{"move": {"name": "scratch", "url": "m/10"}}],
            "species": {"name": "charmander", "url": "https://pokeapi.co/api/v2/pokemon-species/4/"},
            "sprites": {
                "front_default": "front.png",
                "other": {"official-artwork": {"front_default": "art.png"}}
            },
            "stats": [{"base_stat": 39, "effort": 0, "stat": {"name": "hp", "url": "s/1"}}],
            "types": [{"slot": 1, "type": {"name": "fire", "url": "t/10"}}]
        }"#;

        let pokemon: Pokemon = serde_json::from_str(raw).unwrap();
        assert_eq!(pokemon.id, 4);
        assert_eq!(pokemon.types[0].r#type.name, "fire");
        assert!(pokemon.abilities[1].is_hidden);
        assert_eq!(
            pokemon
                .sprites
                .other
                .and_then(|o| o.official_artwork)
                .and_then(|a| a.front_default)
                .as_deref(),
            Some("art.png")
        );
    }

    #[test]
    fn test_flavor_text_language_fallback() {
        let species = PokemonSpecies {
            name: "bulbasaur".to_string(),
            evolution_chain: None,
            flavor_text_entries: vec![FlavorText {
                flavor_text: "A strange seed\nwas planted.".to_string(),
                language: NamedAPIResource {
                    name: "en".to_string(),
                    url: String::new(),
                },
            }],
        };

        assert_eq!(
            species.flavor_text("es").as_deref(),
            Some("A strange seed was planted.")
        );
    }
}
