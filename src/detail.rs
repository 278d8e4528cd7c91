use serde::Serialize;

use crate::creature::{Creature, Family};

const MOVES_SHOWN: usize = 8;
const MAX_BASE_STAT: f64 = 255.0;

/// One card of the gallery grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryCard {
    pub id: u32,
    pub name: String,
    pub main_type: Option<String>,
    pub types: Vec<String>,
    pub sprite: Option<String>,
    pub chain: Vec<String>,
    pub favorite: bool,
}

impl GalleryCard {
    pub fn from_family(family: &Family, is_favorite: impl Fn(u32) -> bool) -> Self {
        let rep = &family.representative;
        Self {
            id: rep.id,
            name: rep.name.clone(),
            main_type: rep.main_type().map(str::to_string),
            types: rep.types.clone(),
            sprite: rep.sprite.clone(),
            chain: family.chain.iter().map(|s| s.creature.name.clone()).collect(),
            favorite: family.creatures().any(|c| is_favorite(c.id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatLine {
    pub name: String,
    pub label: String,
    pub value: u32,
    pub percentage: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityLine {
    pub name: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainStep {
    pub id: u32,
    pub name: String,
    pub condition: Option<String>,
}

/// Everything the detail modal shows for one creature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub id: u32,
    pub number: String,
    pub name: String,
    pub types: Vec<String>,
    pub image: Option<String>,
    pub height_m: f64,
    pub weight_kg: f64,
    pub base_experience: Option<u32>,
    pub abilities: Vec<AbilityLine>,
    pub stats: Vec<StatLine>,
    pub stat_total: u32,
    pub moves: Vec<String>,
    pub more_moves: usize,
    pub favorite: bool,
    pub evolution: Vec<ChainStep>,
    pub flavor_text: Option<String>,
}

impl DetailView {
    pub fn from_creature(
        creature: &Creature,
        family: Option<&Family>,
        favorite: bool,
        flavor_text: Option<String>,
    ) -> Self {
        Self {
            id: creature.id,
            number: format!("#{:03}", creature.id),
            name: creature.name.clone(),
            types: creature.types.clone(),
            image: creature.artwork.clone().or_else(|| creature.sprite.clone()),
            height_m: creature.height as f64 / 10.0,
            weight_kg: creature.weight as f64 / 10.0,
            base_experience: creature.base_experience,
            abilities: creature
                .abilities
                .iter()
                .map(|a| AbilityLine {
                    name: a.name.clone(),
                    hidden: a.hidden,
                })
                .collect(),
            stats: creature
                .stats
                .iter()
                .map(|s| StatLine {
                    name: s.name.clone(),
                    label: stat_label(&s.name),
                    value: s.base,
                    percentage: (s.base as f64 / MAX_BASE_STAT * 100.0).min(100.0),
                    color: stat_color(&s.name),
                })
                .collect(),
            stat_total: creature.stats.iter().map(|s| s.base).sum(),
            moves: creature.moves.iter().take(MOVES_SHOWN).cloned().collect(),
            more_moves: creature.moves.len().saturating_sub(MOVES_SHOWN),
            favorite,
            evolution: family
                .map(|f| {
                    f.chain
                        .iter()
                        .map(|s| ChainStep {
                            id: s.creature.id,
                            name: s.creature.name.clone(),
                            condition: s.condition.as_ref().map(|c| c.label()),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            flavor_text,
        }
    }
}

fn stat_label(name: &str) -> String {
    match name {
        "hp" => "HP",
        "attack" => "Attack",
        "defense" => "Defense",
        "special-attack" => "Sp. Atk",
        "special-defense" => "Sp. Def",
        "speed" => "Speed",
        other => other,
    }
    .to_string()
}

fn stat_color(name: &str) -> &'static str {
    match name {
        "hp" => "#ff6b6b",
        "attack" => "#ff8e53",
        "defense" => "#4ecdc4",
        "special-attack" => "#45b7d1",
        "special-defense" => "#96ceb4",
        "speed" => "#ffd93d",
        _ => "#3b82f6",
    }
}
