use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::creature::{Creature, Family};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeFilter {
    #[default]
    All,
    Favorites,
    Type(String),
}

impl FromStr for TypeFilter {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Ok(if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            Self::All
        } else if raw.eq_ignore_ascii_case("favorites") {
            Self::Favorites
        } else {
            Self::Type(raw.to_lowercase())
        })
    }
}

/// Families matching the query and the type or favorites filter, in input order.
pub fn project<'a>(
    families: &'a [Family],
    query: &str,
    filter: &TypeFilter,
    favorites: &BTreeSet<u32>,
) -> Vec<&'a Family> {
    let query = query.to_lowercase();

    families
        .iter()
        .filter(|family| query.is_empty() || family.creatures().any(|c| matches_query(c, &query)))
        .filter(|family| match filter {
            TypeFilter::All => true,
            TypeFilter::Favorites => family.creatures().any(|c| favorites.contains(&c.id)),
            TypeFilter::Type(tag) => family.creatures().any(|c| c.has_type(tag)),
        })
        .collect()
}

fn matches_query(creature: &Creature, query: &str) -> bool {
    creature.name.to_lowercase().contains(query) || creature.id.to_string().contains(query)
}
