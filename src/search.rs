use crate::pokemon::{PokemonData, StatName, TypeName};
use serde::Deserialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    #[default]
    Id,
    Name,
    Height,
    Weight,
    Hp,
    Attack,
    Defense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Case-insensitive substring match. A blank query keeps everything.
pub fn search_names<S: AsRef<str>>(names: &[S], query: &str) -> Vec<String> {
    let query = query.trim().to_lowercase();
    names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| query.is_empty() || name.to_lowercase().contains(&query))
        .map(str::to_string)
        .collect()
}

/// Keeps entries having any of `types`. No selected types keeps everything.
pub fn filter_by_types<'a>(entries: &'a [PokemonData], types: &[TypeName]) -> Vec<&'a PokemonData> {
    entries
        .iter()
        .filter(|entry| types.is_empty() || types.iter().any(|t| entry.has_type(*t)))
        .collect()
}

fn stat(entry: &PokemonData, name: StatName) -> u8 {
    entry.base_stat(name).unwrap_or(0)
}

fn compare(a: &PokemonData, b: &PokemonData, by: SortOption) -> Ordering {
    match by {
        SortOption::Id => a.id.cmp(&b.id),
        SortOption::Name => a.name.cmp(&b.name),
        SortOption::Height => a.height.cmp(&b.height),
        SortOption::Weight => a.weight.cmp(&b.weight),
        SortOption::Hp => stat(a, StatName::Hp).cmp(&stat(b, StatName::Hp)),
        SortOption::Attack => stat(a, StatName::Attack).cmp(&stat(b, StatName::Attack)),
        SortOption::Defense => stat(a, StatName::Defense).cmp(&stat(b, StatName::Defense)),
    }
}

/// Stable sort. Ties fall back to the catalog id.
pub fn sort_entries(entries: &mut [&PokemonData], by: SortOption, order: SortOrder) {
    entries.sort_by(|a, b| {
        let ordering = compare(a, b, by).then_with(|| a.id.cmp(&b.id));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
