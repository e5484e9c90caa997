// pokemon.rs
// Typed shapes of the PokeAPI responses this crate consumes.

use crate::error::{AppError, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NamedAPIResource {
    pub name: String,
    pub url: String,
}

/// A reference that only carries its address, e.g. `evolution_chain`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct APIResource {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum StatName {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl StatName {
    pub const ALL: [StatName; 6] = [
        StatName::Hp,
        StatName::Attack,
        StatName::Defense,
        StatName::SpecialAttack,
        StatName::SpecialDefense,
        StatName::Speed,
    ];
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dark,
    Dragon,
    Steel,
    Fairy,
}

impl std::str::FromStr for TypeName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.trim().to_ascii_lowercase()))
            .map_err(|_| ValidationError::UnknownType(s.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PokemonData {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub base_experience: Option<u32>,
    pub height: u32,
    pub weight: u32,
    pub types: Vec<PokemonType>,
    pub stats: Vec<PokemonStat>,
    pub abilities: Vec<PokemonAbility>,
    pub species: NamedAPIResource,
}

impl PokemonData {
    /// Checks the invariants serde cannot express: one or two types, and
    /// either no stats or exactly the six canonical ones.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.types.is_empty() || self.types.len() > 2 {
            return Err(AppError::ParseError(format!(
                "{} has {} types, expected 1 or 2",
                self.name,
                self.types.len()
            )));
        }

        if !self.stats.is_empty() {
            let mut seen: Vec<StatName> = self.stats.iter().map(|s| s.stat.name).collect();
            seen.sort();
            seen.dedup();
            if self.stats.len() != StatName::ALL.len() || seen.len() != StatName::ALL.len() {
                return Err(AppError::ParseError(format!(
                    "{} does not carry the six canonical stats",
                    self.name
                )));
            }
        }

        Ok(())
    }

    pub fn base_stat(&self, name: StatName) -> Option<u8> {
        self.stats
            .iter()
            .find(|stat| stat.stat.name == name)
            .map(|stat| stat.base_stat)
    }

    pub fn has_type(&self, name: TypeName) -> bool {
        self.types.iter().any(|t| t.r#type.name == name)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PokemonAbility {
    pub is_hidden: bool,
    pub slot: u8,
    pub ability: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PokemonStat {
    pub base_stat: u8,
    pub effort: u8,
    pub stat: StatRef,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StatRef {
    pub name: StatName,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PokemonType {
    pub slot: u8,
    pub r#type: TypeRef,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: TypeName,
    pub url: String,
}

// Listing envelopes

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PokemonListResponse {
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PokedexEntry {
    pub entry_number: u32,
    pub pokemon_species: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PokedexResponse {
    pub pokemon_entries: Vec<PokedexEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TypeResponse {
    pub pokemon: Vec<TypePokemon>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TypePokemon {
    pub pokemon: NamedAPIResource,
}

// Species

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpeciesInfo {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub order: i32,
    pub gender_rate: i8,
    pub capture_rate: u8,
    pub base_happiness: Option<u8>,
    pub is_baby: bool,
    pub is_legendary: bool,
    pub is_mythical: bool,
    pub hatch_counter: Option<u32>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextEntry>,
    #[serde(default)]
    pub genera: Vec<Genus>,
    #[serde(default)]
    pub egg_groups: Vec<NamedAPIResource>,
    pub color: Option<NamedAPIResource>,
    pub shape: Option<NamedAPIResource>,
    pub habitat: Option<NamedAPIResource>,
    pub generation: Option<NamedAPIResource>,
    pub evolves_from_species: Option<NamedAPIResource>,
    pub evolution_chain: Option<APIResource>,
    #[serde(default)]
    pub varieties: Vec<Variety>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FlavorTextEntry {
    pub flavor_text: String,
    pub language: NamedAPIResource,
    pub version: Option<NamedAPIResource>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Genus {
    pub genus: String,
    pub language: NamedAPIResource,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Variety {
    pub is_default: bool,
    pub pokemon: NamedAPIResource,
}

// Evolution

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EvolutionChain {
    pub id: u32,
    pub chain: EvolutionChainLink,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EvolutionChainLink {
    pub species: NamedAPIResource,
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
    #[serde(default)]
    pub evolves_to: Vec<EvolutionChainLink>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EvolutionDetail {
    pub trigger: Option<NamedAPIResource>,
    pub min_level: Option<u32>,
    pub item: Option<NamedAPIResource>,
    pub held_item: Option<NamedAPIResource>,
    pub time_of_day: Option<String>,
    pub location: Option<NamedAPIResource>,
    pub known_move: Option<NamedAPIResource>,
    pub known_move_type: Option<NamedAPIResource>,
    pub trade_species: Option<NamedAPIResource>,
    pub needs_overworld_rain: Option<bool>,
    pub turn_upside_down: Option<bool>,
    pub relative_physical_stats: Option<i8>,
    #[serde(alias = "min_happiness")]
    pub happiness: Option<u32>,
    #[serde(alias = "min_affection")]
    pub affection: Option<u32>,
    #[serde(alias = "min_beauty")]
    pub beauty: Option<u32>,
    pub gender: Option<u8>,
    pub party_species: Option<NamedAPIResource>,
    pub party_type: Option<NamedAPIResource>,
}
