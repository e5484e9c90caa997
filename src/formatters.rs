// Presentation helpers shared by the entry, evolution and species views.

use crate::pokemon::PokemonData;
use serde::Serialize;

const SPRITE_BASE_URL: &str = "https://github.com/PokeAPI/sprites/blob/master/sprites/pokemon";
const ARTWORK_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";

/// `"level-up"` becomes `"Level Up"`. Absent or empty labels become `"Unknown"`.
pub fn format_label(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => value
            .split('-')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" "),
        _ => "Unknown".to_string(),
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Scales an API-native measure (decimeters, hectograms) for display.
pub fn format_metric(value: Option<u32>, divisor: f64, unit: &str, precision: usize) -> String {
    match value {
        Some(value) => format!("{:.*}{}", precision, value as f64 / divisor, unit),
        None => "—".to_string(),
    }
}

/// Flavor text from the API embeds form feeds and hard line breaks.
pub fn sanitize_flavor_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for c in text.chars() {
        if matches!(c, '\u{c}' | '\n' | '\r') {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out.trim().to_string()
}

pub fn sprite_url(index: u32) -> String {
    format!("{}/{}.png?raw=true", SPRITE_BASE_URL, index)
}

pub fn artwork_url(pokemon_id: u32) -> String {
    format!("{}/{}.png", ARTWORK_BASE_URL, pokemon_id)
}

/// An entry record plus display-ready measures and image links.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EntryView {
    #[serde(flatten)]
    pub pokemon: PokemonData,
    pub height_m: String,
    pub weight_kg: String,
    pub sprite: String,
    pub artwork: String,
}

pub fn entry_view(pokemon: PokemonData) -> EntryView {
    EntryView {
        height_m: format_metric(Some(pokemon.height), 10.0, " m", 1),
        weight_kg: format_metric(Some(pokemon.weight), 10.0, " kg", 1),
        sprite: sprite_url(pokemon.id),
        artwork: artwork_url(pokemon.id),
        pokemon,
    }
}
