use crate::formatters::{format_label, sanitize_flavor_text};
use crate::pokemon::{NamedAPIResource, SpeciesInfo};
use serde::Serialize;

pub const FALLBACK_LANGUAGE: &str = "en";
pub const NO_FLAVOR_TEXT: &str = "No description available in the selected language.";

impl SpeciesInfo {
    /// Languages with at least one flavor text, in first-seen order.
    pub fn flavor_languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = Vec::new();
        for entry in &self.flavor_text_entries {
            let language = entry.language.name.as_str();
            if !languages.contains(&language) {
                languages.push(language);
            }
        }
        languages
    }

    /// Most recent flavor text in `language`, then English, then a placeholder.
    pub fn flavor_text(&self, language: &str) -> String {
        let latest = |lang: &str| {
            self.flavor_text_entries
                .iter()
                .rev()
                .find(|entry| entry.language.name == lang)
                .map(|entry| sanitize_flavor_text(&entry.flavor_text))
                .filter(|text| !text.is_empty())
        };

        latest(language)
            .or_else(|| latest(FALLBACK_LANGUAGE))
            .unwrap_or_else(|| NO_FLAVOR_TEXT.to_string())
    }

    pub fn genus(&self) -> Option<&str> {
        self.genera
            .iter()
            .find(|entry| entry.language.name == FALLBACK_LANGUAGE)
            .map(|entry| entry.genus.as_str())
    }

    pub fn is_genderless(&self) -> bool {
        self.gender_rate < 0
    }

    /// Share of the species that is female, in percent.
    pub fn female_ratio(&self) -> Option<f64> {
        if self.is_genderless() {
            None
        } else {
            Some(self.gender_rate as f64 / 8.0 * 100.0)
        }
    }

    pub fn status_tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.is_legendary {
            tags.push("Legendary");
        }
        if self.is_mythical {
            tags.push("Mythical");
        }
        if self.is_baby {
            tags.push("Baby");
        }
        if self.is_genderless() {
            tags.push("Genderless");
        }
        tags
    }

    pub fn catch_rate_percent(&self) -> Option<u32> {
        match self.capture_rate {
            0 => None,
            rate => Some((rate as f64 / 255.0 * 100.0).round() as u32),
        }
    }

    pub fn hatch_steps(&self) -> Option<u32> {
        self.hatch_counter.map(|counter| (counter + 1) * 255)
    }

    pub fn alternate_forms(&self) -> Vec<&NamedAPIResource> {
        self.varieties
            .iter()
            .filter(|variety| !variety.is_default)
            .map(|variety| &variety.pokemon)
            .collect()
    }

    pub fn summary(&self, language: &str) -> SpeciesSummary {
        SpeciesSummary {
            name: self.name.clone(),
            genus: self.genus().map(str::to_string),
            flavor_text: self.flavor_text(language),
            languages: self.flavor_languages().into_iter().map(str::to_string).collect(),
            tags: self.status_tags(),
            capture_rate: self.capture_rate,
            catch_rate_percent: self.catch_rate_percent(),
            female_ratio: self.female_ratio(),
            hatch_steps: self.hatch_steps(),
            base_happiness: self.base_happiness,
            egg_groups: self
                .egg_groups
                .iter()
                .map(|group| format_label(Some(&group.name)))
                .collect(),
            habitat: self.habitat.as_ref().map(|h| format_label(Some(&h.name))),
            color: self.color.as_ref().map(|c| format_label(Some(&c.name))),
            shape: self.shape.as_ref().map(|s| format_label(Some(&s.name))),
            generation: self.generation.as_ref().map(|g| g.name.clone()),
            alternate_forms: self
                .alternate_forms()
                .into_iter()
                .map(|form| form.name.clone())
                .collect(),
            evolution_chain: self.evolution_chain.as_ref().map(|c| c.url.clone()),
        }
    }
}

/// Display-ready projection of a species record.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SpeciesSummary {
    pub name: String,
    pub genus: Option<String>,
    pub flavor_text: String,
    pub languages: Vec<String>,
    pub tags: Vec<&'static str>,
    pub capture_rate: u8,
    pub catch_rate_percent: Option<u32>,
    pub female_ratio: Option<f64>,
    pub hatch_steps: Option<u32>,
    pub base_happiness: Option<u8>,
    pub egg_groups: Vec<String>,
    pub habitat: Option<String>,
    pub color: Option<String>,
    pub shape: Option<String>,
    pub generation: Option<String>,
    pub alternate_forms: Vec<String>,
    pub evolution_chain: Option<String>,
}
