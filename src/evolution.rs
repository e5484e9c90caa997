use crate::formatters::format_label;
use crate::pokemon::{EvolutionChain, EvolutionChainLink, EvolutionDetail, NamedAPIResource};
use serde::Serialize;

/// Chains deeper than this are truncated. Real chains have at most three stages.
pub const MAX_CHAIN_DEPTH: usize = 64;

/// Groups the links of a chain by their distance from the root.
///
/// Traversal is depth-first in source order. A species appears at most once
/// per depth (the first one discovered wins) but children of skipped
/// duplicates are still visited.
pub fn build_stages(root: Option<&EvolutionChainLink>) -> Vec<Vec<&EvolutionChainLink>> {
    let mut stages = Vec::new();
    if let Some(root) = root {
        traverse(root, 0, &mut stages);
    }
    stages
}

fn traverse<'a>(node: &'a EvolutionChainLink, depth: usize, stages: &mut Vec<Vec<&'a EvolutionChainLink>>) {
    if depth >= MAX_CHAIN_DEPTH {
        tracing::warn!(
            "Evolution chain exceeds {} stages at {}, truncating",
            MAX_CHAIN_DEPTH,
            node.species.name
        );
        return;
    }

    if stages.len() <= depth {
        stages.push(Vec::new());
    }

    let stage = &mut stages[depth];
    if !stage.iter().any(|existing| existing.species.name == node.species.name) {
        stage.push(node);
    }

    for child in &node.evolves_to {
        traverse(child, depth + 1, stages);
    }
}

/// Describes why `link` evolved from its parent, e.g. `"Lvl 16, Level Up"`.
pub fn format_detail(link: &EvolutionChainLink) -> String {
    match link.evolution_details.first() {
        None => "Base form".to_string(),
        Some(detail) => {
            let parts = detail_fragments(detail);
            if parts.is_empty() {
                "Unknown condition".to_string()
            } else {
                parts.join(", ")
            }
        }
    }
}

fn named(resource: &Option<NamedAPIResource>) -> Option<&str> {
    resource
        .as_ref()
        .map(|r| r.name.as_str())
        .filter(|name| !name.is_empty())
}

fn detail_fragments(detail: &EvolutionDetail) -> Vec<String> {
    let mut parts = Vec::new();
    let label = |name: &str| format_label(Some(name));

    if let Some(level) = detail.min_level {
        parts.push(format!("Lvl {}", level));
    }
    if let Some(trigger) = named(&detail.trigger) {
        parts.push(label(trigger));
    }
    if let Some(item) = named(&detail.item) {
        parts.push(format!("Use {}", label(item)));
    }
    if let Some(item) = named(&detail.held_item) {
        parts.push(format!("Hold {}", label(item)));
    }
    if let Some(time) = detail.time_of_day.as_deref().filter(|t| !t.is_empty()) {
        parts.push(label(time));
    }
    if let Some(location) = named(&detail.location) {
        parts.push(format!("At {}", label(location)));
    }
    if let Some(known_move) = named(&detail.known_move) {
        parts.push(format!("Move {}", label(known_move)));
    }
    if let Some(move_type) = named(&detail.known_move_type) {
        parts.push(format!("Move Type {}", label(move_type)));
    }
    if let Some(species) = named(&detail.trade_species) {
        parts.push(format!("Trade with {}", label(species)));
    }
    if detail.needs_overworld_rain == Some(true) {
        parts.push("Overworld rain".to_string());
    }
    if detail.turn_upside_down == Some(true) {
        parts.push("Upside down device".to_string());
    }
    match detail.relative_physical_stats {
        Some(1) => parts.push("Attack > Defense".to_string()),
        Some(-1) => parts.push("Attack < Defense".to_string()),
        Some(0) => parts.push("Attack = Defense".to_string()),
        _ => {}
    }
    if let Some(happiness) = detail.happiness {
        parts.push(format!("Happiness ≥ {}", happiness));
    }
    if let Some(affection) = detail.affection {
        parts.push(format!("Affection ≥ {}", affection));
    }
    if let Some(beauty) = detail.beauty {
        parts.push(format!("Beauty ≥ {}", beauty));
    }
    if let Some(gender) = detail.gender {
        parts.push(if gender == 1 { "Female" } else { "Male" }.to_string());
    }
    if let Some(species) = named(&detail.party_species) {
        parts.push(format!("Party: {}", label(species)));
    }
    if let Some(party_type) = named(&detail.party_type) {
        parts.push(format!("Party Type: {}", label(party_type)));
    }

    parts
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EvolutionView {
    pub id: u32,
    pub stages: Vec<Vec<StageMember>>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct StageMember {
    pub name: String,
    pub label: String,
    pub url: String,
    pub condition: String,
}

/// Flattens a chain into the stage grid the detail page renders.
pub fn evolution_view(chain: &EvolutionChain) -> EvolutionView {
    let stages = build_stages(Some(&chain.chain))
        .into_iter()
        .map(|stage| {
            stage
                .into_iter()
                .map(|link| StageMember {
                    name: link.species.name.clone(),
                    label: format_label(Some(&link.species.name)),
                    url: link.species.url.clone(),
                    condition: format_detail(link),
                })
                .collect()
        })
        .collect();

    EvolutionView { id: chain.id, stages }
}
