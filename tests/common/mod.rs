#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A local stand-in for the PokeAPI that records every request it serves.
pub struct Fixture {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Fixture {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[derive(Clone)]
struct FixtureState {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FixtureState {
    fn record(&self, path: String) {
        self.requests.lock().unwrap().push(path);
    }
}

pub async fn spawn_fixture() -> Fixture {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api/v2", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));

    let state = FixtureState {
        base_url: base_url.clone(),
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/api/v2/pokemon", get(listing))
        .route("/api/v2/pokemon/{name}", get(entry))
        .route("/api/v2/pokemon-species/{name}", get(species))
        .route("/api/v2/evolution-chain/{id}", get(evolution_chain))
        .route("/api/v2/pokedex/{region}", get(pokedex))
        .route("/api/v2/type/{name}", get(type_listing))
        .route("/api/v2/echo", any(echo))
        .route("/api/v2/boom", get(boom))
        .with_state(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Fixture { base_url, requests }
}

async fn listing(
    State(state): State<FixtureState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let limit = params.get("limit").cloned().unwrap_or_default();
    let offset = params.get("offset").cloned().unwrap_or_default();
    state.record(format!("/pokemon?limit={}&offset={}", limit, offset));

    let results: Vec<Value> = ["bulbasaur", "ivysaur", "venusaur", "charmander"]
        .iter()
        .enumerate()
        .map(|(i, name)| json!({"name": name, "url": format!("{}/pokemon/{}", state.base_url, i + 1)}))
        .collect();

    Json(json!({
        "count": 1302,
        "next": null,
        "previous": null,
        "results": results,
    }))
}

pub fn pokemon_json(base_url: &str, id: u32, name: &str, types: &[&str], hp: u8) -> Value {
    let stats: Vec<Value> = ["hp", "attack", "defense", "special-attack", "special-defense", "speed"]
        .iter()
        .map(|stat| {
            json!({
                "base_stat": if *stat == "hp" { hp } else { 60 },
                "effort": 0,
                "stat": {"name": stat, "url": format!("{}/stat/{}", base_url, stat)}
            })
        })
        .collect();
    let types: Vec<Value> = types
        .iter()
        .enumerate()
        .map(|(i, t)| json!({"slot": i + 1, "type": {"name": t, "url": format!("{}/type/{}", base_url, t)}}))
        .collect();

    json!({
        "id": id,
        "name": name,
        "base_experience": 64,
        "height": 7 + id,
        "weight": 69 + id,
        "types": types,
        "stats": stats,
        "abilities": [
            {"is_hidden": false, "slot": 1, "ability": {"name": "overgrow", "url": ""}}
        ],
        "species": {"name": name, "url": format!("{}/pokemon-species/{}", base_url, name)}
    })
}

async fn entry(State(state): State<FixtureState>, Path(name): Path<String>) -> Response {
    state.record(format!("/pokemon/{}", name));

    match name.as_str() {
        // Slowest response comes back last
        "bulbasaur" => {
            tokio::time::sleep(Duration::from_millis(150)).await;
            Json(pokemon_json(&state.base_url, 1, "bulbasaur", &["grass", "poison"], 45)).into_response()
        }
        "ivysaur" => Json(pokemon_json(&state.base_url, 2, "ivysaur", &["grass", "poison"], 60)).into_response(),
        "charmander" => Json(pokemon_json(&state.base_url, 4, "charmander", &["fire"], 39)).into_response(),
        "ditto" => Json(pokemon_json(&state.base_url, 132, "ditto", &["normal"], 48)).into_response(),
        "glitch" => Json(json!({"id": 0, "name": "glitch"})).into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn species(State(state): State<FixtureState>, Path(name): Path<String>) -> Response {
    state.record(format!("/pokemon-species/{}", name));

    let evolution_chain = match name.as_str() {
        "bulbasaur" | "ivysaur" => json!({"url": format!("{}/evolution-chain/1", state.base_url)}),
        _ => Value::Null,
    };

    Json(json!({
        "id": 1,
        "name": name,
        "order": 1,
        "gender_rate": if name == "ditto" { -1 } else { 1 },
        "capture_rate": 45,
        "base_happiness": 50,
        "is_baby": false,
        "is_legendary": false,
        "is_mythical": false,
        "hatch_counter": 20,
        "flavor_text_entries": [
            {"flavor_text": "A strange seed was\nplanted on its\u{c}back at birth.", "language": {"name": "en", "url": ""}, "version": {"name": "red", "url": ""}}
        ],
        "genera": [{"genus": "Seed Pokémon", "language": {"name": "en", "url": ""}}],
        "egg_groups": [{"name": "monster", "url": ""}, {"name": "plant", "url": ""}],
        "color": {"name": "green", "url": ""},
        "shape": {"name": "quadruped", "url": ""},
        "habitat": {"name": "grassland", "url": ""},
        "generation": {"name": "generation-i", "url": ""},
        "evolves_from_species": null,
        "evolution_chain": evolution_chain,
        "varieties": [{"is_default": true, "pokemon": {"name": name, "url": ""}}]
    }))
    .into_response()
}

async fn evolution_chain(State(state): State<FixtureState>, Path(id): Path<String>) -> Json<Value> {
    state.record(format!("/evolution-chain/{}", id));

    let species = |name: &str| json!({"name": name, "url": format!("{}/pokemon-species/{}", state.base_url, name)});
    let level = |n: u32| {
        json!([{
            "trigger": {"name": "level-up", "url": ""},
            "min_level": n,
            "item": null,
            "time_of_day": "",
            "needs_overworld_rain": false,
            "turn_upside_down": false,
            "relative_physical_stats": null,
            "min_happiness": null
        }])
    };

    Json(json!({
        "id": 1,
        "chain": {
            "species": species("bulbasaur"),
            "evolution_details": [],
            "evolves_to": [
                {
                    "species": species("ivysaur"),
                    "evolution_details": level(16),
                    "evolves_to": [
                        {"species": species("venusaur"), "evolution_details": level(32), "evolves_to": []}
                    ]
                }
            ]
        }
    }))
}

async fn pokedex(State(state): State<FixtureState>, Path(region): Path<String>) -> Response {
    state.record(format!("/pokedex/{}", region));
    if region != "kanto" {
        return (StatusCode::NOT_FOUND, "Not Found").into_response();
    }

    Json(json!({
        "id": 2,
        "name": "kanto",
        "pokemon_entries": [
            {"entry_number": 1, "pokemon_species": {"name": "bulbasaur", "url": ""}},
            {"entry_number": 2, "pokemon_species": {"name": "ivysaur", "url": ""}},
            {"entry_number": 3, "pokemon_species": {"name": "venusaur", "url": ""}}
        ]
    }))
    .into_response()
}

async fn type_listing(State(state): State<FixtureState>, Path(name): Path<String>) -> Json<Value> {
    state.record(format!("/type/{}", name));
    Json(json!({
        "id": 10,
        "name": name,
        "pokemon": [
            {"slot": 1, "pokemon": {"name": "charmander", "url": ""}},
            {"slot": 1, "pokemon": {"name": "vulpix", "url": ""}}
        ]
    }))
}

async fn echo(State(state): State<FixtureState>, method: Method, headers: HeaderMap) -> Json<Value> {
    state.record("/echo".to_string());
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "method": method.as_str(),
        "content_type": header("content-type"),
        "authorization": header("authorization"),
    }))
}

async fn boom(State(state): State<FixtureState>) -> StatusCode {
    state.record("/boom".to_string());
    StatusCode::INTERNAL_SERVER_ERROR
}
