mod common;

use pokedex_catalog::{
    AppError, MemoryCache, PokeApiClient, PokemonCatalog, QueryCache, QueryKey, ValidationError,
    build_stages, evolution_view, format_detail,
};
use serde_json::Value;
use std::sync::Arc;

fn catalog(base_url: &str) -> PokemonCatalog {
    PokemonCatalog::new(PokeApiClient::new(base_url))
}

fn cached_catalog(base_url: &str) -> PokemonCatalog {
    let store = Arc::new(MemoryCache::<Value>::with_defaults());
    catalog(base_url).with_query_cache(QueryCache::new(store))
}

#[tokio::test]
async fn listing_clamps_pagination_before_requesting() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    let listing = catalog.fetch_listing(5000, -20).await.unwrap();

    assert_eq!(listing.len(), 4);
    assert_eq!(listing[0].name, "bulbasaur");
    assert_eq!(fixture.requests(), vec!["/pokemon?limit=1000&offset=0"]);
}

#[tokio::test]
async fn all_names_requests_the_maximum_page() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    let names = catalog.fetch_all_names().await.unwrap();

    assert_eq!(names, vec!["bulbasaur", "ivysaur", "venusaur", "charmander"]);
    assert_eq!(fixture.requests(), vec!["/pokemon?limit=1000&offset=0"]);
}

#[tokio::test]
async fn entry_names_are_normalized() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    let pokemon = catalog.fetch_entry("  Ivysaur ").await.unwrap();

    assert_eq!(pokemon.name, "ivysaur");
    assert_eq!(fixture.requests(), vec!["/pokemon/ivysaur"]);
}

#[tokio::test]
async fn invalid_names_never_reach_the_network() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    let empty = catalog.fetch_entry("   ").await.unwrap_err();
    let invalid = catalog.fetch_entry("pi@chu").await.unwrap_err();

    assert!(matches!(empty, AppError::Validation(ValidationError::EmptyName)));
    assert!(matches!(
        invalid,
        AppError::Validation(ValidationError::InvalidNameFormat(ref name)) if name == "pi@chu"
    ));
    assert_eq!(fixture.hits(), 0);
}

#[tokio::test]
async fn batch_preserves_input_order_despite_arrival_order() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    // bulbasaur is served after a delay, so ivysaur arrives first
    let batch = catalog
        .fetch_entry_batch(&["bulbasaur", "ivysaur"])
        .await
        .unwrap();

    let names: Vec<&str> = batch.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["bulbasaur", "ivysaur"]);
    assert_eq!(fixture.hits(), 2);
}

#[tokio::test]
async fn batch_fetches_run_concurrently() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    let started = std::time::Instant::now();
    catalog
        .fetch_entry_batch(&["bulbasaur", "bulbasaur", "bulbasaur"])
        .await
        .unwrap();

    // Three sequential 150ms responses would take at least 450ms
    assert!(started.elapsed() < std::time::Duration::from_millis(400));
    assert_eq!(fixture.hits(), 3);
}

#[tokio::test]
async fn one_failure_fails_the_whole_batch() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    let err = catalog
        .fetch_entry_batch(&["ivysaur", "missingno"])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Fetch(ref fetch) if fetch.status == 404));
}

#[tokio::test]
async fn invalid_name_in_batch_fails_before_any_request() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    let err = catalog
        .fetch_entry_batch(&["ivysaur", "mr mime"])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(fixture.hits(), 0);
}

#[tokio::test]
async fn region_entries_keep_source_order() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    let entries = catalog.fetch_region_entries("kanto").await.unwrap();

    let numbers: Vec<u32> = entries.iter().map(|e| e.entry_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(entries[2].pokemon_species.name, "venusaur");
}

#[tokio::test]
async fn type_listing_projects_nested_names() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    let names = catalog.fetch_by_type("fire").await.unwrap();

    assert_eq!(names, vec!["charmander", "vulpix"]);
    assert_eq!(fixture.requests(), vec!["/type/fire"]);
}

#[tokio::test]
async fn species_and_evolution_chain_follow_response_urls() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    let chain = catalog.fetch_evolution_for("bulbasaur").await.unwrap().unwrap();

    assert_eq!(
        fixture.requests(),
        vec!["/pokemon/bulbasaur", "/pokemon-species/bulbasaur", "/evolution-chain/1"]
    );

    let stages = build_stages(Some(&chain.chain));
    assert_eq!(stages.len(), 3);
    assert_eq!(format_detail(stages[0][0]), "Base form");
    assert_eq!(format_detail(stages[2][0]), "Lvl 32, Level Up");

    let view = evolution_view(&chain);
    assert_eq!(view.stages[1][0].name, "ivysaur");
    assert_eq!(view.stages[1][0].condition, "Lvl 16, Level Up");
}

#[tokio::test]
async fn species_without_chain_yields_none() {
    let fixture = common::spawn_fixture().await;
    let catalog = catalog(&fixture.base_url);

    assert!(catalog.fetch_evolution_for("ditto").await.unwrap().is_none());

    let species = catalog.fetch_species_for("ditto").await.unwrap();
    assert!(species.is_genderless());
}

#[tokio::test]
async fn query_cache_answers_repeated_queries() {
    let fixture = common::spawn_fixture().await;
    let catalog = cached_catalog(&fixture.base_url);

    catalog.fetch_entry("ivysaur").await.unwrap();
    catalog.fetch_entry("IVYSAUR").await.unwrap();
    catalog.fetch_by_type("fire").await.unwrap();
    catalog.fetch_by_type("fire").await.unwrap();

    assert_eq!(fixture.requests(), vec!["/pokemon/ivysaur", "/type/fire"]);
}

#[tokio::test]
async fn invalidated_queries_are_fetched_again() {
    let fixture = common::spawn_fixture().await;
    let catalog = cached_catalog(&fixture.base_url);

    catalog.fetch_entry("ivysaur").await.unwrap();
    let queries = catalog.queries().unwrap();
    assert!(queries.invalidate(&QueryKey::Detail("ivysaur".to_string())));
    catalog.fetch_entry("ivysaur").await.unwrap();

    assert_eq!(fixture.hits(), 2);
}

#[tokio::test]
async fn distinct_pages_are_cached_separately() {
    let fixture = common::spawn_fixture().await;
    let catalog = cached_catalog(&fixture.base_url);

    catalog.fetch_listing(20, 0).await.unwrap();
    catalog.fetch_listing(20, 20).await.unwrap();
    catalog.fetch_listing(20, 0).await.unwrap();

    assert_eq!(
        fixture.requests(),
        vec!["/pokemon?limit=20&offset=0", "/pokemon?limit=20&offset=20"]
    );
}
