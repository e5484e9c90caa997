use pokedex_catalog::cache::{CacheStore, MemoryCache, run_cleanup_task};
use pokedex_catalog::routes::{AppState, router};
use pokedex_catalog::{
    Config, Favorites, FavoritesStore, JsonFileStore, PokeApiClient, PokemonCatalog, QueryCache,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // Extractor rejections are logged at TRACE under axum::rejection
                format!(
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut client = PokeApiClient::from_config(&config.pokemon);
    let mut query_cache = None;

    if config.pokemon.cache_enabled {
        if config.cache.r#type != "memory" {
            tracing::warn!(
                "Unsupported cache type '{}', using in-memory cache",
                config.cache.r#type
            );
        }

        let responses: Arc<dyn CacheStore<serde_json::Value>> =
            Arc::new(MemoryCache::<serde_json::Value>::new(config.cache.clone()));
        let queries: Arc<dyn CacheStore<serde_json::Value>> =
            Arc::new(MemoryCache::<serde_json::Value>::new(config.cache.clone()));

        tokio::spawn(run_cleanup_task(responses.clone(), CLEANUP_INTERVAL));
        tokio::spawn(run_cleanup_task(queries.clone(), CLEANUP_INTERVAL));

        client = client.with_response_cache(responses);
        query_cache = Some(QueryCache::new(queries));
    } else {
        tracing::info!("Caching disabled, every request goes to {}", config.pokemon.api_url);
    }

    let catalog = match query_cache {
        Some(queries) => PokemonCatalog::new(client).with_query_cache(queries),
        None => PokemonCatalog::new(client),
    };

    let store: Box<dyn FavoritesStore> = Box::new(JsonFileStore::new(config.favorites.path.clone()));
    let favorites = match Favorites::load(store) {
        Ok(favorites) => favorites,
        Err(e) => {
            tracing::error!("Failed to load favorites: {}", e);
            std::process::exit(1);
        }
    };

    let app = router(Arc::new(AppState::new(catalog, favorites)));

    let listener = match tokio::net::TcpListener::bind(&config.server.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", config.server.bind_addr, e);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(addr) => tracing::info!("listening on {}", addr),
        Err(e) => tracing::warn!("Could not read local address: {}", e),
    }

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
